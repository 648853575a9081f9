use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Body of `GET .../cubes/{cube}/model/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEnvelope {
    pub model: CubeModel,
}

/// Dimensions and hierarchies of one OpenSpending cube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeModel {
    #[serde(default)]
    pub dimensions: BTreeMap<String, Dimension>,
    #[serde(default)]
    pub hierarchies: BTreeMap<String, Hierarchy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub label: Option<String>,
    pub hierarchy: Option<String>,
    pub key_ref: Option<String>,
    pub label_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub label: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub levels: Vec<String>,
}

/// Equality filter, rendered as `field_ref:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    pub field_ref: String,
    pub value: String,
}

impl Cut {
    pub fn new(field_ref: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_ref: field_ref.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field_ref, self.value)
    }
}

/// Field reference to group aggregate cells by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drilldown(pub String);

impl fmt::Display for Drilldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of one aggregate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    pub page_size: usize,
    pub cuts: Vec<Cut>,
    pub drilldowns: Vec<Drilldown>,
}

impl AggregateQuery {
    pub fn cut_param(&self) -> String {
        join_pipe(&self.cuts)
    }

    pub fn drilldown_param(&self) -> String {
        join_pipe(&self.drilldowns)
    }

    /// Query string pairs. `pagesize` is always present; empty cut or
    /// drilldown lists leave their parameter out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("pagesize", self.page_size.to_string())];
        if !self.cuts.is_empty() {
            params.push(("cut", self.cut_param()));
        }
        if !self.drilldowns.is_empty() {
            params.push(("drilldown", self.drilldown_param()));
        }
        params
    }
}

fn join_pipe<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

/// Body of `GET .../cubes/{cube}/aggregate/`. Kept as raw JSON; only
/// `cells` is looked into.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub raw: Value,
}

impl AggregateResult {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn cells(&self) -> Vec<&Map<String, Value>> {
        self.raw
            .get("cells")
            .and_then(Value::as_array)
            .map(|cells| cells.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_envelope_parses_typed_model() {
        let body = json!({
            "model": {
                "aggregates": {},
                "dimensions": {
                    "budget_phase": {
                        "attributes": {},
                        "hierarchy": "phase",
                        "key_ref": "budget_phase.budget_phase",
                        "label": "Budget Phase",
                        "label_ref": "budget_phase.budget_phase",
                        "ref": "budget_phase"
                    }
                },
                "hierarchies": {
                    "phase": {"label": "phase", "levels": ["budget_phase"], "ref": "phase"}
                }
            }
        });

        let envelope: ModelEnvelope = serde_json::from_value(body).unwrap();
        let model = envelope.model;

        assert_eq!(
            model.dimensions["budget_phase"].label_ref.as_deref(),
            Some("budget_phase.budget_phase")
        );
        assert_eq!(model.hierarchies["phase"].levels, vec!["budget_phase"]);
        assert_eq!(model.hierarchies["phase"].reference.as_deref(), Some("phase"));
    }

    #[test]
    fn test_envelope_without_model_key_is_rejected() {
        let body = json!({"dimensions": {}, "hierarchies": {}});
        assert!(serde_json::from_value::<ModelEnvelope>(body).is_err());
    }

    #[test]
    fn test_query_params_join_with_pipe() {
        let query = AggregateQuery {
            page_size: 10000,
            cuts: vec![
                Cut::new("phase.phase", "Main appropriation"),
                Cut::new("finyear.finyear", "2019"),
            ],
            drilldowns: vec![Drilldown("voteno.voteno".to_string())],
        };

        assert_eq!(
            query.to_params(),
            vec![
                ("pagesize", "10000".to_string()),
                (
                    "cut",
                    "phase.phase:Main appropriation|finyear.finyear:2019".to_string()
                ),
                ("drilldown", "voteno.voteno".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_skip_empty_lists() {
        let query = AggregateQuery {
            page_size: 50,
            cuts: vec![],
            drilldowns: vec![],
        };
        assert_eq!(query.to_params(), vec![("pagesize", "50".to_string())]);
    }

    #[test]
    fn test_aggregate_cells() {
        let result = AggregateResult::new(json!({
            "cells": [
                {"_count": 517, "value.sum": 7664889000u64, "voteno.department": "Agriculture, Forestry and Fisheries"},
                "not a cell"
            ],
            "total_cell_count": 1
        }));
        let cells = result.cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0]["_count"], json!(517));

        assert!(AggregateResult::new(json!({})).cells().is_empty());
    }
}
