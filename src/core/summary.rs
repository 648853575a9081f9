use crate::core::endpoint::CubeEndpoints;
use crate::core::query::{build_summary_query, SummaryFilters};
use crate::core::resolver::resolve_summary_refs;
use crate::core::{ConfigProvider, CubeApi};
use crate::domain::model::AggregateResult;
use crate::utils::error::Result;

/// Model request followed by one aggregate request, strictly in that order.
pub struct SummaryPipeline<A: CubeApi, C: ConfigProvider> {
    api: A,
    config: C,
}

impl<A: CubeApi, C: ConfigProvider> SummaryPipeline<A, C> {
    pub fn new(api: A, config: C) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn run(&self) -> Result<AggregateResult> {
        let model_url = self.config.model_url()?;
        let endpoints = CubeEndpoints::from_model_url(model_url.as_str())?;

        tracing::info!("Requesting the OpenSpending model from {}", endpoints.model);
        let model = self.api.fetch_model(&endpoints.model).await?;

        let refs = resolve_summary_refs(&model)?;
        let filters = SummaryFilters {
            phase: self.config.phase().to_string(),
            financial_year: self.config.financial_year().to_string(),
        };
        let query = build_summary_query(&refs, &filters, self.config.page_size());

        let cuts: Vec<String> = query.cuts.iter().map(ToString::to_string).collect();
        let drilldowns: Vec<String> = query.drilldowns.iter().map(ToString::to_string).collect();
        tracing::info!("Requesting a summary of department budgets from {}", endpoints.aggregate);
        tracing::info!("cuts: {:?}", cuts);
        tracing::info!("drilldowns: {:?}", drilldowns);
        tracing::info!("query parameters: {:?}", query.to_params());

        let result = self.api.aggregate(&endpoints.aggregate, &query).await?;
        tracing::info!("Received {} aggregate cells", result.cells().len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AggregateQuery, CubeModel, ModelEnvelope};
    use crate::utils::error::QueryError;
    use std::sync::{Arc, Mutex};
    use url::Url;

    #[derive(Clone, Default)]
    struct RecordingApi {
        model: Option<CubeModel>,
        calls: Arc<Mutex<Vec<String>>>,
        last_query: Arc<Mutex<Option<AggregateQuery>>>,
    }

    #[async_trait::async_trait]
    impl CubeApi for RecordingApi {
        async fn fetch_model(&self, model_url: &Url) -> Result<CubeModel> {
            self.calls.lock().unwrap().push(model_url.to_string());
            self.model.clone().ok_or_else(|| QueryError::RequestFailed {
                url: model_url.to_string(),
                status: 500,
            })
        }

        async fn aggregate(
            &self,
            aggregate_url: &Url,
            query: &AggregateQuery,
        ) -> Result<AggregateResult> {
            self.calls.lock().unwrap().push(aggregate_url.to_string());
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(AggregateResult::new(serde_json::json!({"cells": []})))
        }
    }

    struct MockConfig {
        model_url: String,
    }

    impl ConfigProvider for MockConfig {
        fn model_url(&self) -> Result<Url> {
            Ok(Url::parse(&self.model_url)?)
        }

        fn page_size(&self) -> usize {
            10000
        }

        fn phase(&self) -> &str {
            "Main appropriation"
        }

        fn financial_year(&self) -> &str {
            "2019"
        }

        fn timeout_seconds(&self) -> Option<u64> {
            None
        }

        fn output_path(&self) -> Option<&str> {
            None
        }
    }

    fn model() -> CubeModel {
        let body = serde_json::json!({
            "model": {
                "hierarchies": {
                    "administrative_classification": {"levels": ["dept"]},
                    "phase": {"levels": ["bp"]},
                    "date": {"levels": ["fy"]}
                },
                "dimensions": {
                    "dept": {"label_ref": "voteno.department"},
                    "bp": {"label_ref": "phase.phase"},
                    "fy": {"label_ref": "finyear.finyear"}
                }
            }
        });
        serde_json::from_value::<ModelEnvelope>(body).unwrap().model
    }

    fn config() -> MockConfig {
        MockConfig {
            model_url: "https://openspending.org/api/3/cubes/abc/model/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_builds_summary_query() {
        let api = RecordingApi {
            model: Some(model()),
            ..Default::default()
        };
        let pipeline = SummaryPipeline::new(api.clone(), config());

        pipeline.run().await.unwrap();

        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![
                "https://openspending.org/api/3/cubes/abc/model/".to_string(),
                "https://openspending.org/api/3/cubes/abc/aggregate/".to_string(),
            ]
        );
        let query = api.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(
            query.cut_param(),
            "phase.phase:Main appropriation|finyear.finyear:2019"
        );
        assert_eq!(query.drilldown_param(), "voteno.department");
        assert_eq!(query.page_size, 10000);
    }

    #[tokio::test]
    async fn test_model_failure_stops_pipeline() {
        let api = RecordingApi::default();
        let pipeline = SummaryPipeline::new(api.clone(), config());

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(err, QueryError::RequestFailed { status: 500, .. }));
        assert_eq!(api.calls.lock().unwrap().len(), 1);
        assert!(api.last_query.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_model_stops_pipeline() {
        let mut broken = model();
        broken.dimensions.remove("dept");
        let api = RecordingApi {
            model: Some(broken),
            ..Default::default()
        };
        let pipeline = SummaryPipeline::new(api.clone(), config());

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(err, QueryError::MalformedModel { .. }));
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_model_url_issues_no_requests() {
        let api = RecordingApi {
            model: Some(model()),
            ..Default::default()
        };
        let pipeline = SummaryPipeline::new(
            api.clone(),
            MockConfig {
                model_url: "https://openspending.org/api/3/cubes/abc/".to_string(),
            },
        );

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(err, QueryError::InvalidEndpoint { .. }));
        assert!(api.calls.lock().unwrap().is_empty());
    }
}
