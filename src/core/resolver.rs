use crate::domain::model::CubeModel;
use crate::utils::error::{QueryError, Result};

pub const ADMINISTRATIVE_CLASSIFICATION: &str = "administrative_classification";
pub const PHASE: &str = "phase";
pub const DATE: &str = "date";

/// Label refs of the three hierarchies a department summary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRefs {
    pub administrative: String,
    pub phase: String,
    pub date: String,
}

/// Label ref of the primary (first level) dimension of `hierarchy`.
pub fn resolve_label_ref<'m>(model: &'m CubeModel, hierarchy: &str) -> Result<&'m str> {
    let levels = &model
        .hierarchies
        .get(hierarchy)
        .ok_or_else(|| QueryError::malformed_model(format!("hierarchy '{}' not found", hierarchy)))?
        .levels;

    let dimension_name = levels.first().ok_or_else(|| {
        QueryError::malformed_model(format!("hierarchy '{}' has no levels", hierarchy))
    })?;

    let dimension = model.dimensions.get(dimension_name).ok_or_else(|| {
        QueryError::malformed_model(format!(
            "dimension '{}' (first level of '{}') not found",
            dimension_name, hierarchy
        ))
    })?;

    dimension.label_ref.as_deref().ok_or_else(|| {
        QueryError::malformed_model(format!(
            "dimension '{}' has no label_ref",
            dimension_name
        ))
    })
}

pub fn resolve_summary_refs(model: &CubeModel) -> Result<SummaryRefs> {
    let refs = SummaryRefs {
        administrative: resolve_label_ref(model, ADMINISTRATIVE_CLASSIFICATION)?.to_string(),
        phase: resolve_label_ref(model, PHASE)?.to_string(),
        date: resolve_label_ref(model, DATE)?.to_string(),
    };
    tracing::debug!("Resolved dimension refs: {:?}", refs);
    Ok(refs)
}
