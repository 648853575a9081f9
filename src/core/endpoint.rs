use crate::utils::error::{QueryError, Result};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://openspending.org/api/3";

/// 2019-20 Estimates of National Expenditure, as published on vulekamali.gov.za.
pub const DEFAULT_CUBE: &str =
    "b9d2af843f3a7ca223eea07fb608e62a:estimates-of-national-expenditure-2019-20-uploaded-2019-02-20t1910";

pub fn default_model_url() -> String {
    format!("{}/cubes/{}/model/", DEFAULT_API_BASE, DEFAULT_CUBE)
}

/// Model and aggregate URLs of one cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeEndpoints {
    pub model: Url,
    pub aggregate: Url,
}

impl CubeEndpoints {
    /// Derive the aggregate URL from a model URL. The last path segment must
    /// be exactly `model`; only that segment is rewritten.
    pub fn from_model_url(model_url: &str) -> Result<Self> {
        let model = Url::parse(model_url)?;

        let mut segments: Vec<String> = model
            .path_segments()
            .ok_or_else(|| QueryError::invalid_endpoint(model_url, "URL has no path"))?
            .map(str::to_string)
            .collect();

        let last = segments
            .iter()
            .rposition(|segment| !segment.is_empty())
            .ok_or_else(|| QueryError::invalid_endpoint(model_url, "URL path is empty"))?;

        if segments[last] != "model" {
            return Err(QueryError::invalid_endpoint(
                model_url,
                format!("expected last path segment 'model', found '{}'", segments[last]),
            ));
        }
        segments[last] = "aggregate".to_string();

        let mut aggregate = model.clone();
        aggregate.set_path(&format!("/{}", segments.join("/")));

        Ok(Self { model, aggregate })
    }

    /// Endpoints of `cube` under an API base such as `https://openspending.org/api/3`.
    pub fn for_cube(api_base: &str, cube: &str) -> Result<Self> {
        if cube.is_empty() || cube.contains('/') {
            return Err(QueryError::InvalidConfigValueError {
                field: "cube".to_string(),
                value: cube.to_string(),
                reason: "Cube id must be a single non-empty path segment".to_string(),
            });
        }
        let base = api_base.trim_end_matches('/');
        Self::from_model_url(&format!("{}/cubes/{}/model/", base, cube))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url_maps_to_aggregate() {
        let endpoints = CubeEndpoints::from_model_url(&default_model_url()).unwrap();

        assert_eq!(
            endpoints.aggregate.as_str(),
            format!("{}/cubes/{}/aggregate/", DEFAULT_API_BASE, DEFAULT_CUBE)
        );
        assert_eq!(endpoints.model.as_str(), default_model_url());
    }

    #[test]
    fn test_only_last_segment_is_rewritten() {
        let endpoints =
            CubeEndpoints::from_model_url("https://model.example.org/model-data/cubes/model/model")
                .unwrap();
        assert_eq!(
            endpoints.aggregate.as_str(),
            "https://model.example.org/model-data/cubes/model/aggregate"
        );
    }

    #[test]
    fn test_query_string_is_kept() {
        let endpoints =
            CubeEndpoints::from_model_url("http://localhost:8080/cubes/abc/model/?lang=en").unwrap();
        assert_eq!(
            endpoints.aggregate.as_str(),
            "http://localhost:8080/cubes/abc/aggregate/?lang=en"
        );
    }

    #[test]
    fn test_non_model_url_is_rejected() {
        let err = CubeEndpoints::from_model_url("https://openspending.org/api/3/cubes/abc/facts/")
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidEndpoint { .. }));

        assert!(CubeEndpoints::from_model_url("https://openspending.org/").is_err());
        assert!(matches!(
            CubeEndpoints::from_model_url("not a url"),
            Err(QueryError::UrlError(_))
        ));
    }

    #[test]
    fn test_for_cube() {
        let endpoints = CubeEndpoints::for_cube("https://openspending.org/api/3/", "abc:def").unwrap();
        assert_eq!(
            endpoints.model.as_str(),
            "https://openspending.org/api/3/cubes/abc:def/model/"
        );
        assert_eq!(
            endpoints.aggregate.as_str(),
            "https://openspending.org/api/3/cubes/abc:def/aggregate/"
        );

        assert!(CubeEndpoints::for_cube("https://openspending.org/api/3", "").is_err());
        assert!(CubeEndpoints::for_cube("https://openspending.org/api/3", "a/b").is_err());
    }
}
