pub mod cli;
pub mod toml_config;

use crate::core::endpoint::{default_model_url, CubeEndpoints};
use crate::utils::error::{QueryError, Result};
use crate::utils::validation;
use url::Url;

#[cfg(feature = "cli")]
use crate::core::endpoint::DEFAULT_API_BASE;
#[cfg(feature = "cli")]
use crate::core::query::{DEFAULT_FINANCIAL_YEAR, DEFAULT_PAGE_SIZE, DEFAULT_PHASE};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Model URL from either an explicit URL or an API base plus cube id.
/// With neither, the 2019-20 national estimates cube is used.
pub fn resolve_model_url(
    model_url: Option<&str>,
    api_base: &str,
    cube: Option<&str>,
) -> Result<Url> {
    match (model_url, cube) {
        (Some(_), Some(_)) => Err(QueryError::ConfigError {
            message: "model URL and cube id are mutually exclusive".to_string(),
        }),
        (Some(url), None) => {
            validation::validate_url("model_url", url)?;
            Ok(CubeEndpoints::from_model_url(url)?.model)
        }
        (None, Some(cube)) => {
            validation::validate_url("api_base", api_base)?;
            Ok(CubeEndpoints::for_cube(api_base, cube)?.model)
        }
        (None, None) => Ok(CubeEndpoints::from_model_url(&default_model_url())?.model),
    }
}

pub fn validate_query_settings(page_size: usize, phase: &str, financial_year: &str) -> Result<()> {
    validation::validate_positive_number("page_size", page_size, 1)?;
    validation::validate_cut_value("phase", phase)?;
    validation::validate_cut_value("financial_year", financial_year)?;
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "openspending-query")]
#[command(about = "Summarise OpenSpending budget cubes by department")]
pub struct CliConfig {
    /// Model endpoint of the cube, ending in /model/
    #[arg(long, conflicts_with = "cube")]
    pub model_url: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Cube id, resolved under --api-base
    #[arg(long)]
    pub cube: Option<String>,

    #[arg(long, default_value = DEFAULT_PHASE)]
    pub phase: String,

    #[arg(long, default_value = DEFAULT_FINANCIAL_YEAR)]
    pub financial_year: String,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write the aggregate cells to this CSV file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn model_url(&self) -> Result<Url> {
        resolve_model_url(self.model_url.as_deref(), &self.api_base, self.cube.as_deref())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn phase(&self) -> &str {
        &self.phase
    }

    fn financial_year(&self) -> &str {
        &self.financial_year
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.model_url()?;
        validate_query_settings(self.page_size, &self.phase, &self.financial_year)?;
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
