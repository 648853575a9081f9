use crate::config::{resolve_model_url, validate_query_settings};
use crate::core::endpoint::DEFAULT_API_BASE;
use crate::core::query::{DEFAULT_FINANCIAL_YEAR, DEFAULT_PAGE_SIZE, DEFAULT_PHASE};
use crate::core::ConfigProvider;
use crate::utils::error::{QueryError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub query: QuerySettings,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub model_url: Option<String>,
    pub api_base: Option<String>,
    pub cube: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySettings {
    pub page_size: Option<usize>,
    pub phase: Option<String>,
    pub financial_year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QueryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${VAR}` is replaced by the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn model_url(&self) -> Result<Url> {
        resolve_model_url(
            self.source.model_url.as_deref(),
            self.source.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            self.source.cube.as_deref(),
        )
    }

    fn page_size(&self) -> usize {
        self.query.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn phase(&self) -> &str {
        self.query.phase.as_deref().unwrap_or(DEFAULT_PHASE)
    }

    fn financial_year(&self) -> &str {
        self.query
            .financial_year
            .as_deref()
            .unwrap_or(DEFAULT_FINANCIAL_YEAR)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.source.model_url.is_none() {
            validation::validate_required_field("source.cube", &self.source.cube)?;
        }
        self.model_url()?;
        validate_query_settings(self.page_size(), self.phase(), self.financial_year())?;
        if let Some(output) = &self.output {
            validation::validate_path("output.path", &output.path)?;
        }
        Ok(())
    }
}
