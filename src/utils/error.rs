use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Request to {url} failed with status {status}")]
    RequestFailed { url: String, status: u16 },

    #[error("Malformed model: {message}")]
    MalformedModel { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Upstream service answered badly; rerunning later may succeed.
    Medium,
    /// The input (config, endpoint, model document) cannot be processed.
    High,
    /// Local system failure.
    Critical,
}

impl QueryError {
    pub fn malformed_model<S: Into<String>>(message: S) -> Self {
        Self::MalformedModel {
            message: message.into(),
        }
    }

    pub fn invalid_endpoint<S: Into<String>, R: Into<String>>(url: S, reason: R) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            QueryError::RequestFailed { .. } | QueryError::ApiError(_) => ErrorSeverity::Medium,
            QueryError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QueryError::RequestFailed { status, .. } if *status >= 500 => {
                "The OpenSpending API reported a server error; try again later"
            }
            QueryError::RequestFailed { .. } => {
                "Check that the cube id and model URL point to an existing dataset"
            }
            QueryError::ApiError(_) => "Check network connectivity to the OpenSpending API",
            QueryError::MalformedModel { .. } => {
                "The cube model lacks the administrative_classification, phase or date hierarchy; pick a budget cube that defines them"
            }
            QueryError::InvalidEndpoint { .. } | QueryError::UrlError(_) => {
                "Pass a model URL ending in /model/ or use --api-base with --cube"
            }
            QueryError::ConfigError { .. }
            | QueryError::MissingConfigError { .. }
            | QueryError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            QueryError::CsvError(_) | QueryError::IoError(_) => {
                "Check that the output path is writable"
            }
            QueryError::SerializationError(_) => "The API returned a body that is not valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QueryError::RequestFailed { url, status } => {
                format!("OpenSpending returned HTTP {} for {}", status, url)
            }
            QueryError::MalformedModel { message } => {
                format!("The cube model could not be used: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
