pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    client::OpenSpendingClient, endpoint::CubeEndpoints, export::export_cells,
    summary::SummaryPipeline,
};
pub use crate::utils::error::{QueryError, Result};
