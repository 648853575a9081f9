pub mod client;
pub mod endpoint;
pub mod export;
pub mod query;
pub mod resolver;
pub mod summary;

pub use crate::domain::model::{AggregateQuery, AggregateResult, CubeModel, Cut, Drilldown};
pub use crate::domain::ports::{ConfigProvider, CubeApi, Storage};
pub use crate::utils::error::Result;
