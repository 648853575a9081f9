use crate::domain::model::{AggregateQuery, AggregateResult, CubeModel};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Model endpoint of the cube to query.
    fn model_url(&self) -> Result<Url>;
    fn page_size(&self) -> usize;
    fn phase(&self) -> &str;
    fn financial_year(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn output_path(&self) -> Option<&str>;
}

/// Read side of the OpenSpending cube API.
#[async_trait]
pub trait CubeApi: Send + Sync {
    async fn fetch_model(&self, model_url: &Url) -> Result<CubeModel>;
    async fn aggregate(&self, aggregate_url: &Url, query: &AggregateQuery)
        -> Result<AggregateResult>;
}
