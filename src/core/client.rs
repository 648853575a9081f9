use crate::core::CubeApi;
use crate::domain::model::{AggregateQuery, AggregateResult, CubeModel, ModelEnvelope};
use crate::utils::error::{QueryError, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("openspending-query/", env!("CARGO_PKG_VERSION"));

/// `CubeApi` over HTTP.
#[derive(Debug, Clone)]
pub struct OpenSpendingClient {
    client: Client,
}

impl OpenSpendingClient {
    pub fn new(timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn read_json(&self, response: Response) -> Result<serde_json::Value> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(QueryError::RequestFailed {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        tracing::info!("Result:\n{}", serde_json::to_string_pretty(&body)?);
        Ok(body)
    }
}

#[async_trait::async_trait]
impl CubeApi for OpenSpendingClient {
    async fn fetch_model(&self, model_url: &Url) -> Result<CubeModel> {
        tracing::debug!("Making API request to: {}", model_url);
        let response = self.client.get(model_url.clone()).send().await?;
        let body = self.read_json(response).await?;

        if body.get("model").is_none() {
            return Err(QueryError::malformed_model(
                "response has no top-level 'model' key",
            ));
        }
        let envelope: ModelEnvelope = serde_json::from_value(body)
            .map_err(|e| QueryError::malformed_model(e.to_string()))?;
        Ok(envelope.model)
    }

    async fn aggregate(
        &self,
        aggregate_url: &Url,
        query: &AggregateQuery,
    ) -> Result<AggregateResult> {
        tracing::debug!("Making API request to: {}", aggregate_url);
        let response = self
            .client
            .get(aggregate_url.clone())
            .query(&query.to_params())
            .send()
            .await?;
        let body = self.read_json(response).await?;
        Ok(AggregateResult::new(body))
    }
}
