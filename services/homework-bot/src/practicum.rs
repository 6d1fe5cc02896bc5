//! Practicum homework status API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::io::HttpClient;
use crate::BotError;

/// Source of homework status updates
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HomeworkApi: Send + Sync {
    /// Fetch status changes that happened since `from_date` (epoch seconds)
    async fn fetch(&self, from_date: i64) -> crate::Result<Value>;
}

/// Client for the homework statuses endpoint
pub struct PracticumClient {
    endpoint: String,
    auth_header: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let token = config.practicum_token.as_deref().unwrap_or_default();

        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            auth_header: format!("OAuth {}", token),
            http,
        }
    }

    /// Request homework statuses changed since `from_date`
    pub async fn get_api_answer(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        let params = [("from_date", from_date.as_str())];
        let headers = [("Authorization", self.auth_header.as_str())];

        let response = self
            .http
            .get(&self.endpoint, &headers, &params)
            .await
            .map_err(|e| BotError::EndpointRequest {
                params: format!("from_date={}", from_date),
                reason: e.to_string(),
            })?;

        if response.status != 200 {
            return Err(BotError::EndpointUnavailable {
                status: response.status,
                reason: response.reason,
                body: response.body,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn fetch(&self, from_date: i64) -> crate::Result<Value> {
        self.get_api_answer(from_date).await
    }
}
