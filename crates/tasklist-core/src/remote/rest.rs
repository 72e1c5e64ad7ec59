//! Hosted REST Store
//!
//! Talks to a PostgREST-style endpoint (`{url}/rest/v1/{table}`), the dialect
//! served by Supabase. Auth is the project API key sent both as `apikey` and
//! as a bearer token.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

use super::TaskStore;
use crate::error::{ConfigError, StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskPatch};

pub const DEFAULT_TABLE: &str = "tasks";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the hosted store
#[derive(Debug, Clone, PartialEq)]
pub struct RestConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("url"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "url",
                value: self.url.clone(),
            });
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("token"));
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Missing("table"));
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

/// PostgREST error body (only the field we surface)
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct RestTaskStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestTaskStore {
    pub fn new(config: RestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http client",
                value: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
    }

    /// Send a request and decode the returned row array
    async fn send_rows(&self, builder: RequestBuilder) -> StoreResult<Vec<Task>> {
        let response = builder.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Task>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else if e.is_decode() {
        StoreError::Decode(e.to_string())
    } else {
        StoreError::Network(e.to_string())
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        message
    };
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

#[async_trait]
impl TaskStore for RestTaskStore {
    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        let builder = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.asc")]);
        self.send_rows(builder).await
    }

    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task> {
        let builder = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(new_task);
        self.send_rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> StoreResult<()> {
        let builder = self
            .request(Method::PATCH)
            .query(&id_filter(id))
            .header("Prefer", "return=representation")
            .json(patch);
        if self.send_rows(builder).await?.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let builder = self
            .request(Method::DELETE)
            .query(&id_filter(id))
            .header("Prefer", "return=representation");
        if self.send_rows(builder).await?.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = RestConfig::new("https://abc.supabase.co/", "key").with_table("todos");
        assert_eq!(config.endpoint(), "https://abc.supabase.co/rest/v1/todos");
    }

    #[test]
    fn test_validate_rejects_missing_values() {
        assert!(matches!(
            RestConfig::new("", "key").validate(),
            Err(ConfigError::Missing("url"))
        ));
        assert!(matches!(
            RestConfig::new("https://x.supabase.co", " ").validate(),
            Err(ConfigError::Missing("token"))
        ));
        assert!(matches!(
            RestConfig::new("ftp://x", "key").validate(),
            Err(ConfigError::Invalid { key: "url", .. })
        ));
        assert!(RestConfig::new("https://x.supabase.co", "key").validate().is_ok());
    }
}
