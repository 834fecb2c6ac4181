//! JSON-RPC 2.0 client for the node API
//!
//! Every call is a `POST {api_base}/rpc` carrying
//! `{"jsonrpc":"2.0","id":N,"method":...,"params":...}`. Transport failures
//! and 5xx responses are retried with exponential backoff; auth failures and
//! JSON-RPC errors are returned immediately.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::LabConfig;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// Keeps a present-but-null field distinct from a missing one.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    /// Pull `result` out of the envelope or turn `error` into a [`ClientError`].
    pub fn into_result(self) -> Result<Value, ClientError> {
        if self.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            return Err(ClientError::InvalidResponse(
                "missing or wrong jsonrpc version".to_string(),
            ));
        }
        if let Some(err) = self.error {
            return Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        self.result
            .ok_or_else(|| ClientError::InvalidResponse("response missing 'result'".to_string()))
    }
}

#[derive(Debug)]
pub struct RpcClient {
    rpc_url: String,
    api_key: Option<String>,
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(config: &LabConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.request_timeout())
            .build()?;

        log::info!("📡 RPC client initialized: {}", config.rpc_url());
        Ok(Self {
            rpc_url: config.rpc_url(),
            api_key: config.api_key.clone(),
            client,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Call `method` and decode its `result` as `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, ClientError> {
        let value = self.call_value(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            ClientError::InvalidResponse(format!("{} result did not decode: {}", method, e))
        })
    }

    pub async fn call_value(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let request = RpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        };

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&request).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff * 2u32.saturating_pow(attempt - 1);
                    log::warn!(
                        "⚠️ RPC {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        method,
                        attempt,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log::error!("❌ RPC {} failed: {}", method, e);
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, request: &RpcRequest) -> Result<Value, ClientError> {
        log::debug!("→ POST {} {}", self.rpc_url, request.method);

        let mut builder = self.client.post(&self.rpc_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ClientError::http(status.as_u16()));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("invalid JSON: {}", e)))?;
        envelope.into_result()
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Authentication failed (HTTP {0})")]
    Unauthorized(u16),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn http(status: u16) -> Self {
        let message = match status {
            400 => "Bad Request",
            404 => "Not Found",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown Error",
        };
        Self::Http(status, message.to_string())
    }

    /// Network trouble and server-side failures are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Request(_) => true,
            ClientError::Http(status, _) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
