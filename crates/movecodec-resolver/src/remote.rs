//! `contract.resolve_function` over Starcoin JSON-RPC.
//!
//! # Feature Flag
//! This module requires the `remote` feature flag (enables `reqwest`).
//!
//! ```toml
//! movecodec-resolver = { version = "0.1", features = ["remote"] }
//! ```
//!
//! Each lookup is a single request: no retries and no caching. Wrap the
//! resolver if either is needed.

use async_trait::async_trait;
use movecodec_core::{
    call::{FunctionId, ResolvedFunction},
    error::ResolverError,
    resolver::FunctionResolver,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<ResolvedFunction>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC function resolver.
pub struct JsonRpcResolver {
    client: Client,
    url: String,
}

impl JsonRpcResolver {
    /// Create a resolver for an explicit RPC endpoint.
    pub fn new(url: impl Into<String>) -> Result<Self, ResolverError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("movecodec/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResolverError::Rpc {
                url: url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, url })
    }

    /// Public seed node for a named network (`main`, `barnard`, `halley`, ...).
    pub fn with_network(network: &str) -> Result<Self, ResolverError> {
        Self::new(seed_url(network))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// `https://{network}-seed.starcoin.org`
pub fn seed_url(network: &str) -> String {
    format!("https://{network}-seed.starcoin.org")
}

#[async_trait]
impl FunctionResolver for JsonRpcResolver {
    async fn resolve_function(
        &self,
        id: &FunctionId,
    ) -> Result<Option<ResolvedFunction>, ResolverError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "contract.resolve_function",
            "params": [id.to_string()],
        });
        debug!(url = %self.url, func = %id, "resolving function");

        let rpc_err = |e: reqwest::Error| ResolverError::Rpc {
            url: self.url.clone(),
            reason: e.to_string(),
        };
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(rpc_err)?
            .error_for_status()
            .map_err(rpc_err)?;
        let text = resp.text().await.map_err(rpc_err)?;

        parse_response(&text)
    }
}

fn parse_response(text: &str) -> Result<Option<ResolvedFunction>, ResolverError> {
    let parsed: RpcResponse = serde_json::from_str(text).map_err(|e| ResolverError::InvalidResponse {
        reason: e.to_string(),
    })?;
    if let Some(err) = parsed.error {
        return Err(ResolverError::RpcError {
            code: err.code,
            message: err.message,
        });
    }
    Ok(parsed.result)
}
