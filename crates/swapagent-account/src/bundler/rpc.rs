use std::time::Duration;

use reqwest::Client as HTTPClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<ResponseError>,
}

#[derive(Deserialize, Debug)]
struct ResponseError {
    code: i64,
    message: String,
}

/// Minimal JSON-RPC transport for the `eth_*UserOperation*` bundler namespace
#[derive(Clone)]
pub struct BundlerRpc {
    endpoint: String,
    client: HTTPClient,
}

impl BundlerRpc {
    pub fn new(endpoint: &str, timeout: u64) -> Result<Self, Error> {
        let client = HTTPClient::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Send `method` and decode its result. A `null` result is returned as `None`
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>, Error> {
        let request = Request {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Bundler(format!("{} returned status={}, body={}", method, status, text)));
        }

        let response: Response<T> = serde_json::from_str(&text).map_err(|e| Error::Format(e.to_string()))?;
        if let Some(error) = response.error {
            return Err(Error::Bundler(format!("{} failed code={} message={}", method, error.code, error.message)));
        }

        Ok(response.result)
    }
}
