#[cfg(feature = "testing")]
use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swapagent_common::service::Error as ServiceError;
use swapagent_common::{log_if_error, measure_duration, metric};
use swapagent_evm::ChainID;
use thiserror::Error;
use tracing::instrument;

pub mod http;
pub mod models;

#[cfg(feature = "testing")]
pub mod mock;

pub use http::HttpBackendClient;
pub use models::{ApprovalTxPayload, SwapTxPayload, TxPayload};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    HTTP(#[from] reqwest::Error),

    #[error("backend returned status {0}: {1}")]
    Status(u16, String),

    #[error("wrong format error {0}")]
    Format(String),

    #[error("backend error: {0}")]
    Internal(String),
}

// Trait to be implemented by any backend delivering transaction payloads
#[async_trait]
pub trait Backend: 'static + Send + Sync + Clone {
    // Build the approval transaction letting the router spend `amount` of `token_address`
    async fn get_approval_tx(&self, chain_id: ChainID, token_address: Address, amount: f64, decimals: u8) -> Result<ApprovalTxPayload, Error>;

    // Build the swap transaction of `amount` source token, delivered to `recipient`
    #[allow(clippy::too_many_arguments)]
    async fn get_swap_tx(
        &self,
        source_token: Address,
        destination_token: Address,
        recipient: Address,
        amount: f64,
        slippage: f64,
        chain_id: ChainID,
        decimals: u8,
    ) -> Result<SwapTxPayload, Error>;
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BackendConfiguration {
    pub endpoint: String,

    #[serde(default = "BackendConfiguration::default_timeout")]
    pub timeout: u64,
}

impl BackendConfiguration {
    fn default_timeout() -> u64 {
        10
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.endpoint.is_empty() {
            return Err(ServiceError::new("backend endpoint cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub enum BackendClient {
    #[cfg(feature = "testing")]
    Mock(Arc<dyn mock::MockBackendClient>),

    Http(HttpBackendClient),
}

impl BackendClient {
    pub fn new(configuration: &BackendConfiguration) -> Result<Self, Error> {
        HttpBackendClient::new(configuration).map(Self::Http)
    }

    #[cfg(feature = "testing")]
    pub fn mock<I: 'static + mock::MockBackendClient>() -> Self {
        Self::Mock(Arc::new(I::new()))
    }

    #[instrument(name = "get_approval_tx", skip(self))]
    pub async fn get_approval_tx(&self, chain_id: ChainID, token_address: Address, amount: f64, decimals: u8) -> Result<ApprovalTxPayload, Error> {
        let (result, duration) = measure_duration!(log_if_error!(match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.get_approval_tx(chain_id, token_address, amount, decimals).await,

            Self::Http(x) => x.get_approval_tx(chain_id, token_address, amount, decimals).await,
        }));

        metric!(counter[backend_request] = 1, method = "approve");
        metric!(histogram[backend_request_duration_milliseconds] = duration.as_millis(), method = "approve");
        metric!(on error result => counter [ backend_request_error ] = 1, method = "approve");

        result
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(name = "get_swap_tx", skip(self))]
    pub async fn get_swap_tx(
        &self,
        source_token: Address,
        destination_token: Address,
        recipient: Address,
        amount: f64,
        slippage: f64,
        chain_id: ChainID,
        decimals: u8,
    ) -> Result<SwapTxPayload, Error> {
        let (result, duration) = measure_duration!(log_if_error!(match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => {
                x.get_swap_tx(source_token, destination_token, recipient, amount, slippage, chain_id, decimals)
                    .await
            },

            Self::Http(x) => {
                x.get_swap_tx(source_token, destination_token, recipient, amount, slippage, chain_id, decimals)
                    .await
            },
        }));

        metric!(counter[backend_request] = 1, method = "swap");
        metric!(histogram[backend_request_duration_milliseconds] = duration.as_millis(), method = "swap");
        metric!(on error result => counter [ backend_request_error ] = 1, method = "swap");

        result
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{bytes, Address};
    use async_trait::async_trait;
    use swapagent_evm::constants::Token;
    use swapagent_evm::ChainID;

    use crate::mock::MockBackendClient;
    use crate::{ApprovalTxPayload, BackendClient, BackendConfiguration, Error, TxPayload};

    #[derive(Debug)]
    struct MockApprovalOnly;

    #[async_trait]
    impl MockBackendClient for MockApprovalOnly {
        fn new() -> Self {
            Self
        }

        async fn get_approval_tx(&self, _chain_id: ChainID, token_address: Address, _amount: f64, _decimals: u8) -> Result<ApprovalTxPayload, Error> {
            Ok(ApprovalTxPayload {
                response: TxPayload {
                    to: token_address,
                    data: bytes!("095ea7b3"),
                    value: None,
                    gas: None,
                },
            })
        }
    }

    #[tokio::test]
    async fn mock_backend_is_dispatched() {
        let backend = BackendClient::mock::<MockApprovalOnly>();
        let usdc = Token::usdc(&ChainID::Polygon).address;

        let payload = backend.get_approval_tx(ChainID::Polygon, usdc, 10.0, 6).await.unwrap();

        assert_eq!(payload.response.to, usdc);
    }

    #[test]
    fn configuration_requires_endpoint() {
        let configuration: BackendConfiguration = serde_json::from_str(r#"{"endpoint":""}"#).unwrap();

        assert_eq!(configuration.timeout, 10);
        assert!(configuration.validate().is_err());
    }
}
