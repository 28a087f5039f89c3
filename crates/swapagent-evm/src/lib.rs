use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use swapagent_common::service::Error as ServiceError;
use thiserror::Error;

pub mod constants;
pub mod contract;
pub mod math;
pub mod transaction;

mod client;
pub use client::RpcClient;

mod network;
pub use network::ChainID;
pub use tracing;

#[cfg(feature = "testing")]
pub mod testing;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid url {0}")]
    URL(String),

    #[error("rpc error {0}")]
    Rpc(String),

    #[error("rpc request timed out")]
    Timeout,

    #[error("could not decode contract response {0}")]
    Decoding(String),

    #[error("invalid amount {0}")]
    InvalidAmount(String),

    #[error("unsupported chain {0}")]
    UnsupportedChain(String),
}

/// EIP-1559 fees, in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFees {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub chain_id: ChainID,
    pub endpoint: String,
    pub timeout: u64,
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.endpoint.is_empty() {
            return Err(ServiceError::new("evm endpoint cannot be empty"));
        }
        if self.timeout == 0 {
            return Err(ServiceError::new("evm timeout must be greater than 0"));
        }
        Ok(())
    }
}

/// Read access to the chain. Every method may fail independently
#[derive(Clone)]
pub enum Client {
    #[cfg(feature = "testing")]
    Mock(std::sync::Arc<dyn testing::MockChainReader>),

    Rpc(RpcClient),
}

impl Client {
    pub fn new(configuration: &Configuration) -> Result<Self, Error> {
        Ok(Self::Rpc(RpcClient::new(&configuration.endpoint, configuration.timeout)?))
    }

    #[cfg(feature = "testing")]
    pub fn mock<I: 'static + testing::MockChainReader>() -> Self {
        Self::Mock(std::sync::Arc::new(I::new()))
    }

    pub async fn fetch_allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, Error> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.fetch_allowance(token, owner, spender).await,

            Self::Rpc(x) => x.fetch_allowance(token, owner, spender).await,
        }
    }

    pub async fn fetch_decimals(&self, token: Address) -> Result<u8, Error> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.fetch_decimals(token).await,

            Self::Rpc(x) => x.fetch_decimals(token).await,
        }
    }

    pub async fn fetch_entry_point_nonce(&self, entry_point: Address, sender: Address) -> Result<U256, Error> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.fetch_entry_point_nonce(entry_point, sender).await,

            Self::Rpc(x) => x.fetch_entry_point_nonce(entry_point, sender).await,
        }
    }

    pub async fn fetch_gas_fees(&self) -> Result<GasFees, Error> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.fetch_gas_fees().await,

            Self::Rpc(x) => x.fetch_gas_fees().await,
        }
    }
}
