#[cfg(feature = "testing")]
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use swapagent_common::service::Error as ServiceError;
use swapagent_common::{log_if_error, measure_duration, metric};
use swapagent_evm::constants::Contract;
use swapagent_evm::transaction::Calls;
use swapagent_evm::{ChainID, Client as EvmClient};
use thiserror::Error;
use tracing::instrument;

pub mod bundler;
pub mod user_operation;

#[cfg(feature = "testing")]
pub mod mock;

pub use bundler::BundlerAccount;
pub use user_operation::{UserOperation, UserOperationReceipt};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    HTTP(#[from] reqwest::Error),

    #[error(transparent)]
    Chain(#[from] swapagent_evm::Error),

    #[error("wrong format error {0}")]
    Format(String),

    #[error("bundler error {0}")]
    Bundler(String),

    #[error("invalid owner key {0}")]
    InvalidKey(String),

    #[error("could not sign user operation {0}")]
    Signing(String),

    #[error("no calls specified in batch")]
    NoCalls,

    #[error("user operation {0} reverted: {1}")]
    Reverted(B256, String),

    #[error("no receipt for user operation {0} before timeout")]
    ReceiptTimeout(B256),

    #[error("internal error {0}")]
    Internal(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmartAccountConfiguration {
    pub bundler_endpoint: String,

    #[serde(default = "SmartAccountConfiguration::default_entry_point")]
    pub entry_point: Address,

    pub address: Address,
    pub owner_private_key: String,

    #[serde(default)]
    pub validation_module: Option<Address>,

    #[serde(default = "SmartAccountConfiguration::default_timeout")]
    pub timeout: u64,

    // Delay between two receipt lookups (in milliseconds)
    #[serde(default = "SmartAccountConfiguration::default_receipt_poll_interval")]
    pub receipt_poll_interval: u64,

    // How long to wait for the operation to be included (in seconds)
    #[serde(default = "SmartAccountConfiguration::default_receipt_timeout")]
    pub receipt_timeout: u64,
}

impl SmartAccountConfiguration {
    fn default_entry_point() -> Address {
        Contract::ENTRY_POINT_V06
    }

    fn default_timeout() -> u64 {
        10
    }

    fn default_receipt_poll_interval() -> u64 {
        2000
    }

    fn default_receipt_timeout() -> u64 {
        120
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.bundler_endpoint.is_empty() {
            return Err(ServiceError::new("bundler endpoint cannot be empty"));
        }
        if self.address == Address::ZERO {
            return Err(ServiceError::new("smart account address cannot be the zero address"));
        }
        if self.receipt_poll_interval == 0 {
            return Err(ServiceError::new("receipt_poll_interval must be greater than 0"));
        }
        if self.receipt_poll_interval / 1000 >= self.receipt_timeout {
            return Err(ServiceError::new("receipt_timeout must be greater than receipt_poll_interval"));
        }
        Ok(())
    }
}

/// Handle on a submitted user operation, resolved once the bundler reports its receipt
pub struct UserOperationHandle {
    hash: B256,
    wait: BoxFuture<'static, Result<UserOperationReceipt, Error>>,
}

impl UserOperationHandle {
    pub fn new(hash: B256, wait: BoxFuture<'static, Result<UserOperationReceipt, Error>>) -> Self {
        Self { hash, wait }
    }

    pub fn hash(&self) -> B256 {
        self.hash
    }

    #[instrument(name = "wait_user_op", skip(self), fields(user_op_hash = %self.hash))]
    pub async fn wait(self) -> Result<UserOperationReceipt, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.wait.await));

        metric!(histogram[user_operation_inclusion_milliseconds] = duration.as_millis(), method = "wait");
        metric!(on error result => counter [ user_operation_error ] = 1, method = "wait");

        result
    }
}

#[derive(Clone)]
pub enum SmartAccountClient {
    #[cfg(feature = "testing")]
    Mock(Arc<dyn mock::MockSmartAccount>),

    Bundler(BundlerAccount),
}

impl SmartAccountClient {
    pub fn new(configuration: &SmartAccountConfiguration, chain_id: ChainID, chain: EvmClient) -> Result<Self, Error> {
        BundlerAccount::new(configuration, chain_id, chain).map(Self::Bundler)
    }

    #[cfg(feature = "testing")]
    pub fn mock<I: 'static + mock::MockSmartAccount>() -> Self {
        Self::Mock(Arc::new(I::new()))
    }

    pub fn address(&self) -> Address {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.address(),

            Self::Bundler(x) => x.address(),
        }
    }

    pub async fn build_user_op(&self, calls: &Calls) -> Result<UserOperation, Error> {
        let (result, duration) = measure_duration!(log_if_error!(match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.build_user_op(calls).await,

            Self::Bundler(x) => x.build_user_op(calls).await,
        }));

        metric!(histogram[user_operation_duration_milliseconds] = duration.as_millis(), method = "build");
        metric!(on error result => counter [ user_operation_error ] = 1, method = "build");

        result
    }

    pub async fn send_user_op(&self, operation: UserOperation) -> Result<UserOperationHandle, Error> {
        let (result, duration) = measure_duration!(log_if_error!(match self {
            #[cfg(feature = "testing")]
            Self::Mock(x) => x.send_user_op(operation).await,

            Self::Bundler(x) => x.send_user_op(operation).await,
        }));

        metric!(counter[user_operation_sent] = 1, method = "send");
        metric!(histogram[user_operation_duration_milliseconds] = duration.as_millis(), method = "send");
        metric!(on error result => counter [ user_operation_error ] = 1, method = "send");

        result
    }
}
