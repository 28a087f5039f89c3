use std::time::Duration;

use alloy_primitives::aliases::U192;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use reqwest::Url;
use swapagent_common::{log_if_error, measure_duration, metric, warn_if_error};
use tokio::time::timeout;
use tracing::instrument;

use crate::contract::{IEntryPoint, IERC20};
use crate::{Error, GasFees};

/// JSON-RPC reader bound to a single EVM endpoint
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(endpoint: &str, timeout: u64) -> Result<Self, Error> {
        let url = Url::parse(endpoint).map_err(|e| Error::URL(e.to_string()))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            timeout: Duration::from_secs(timeout),
        })
    }

    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Bytes, Error> {
        let request = TransactionRequest::default().to(to).input(data.into());

        timeout(self.timeout, self.provider.call(request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::Rpc(e.to_string()))
    }

    /// Call `allowance(owner, spender)` on the given `token`
    #[instrument(name = "fetch_allowance", skip(self))]
    pub async fn fetch_allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, Error> {
        let data = IERC20::allowanceCall { owner, spender }.abi_encode();

        let (result, duration) = measure_duration!(warn_if_error!(self.eth_call(token, data).await));
        metric!(histogram[evm_rpc] = duration.as_millis(), method = "allowance");
        metric!(on error result => counter [ evm_rpc_error ] = 1, method = "allowance");

        IERC20::allowanceCall::abi_decode_returns(&result?).map_err(|e| Error::Decoding(e.to_string()))
    }

    /// Call `decimals()` on the given `token`
    #[instrument(name = "fetch_decimals", skip(self))]
    pub async fn fetch_decimals(&self, token: Address) -> Result<u8, Error> {
        let data = IERC20::decimalsCall {}.abi_encode();

        let (result, duration) = measure_duration!(warn_if_error!(self.eth_call(token, data).await));
        metric!(histogram[evm_rpc] = duration.as_millis(), method = "decimals");
        metric!(on error result => counter [ evm_rpc_error ] = 1, method = "decimals");

        IERC20::decimalsCall::abi_decode_returns(&result?).map_err(|e| Error::Decoding(e.to_string()))
    }

    /// Fetch the nonce of `sender` on the given `entry_point` (key 0)
    #[instrument(name = "fetch_entry_point_nonce", skip(self))]
    pub async fn fetch_entry_point_nonce(&self, entry_point: Address, sender: Address) -> Result<U256, Error> {
        let data = IEntryPoint::getNonceCall { sender, key: U192::ZERO }.abi_encode();

        let (result, duration) = measure_duration!(log_if_error!(self.eth_call(entry_point, data).await));
        metric!(histogram[evm_rpc] = duration.as_millis(), method = "get_nonce");
        metric!(on error result => counter [ evm_rpc_error ] = 1, method = "get_nonce");

        IEntryPoint::getNonceCall::abi_decode_returns(&result?).map_err(|e| Error::Decoding(e.to_string()))
    }

    /// Fetch current fees. The max fee leaves room for the tip on top of the node's gas price
    #[instrument(name = "fetch_gas_fees", skip(self))]
    pub async fn fetch_gas_fees(&self) -> Result<GasFees, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.fetch_raw_gas_fees().await));
        metric!(histogram[evm_rpc] = duration.as_millis(), method = "gas_fees");
        metric!(on error result => counter [ evm_rpc_error ] = 1, method = "gas_fees");

        let (gas_price, priority_fee) = result?;
        Ok(GasFees {
            max_fee_per_gas: gas_price.saturating_add(priority_fee),
            max_priority_fee_per_gas: priority_fee,
        })
    }

    async fn fetch_raw_gas_fees(&self) -> Result<(u128, u128), Error> {
        let gas_price = timeout(self.timeout, self.provider.get_gas_price())
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::Rpc(e.to_string()))?;

        let priority_fee = timeout(self.timeout, self.provider.get_max_priority_fee_per_gas())
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::Rpc(e.to_string()))?;

        Ok((gas_price, priority_fee))
    }
}
