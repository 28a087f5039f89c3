use std::fmt::Debug;

use alloy_primitives::Address;
use async_trait::async_trait;
use swapagent_evm::ChainID;

use crate::models::{ApprovalTxPayload, SwapTxPayload};
use crate::Error;

#[async_trait]
pub trait MockBackendClient: 'static + Send + Sync + Debug {
    fn new() -> Self
    where
        Self: Sized;

    async fn get_approval_tx(&self, _chain_id: ChainID, _token_address: Address, _amount: f64, _decimals: u8) -> Result<ApprovalTxPayload, Error> {
        unimplemented!()
    }

    #[allow(clippy::too_many_arguments)]
    async fn get_swap_tx(
        &self,
        _source_token: Address,
        _destination_token: Address,
        _recipient: Address,
        _amount: f64,
        _slippage: f64,
        _chain_id: ChainID,
        _decimals: u8,
    ) -> Result<SwapTxPayload, Error> {
        unimplemented!()
    }
}
