use std::fmt::Debug;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::{Error, GasFees};

#[async_trait]
pub trait MockChainReader: 'static + Send + Sync + Debug {
    fn new() -> Self
    where
        Self: Sized;

    async fn fetch_allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256, Error> {
        unimplemented!()
    }

    async fn fetch_decimals(&self, _token: Address) -> Result<u8, Error> {
        unimplemented!()
    }

    async fn fetch_entry_point_nonce(&self, _entry_point: Address, _sender: Address) -> Result<U256, Error> {
        unimplemented!()
    }

    async fn fetch_gas_fees(&self) -> Result<GasFees, Error> {
        unimplemented!()
    }
}

/// Chain reader answering with a fixed allowance and token decimals
#[derive(Debug, Clone)]
pub struct MockFixedAllowance {
    pub allowance: U256,
    pub decimals: u8,
}

#[async_trait]
impl MockChainReader for MockFixedAllowance {
    fn new() -> Self {
        Self {
            allowance: U256::ZERO,
            decimals: 6,
        }
    }

    async fn fetch_allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256, Error> {
        Ok(self.allowance)
    }

    async fn fetch_decimals(&self, _token: Address) -> Result<u8, Error> {
        Ok(self.decimals)
    }

    async fn fetch_entry_point_nonce(&self, _entry_point: Address, _sender: Address) -> Result<U256, Error> {
        Ok(U256::ZERO)
    }

    async fn fetch_gas_fees(&self) -> Result<GasFees, Error> {
        Ok(GasFees {
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
        })
    }
}

/// Chain reader whose node is unreachable
#[derive(Debug, Clone)]
pub struct MockUnreachableNode;

#[async_trait]
impl MockChainReader for MockUnreachableNode {
    fn new() -> Self {
        Self
    }

    async fn fetch_allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256, Error> {
        Err(Error::Rpc("connection refused".to_string()))
    }

    async fn fetch_decimals(&self, _token: Address) -> Result<u8, Error> {
        Err(Error::Rpc("connection refused".to_string()))
    }
}
