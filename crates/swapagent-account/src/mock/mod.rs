use std::fmt::Debug;

use alloy_primitives::Address;
use async_trait::async_trait;
use swapagent_evm::transaction::Calls;

use crate::user_operation::UserOperation;
use crate::{Error, UserOperationHandle};

#[async_trait]
pub trait MockSmartAccount: 'static + Send + Sync + Debug {
    fn new() -> Self
    where
        Self: Sized;

    fn address(&self) -> Address {
        Address::ZERO
    }

    async fn build_user_op(&self, _calls: &Calls) -> Result<UserOperation, Error> {
        unimplemented!()
    }

    async fn send_user_op(&self, _operation: UserOperation) -> Result<UserOperationHandle, Error> {
        unimplemented!()
    }
}
