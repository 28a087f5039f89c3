use std::ops::Deref;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::contract::ISmartAccount;

/// Single contract call of a batch
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    pub to: Address,
    pub data: Bytes,

    #[serde(default)]
    pub value: U256,
}

impl Call {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self { to, data, value: U256::ZERO }
    }
}

/// Ordered list of calls executed atomically by the smart account
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Calls(Vec<Call>);

impl Deref for Calls {
    type Target = Vec<Call>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Calls {
    pub fn new(calls: Vec<Call>) -> Self {
        Self(calls)
    }

    pub fn empty() -> Self {
        Self(vec![])
    }

    pub fn push(&mut self, other: Call) {
        self.0.push(other)
    }

    /// Encode the batch as `executeBatch(dest, value, func)` on the smart account
    pub fn as_execute_batch_calldata(&self) -> Bytes {
        let call = ISmartAccount::executeBatchCall {
            dest: self.0.iter().map(|x| x.to).collect(),
            value: self.0.iter().map(|x| x.value).collect(),
            func: self.0.iter().map(|x| x.data.clone()).collect(),
        };

        Bytes::from(call.abi_encode())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes};
    use alloy_sol_types::SolCall;

    use super::*;

    #[test]
    fn calls_keep_insertion_order() {
        let mut calls = Calls::empty();
        calls.push(Call::new(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), bytes!("095ea7b3")));
        calls.push(Call::new(address!("111111125421cA6dc452d289314280a0f8842A65"), bytes!("12aa3caf")));

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].to, address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        assert_eq!(calls[1].to, address!("111111125421cA6dc452d289314280a0f8842A65"));
    }

    #[test]
    fn execute_batch_calldata_decodes_back() {
        let calls = Calls::new(vec![
            Call::new(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), bytes!("095ea7b3")),
            Call::new(address!("111111125421cA6dc452d289314280a0f8842A65"), bytes!("12aa3caf")),
        ]);

        let calldata = calls.as_execute_batch_calldata();
        assert_eq!(&calldata[..4], &ISmartAccount::executeBatchCall::SELECTOR);

        let decoded = ISmartAccount::executeBatchCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.dest, vec![calls[0].to, calls[1].to]);
        assert_eq!(decoded.func[1], calls[1].data);
    }

    #[test]
    fn value_defaults_to_zero_when_missing() {
        let call: Call = serde_json::from_str(r#"{"to":"0x111111125421cA6dc452d289314280a0f8842A65","data":"0x12aa3caf"}"#).unwrap();
        assert_eq!(call.value, U256::ZERO);
    }
}
