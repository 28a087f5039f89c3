use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use swapagent_evm::transaction::Call;

/// Transaction returned by the backend. Only `to` and `data` are required, the
/// aggregator may add `value` (decimal string) and a gas hint
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPayload {
    pub to: Address,
    pub data: Bytes,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub value: Option<U256>,

    #[serde(default)]
    pub gas: Option<u64>,
}

impl TxPayload {
    pub fn as_call(&self) -> Call {
        Call {
            to: self.to,
            data: self.data.clone(),
            value: self.value.unwrap_or(U256::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTxPayload {
    pub response: TxPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapTxPayload {
    pub tx: TxPayload,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApprovalRequest {
    pub chain_id: u64,
    pub amount: f64,
    pub token_address: Address,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SwapRequest {
    pub src: Address,
    pub dst: Address,
    pub wallet_address: Address,
    pub amount: f64,
    pub slippage: f64,
    pub chain_id: u64,
    pub decimals: u8,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::{ApprovalTxPayload, SwapTxPayload};

    #[test]
    fn approval_payload_is_read_from_response_field() {
        let payload: ApprovalTxPayload = serde_json::from_str(
            r#"{"response":{"to":"0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48","data":"0x095ea7b3","gasPrice":"1000","value":"0"}}"#,
        )
        .unwrap();

        assert_eq!(payload.response.value, Some(U256::ZERO));
        assert_eq!(payload.response.as_call().data.len(), 4);
    }

    #[test]
    fn swap_payload_carries_native_value() {
        let payload: SwapTxPayload = serde_json::from_str(
            r#"{"tx":{"to":"0x111111125421cA6dc452d289314280a0f8842A65","data":"0x12aa3caf","value":"1000000000000000000","gas":210000}}"#,
        )
        .unwrap();

        let call = payload.tx.as_call();
        assert_eq!(call.value, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(payload.tx.gas, Some(210000));
    }

    #[test]
    fn missing_value_means_zero() {
        let payload: SwapTxPayload =
            serde_json::from_str(r#"{"tx":{"to":"0x111111125421cA6dc452d289314280a0f8842A65","data":"0x12aa3caf"}}"#).unwrap();

        assert_eq!(payload.tx.as_call().value, U256::ZERO);
    }
}
