use alloy_primitives::{keccak256, Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// ERC-4337 user operation, as understood by EntryPoint v0.6
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

impl UserOperation {
    /// Hash signed by the account owner. Commits to every field but the signature,
    /// to the entry point and to the chain.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        let packed = (
            self.sender,
            self.nonce,
            keccak256(&self.init_code),
            keccak256(&self.call_data),
            self.call_gas_limit,
            self.verification_gas_limit,
            self.pre_verification_gas,
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
            keccak256(&self.paymaster_and_data),
        )
            .abi_encode();

        keccak256((keccak256(packed), entry_point, U256::from(chain_id)).abi_encode())
    }
}

/// Gas limits returned by `eth_estimateUserOperationGas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimate {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: B256,
    pub success: bool,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub actual_gas_cost: U256,

    #[serde(default)]
    pub actual_gas_used: U256,

    pub receipt: TransactionReceipt,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes, Bytes, U256};

    use super::UserOperation;

    fn operation() -> UserOperation {
        UserOperation {
            sender: address!("00000000000000000000000000000000000a11ce"),
            nonce: U256::from(3),
            init_code: Bytes::new(),
            call_data: bytes!("47e1da2a"),
            call_gas_limit: U256::from(100_000),
            verification_gas_limit: U256::from(200_000),
            pre_verification_gas: U256::from(50_000),
            max_fee_per_gas: U256::from(2_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            paymaster_and_data: Bytes::new(),
            signature: Bytes::new(),
        }
    }

    #[test]
    fn hash_ignores_signature() {
        let unsigned = operation();
        let mut signed = operation();
        signed.signature = bytes!("deadbeef");

        let entry_point = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
        assert_eq!(unsigned.hash(entry_point, 8453), signed.hash(entry_point, 8453));
    }

    #[test]
    fn hash_binds_chain_and_nonce() {
        let entry_point = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
        let base = operation().hash(entry_point, 8453);

        let mut next = operation();
        next.nonce = U256::from(4);

        assert_ne!(base, operation().hash(entry_point, 137));
        assert_ne!(base, next.hash(entry_point, 8453));
    }

    #[test]
    fn serializes_with_bundler_field_names() {
        let value = serde_json::to_value(operation()).unwrap();

        assert_eq!(value["nonce"], "0x3");
        assert!(value.get("callGasLimit").is_some());
        assert!(value.get("paymasterAndData").is_some());
    }
}
