mod rpc;

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolValue;
use futures::FutureExt;
use serde_json::json;
use swapagent_evm::transaction::Calls;
use swapagent_evm::{ChainID, Client as EvmClient};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use crate::bundler::rpc::BundlerRpc;
use crate::user_operation::{UserOperation, UserOperationGasEstimate, UserOperationReceipt};
use crate::{Error, SmartAccountConfiguration, UserOperationHandle};

/// ECDSA signature of the right shape, accepted by validation during gas estimation
const DUMMY_SIGNATURE: [u8; 65] = hex!("fffffffffffffffffffffffffffffff000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c");

/// Smart account submitting batches through an ERC-4337 bundler
#[derive(Clone)]
pub struct BundlerAccount {
    address: Address,
    entry_point: Address,
    validation_module: Option<Address>,
    chain_id: ChainID,

    owner: PrivateKeySigner,
    chain: EvmClient,
    bundler: BundlerRpc,

    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl BundlerAccount {
    pub fn new(configuration: &SmartAccountConfiguration, chain_id: ChainID, chain: EvmClient) -> Result<Self, Error> {
        let owner = PrivateKeySigner::from_str(&configuration.owner_private_key).map_err(|e| Error::InvalidKey(e.to_string()))?;

        Ok(Self {
            address: configuration.address,
            entry_point: configuration.entry_point,
            validation_module: configuration.validation_module,
            chain_id,

            owner,
            chain,
            bundler: BundlerRpc::new(&configuration.bundler_endpoint, configuration.timeout)?,

            receipt_poll_interval: Duration::from_millis(configuration.receipt_poll_interval),
            receipt_timeout: Duration::from_secs(configuration.receipt_timeout),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Encode an owner signature the way the account's validation expects it
    fn encode_signature(&self, signature: &[u8]) -> Bytes {
        match self.validation_module {
            Some(module) => Bytes::from((Bytes::copy_from_slice(signature), module).abi_encode_params()),
            None => Bytes::copy_from_slice(signature),
        }
    }

    fn sign(&self, operation: &UserOperation) -> Result<Bytes, Error> {
        let hash = operation.hash(self.entry_point, self.chain_id.as_id());
        let signature = self
            .owner
            .sign_message_sync(hash.as_slice())
            .map_err(|e| Error::Signing(e.to_string()))?;

        Ok(self.encode_signature(&signature.as_bytes()))
    }

    #[instrument(name = "build_user_op", skip(self, calls), fields(calls = calls.len()))]
    pub async fn build_user_op(&self, calls: &Calls) -> Result<UserOperation, Error> {
        if calls.is_empty() {
            return Err(Error::NoCalls);
        }

        let nonce = self.chain.fetch_entry_point_nonce(self.entry_point, self.address).await?;
        let fees = self.chain.fetch_gas_fees().await?;

        let mut operation = UserOperation {
            sender: self.address,
            nonce,
            init_code: Bytes::new(),
            call_data: calls.as_execute_batch_calldata(),
            call_gas_limit: U256::ZERO,
            verification_gas_limit: U256::ZERO,
            pre_verification_gas: U256::ZERO,
            max_fee_per_gas: U256::from(fees.max_fee_per_gas),
            max_priority_fee_per_gas: U256::from(fees.max_priority_fee_per_gas),
            paymaster_and_data: Bytes::new(),
            signature: self.encode_signature(&DUMMY_SIGNATURE),
        };

        let estimate: UserOperationGasEstimate = self
            .bundler
            .request("eth_estimateUserOperationGas", json!([operation, self.entry_point]))
            .await?
            .ok_or(Error::Bundler("empty gas estimate".to_string()))?;

        operation.call_gas_limit = estimate.call_gas_limit;
        operation.verification_gas_limit = estimate.verification_gas_limit;
        operation.pre_verification_gas = estimate.pre_verification_gas;
        operation.signature = self.sign(&operation)?;

        debug!(nonce = %operation.nonce, call_gas_limit = %operation.call_gas_limit, "user operation built");
        Ok(operation)
    }

    #[instrument(name = "send_user_op", skip(self, operation), fields(sender = %operation.sender))]
    pub async fn send_user_op(&self, operation: UserOperation) -> Result<UserOperationHandle, Error> {
        let hash: B256 = self
            .bundler
            .request("eth_sendUserOperation", json!([operation, self.entry_point]))
            .await?
            .ok_or(Error::Bundler("no user operation hash returned".to_string()))?;

        info!(user_op_hash = %hash, "user operation sent");

        let this = self.clone();
        Ok(UserOperationHandle::new(hash, async move { this.wait_for_receipt(hash).await }.boxed()))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<UserOperationReceipt, Error> {
        let deadline = Instant::now() + self.receipt_timeout;

        loop {
            let receipt: Option<UserOperationReceipt> = self.bundler.request("eth_getUserOperationReceipt", json!([hash])).await?;

            if let Some(receipt) = receipt {
                if !receipt.success {
                    let reason = receipt.reason.unwrap_or_else(|| "reverted".to_string());
                    return Err(Error::Reverted(hash, reason));
                }

                return Ok(receipt);
            }

            if Instant::now() >= deadline {
                return Err(Error::ReceiptTimeout(hash));
            }

            sleep(self.receipt_poll_interval).await;
        }
    }
}
