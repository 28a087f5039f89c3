use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use swapagent_backend::{ApprovalTxPayload, SwapTxPayload};
use swapagent_evm::constants::DEFAULT_SLIPPAGE;

use crate::display::{format_destination_amount, format_interval, IntervalDisplay};
use crate::SwapError;

/// Swap request emitted by the upstream agent. Amounts may come either as JSON
/// numbers or as decimal strings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapIntent {
    #[serde(rename = "src")]
    pub source_token: String,

    #[serde(rename = "dst")]
    pub destination_token: String,

    #[serde(rename = "src_address")]
    pub source_address: Address,

    #[serde(rename = "dst_address")]
    pub destination_address: Address,

    #[serde(rename = "src_amount")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub source_amount: f64,

    #[serde(rename = "dst_amount")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub destination_amount: f64,

    #[serde(default)]
    pub quote: String,

    /// Recurrence in milliseconds, 0 for a one-shot swap
    #[serde(default)]
    pub interval: u64,
}

impl SwapIntent {
    pub fn validate(&self) -> Result<(), SwapError> {
        if !self.source_amount.is_finite() || self.source_amount <= 0.0 {
            return Err(SwapError::InvalidAmount(self.source_amount.to_string()));
        }

        Ok(())
    }

    pub fn is_recurring(&self) -> bool {
        self.interval > 0
    }

    pub fn recurrence(&self) -> Option<IntervalDisplay> {
        self.is_recurring().then(|| format_interval(self.interval))
    }

    /// One line description of the intent
    pub fn summary(&self) -> String {
        let summary = format!(
            "{} {} -> {} {}",
            self.source_amount,
            self.source_token,
            format_destination_amount(self.destination_amount),
            self.destination_token
        );

        match self.recurrence() {
            Some(interval) => format!("{} every {}", summary, interval),
            None => summary,
        }
    }
}

/// Editable state of the swap being prepared
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub amount: f64,
    pub token_address_0: Address,
    pub token_address_1: Address,
    pub approval_tx_payload: Option<ApprovalTxPayload>,
    pub swap_tx_payload: Option<SwapTxPayload>,
    pub slippage: f64,
    pub interval: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            amount: 0.0,
            token_address_0: Address::ZERO,
            token_address_1: Address::ZERO,
            approval_tx_payload: None,
            swap_tx_payload: None,
            slippage: DEFAULT_SLIPPAGE,
            interval: 0,
        }
    }
}

impl FormState {
    /// Seed a fresh form from `intent`. Payloads fetched for a former intent are dropped.
    pub fn reset(&mut self, intent: &SwapIntent, slippage: f64) {
        *self = Self {
            amount: intent.source_amount,
            token_address_0: intent.source_address,
            token_address_1: intent.destination_address,
            approval_tx_payload: None,
            swap_tx_payload: None,
            slippage,
            interval: intent.interval,
        };
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Bytes};
    use serde_json::json;
    use swapagent_backend::TxPayload;

    use super::*;

    fn usdc_to_eth() -> serde_json::Value {
        json!({
            "amount": "100",
            "src": "USDC",
            "dst": "ETH",
            "src_address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "dst_address": "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE",
            "src_amount": 100,
            "dst_amount": "0.0312",
            "quote": "100 USDC for 0.0312 ETH",
            "interval": 3600000
        })
    }

    #[test]
    fn intent_is_parsed_from_upstream_message() {
        let intent: SwapIntent = serde_json::from_value(usdc_to_eth()).unwrap();

        assert_eq!(intent.source_token, "USDC");
        assert_eq!(intent.source_address, address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        assert_eq!(intent.source_amount, 100.0);
        assert_eq!(intent.destination_amount, 0.0312);
        assert_eq!(intent.interval, 3_600_000);
    }

    #[test]
    fn amounts_can_be_strings_or_numbers() {
        let mut message = usdc_to_eth();
        message["src_amount"] = json!("12.5");
        message["dst_amount"] = json!(0.5);

        let intent: SwapIntent = serde_json::from_value(message).unwrap();

        assert_eq!(intent.source_amount, 12.5);
        assert_eq!(intent.destination_amount, 0.5);
    }

    #[test]
    fn interval_defaults_to_one_shot() {
        let mut message = usdc_to_eth();
        message.as_object_mut().unwrap().remove("interval");

        let intent: SwapIntent = serde_json::from_value(message).unwrap();

        assert!(!intent.is_recurring());
        assert_eq!(intent.recurrence(), None);
        assert_eq!(intent.summary(), "100 USDC -> 0.0312 ETH");
    }

    #[test]
    fn recurring_summary_mentions_interval() {
        let intent: SwapIntent = serde_json::from_value(usdc_to_eth()).unwrap();

        assert_eq!(intent.summary(), "100 USDC -> 0.0312 ETH every 1.00 hour");
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut intent: SwapIntent = serde_json::from_value(usdc_to_eth()).unwrap();

        intent.source_amount = 0.0;
        assert!(matches!(intent.validate(), Err(SwapError::InvalidAmount(_))));

        intent.source_amount = f64::NAN;
        assert!(intent.validate().is_err());

        intent.source_amount = 0.01;
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn form_reset_drops_previous_payloads() {
        let intent: SwapIntent = serde_json::from_value(usdc_to_eth()).unwrap();
        let mut form = FormState {
            approval_tx_payload: Some(ApprovalTxPayload {
                response: TxPayload {
                    to: Address::ZERO,
                    data: Bytes::new(),
                    value: None,
                    gas: None,
                },
            }),
            ..FormState::default()
        };

        form.reset(&intent, 0.5);

        assert_eq!(form.amount, 100.0);
        assert_eq!(form.token_address_0, intent.source_address);
        assert_eq!(form.token_address_1, intent.destination_address);
        assert_eq!(form.slippage, 0.5);
        assert_eq!(form.approval_tx_payload, None);
    }
}
