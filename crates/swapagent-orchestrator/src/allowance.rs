use alloy_primitives::U256;
use serde::Serialize;
use swapagent_evm::constants::DEFAULT_DECIMALS;
use swapagent_evm::math::parse_units;

use crate::SwapError;

/// Last known allowance of the router on the source token. A `None` field means
/// the read failed or was never made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllowanceSnapshot {
    pub allowance: Option<U256>,
    pub decimals: Option<u8>,
    pub is_native: bool,
}

impl AllowanceSnapshot {
    pub fn native() -> Self {
        Self {
            allowance: None,
            decimals: None,
            is_native: true,
        }
    }

    pub fn decimals_or_default(&self) -> u8 {
        self.decimals.unwrap_or(DEFAULT_DECIMALS)
    }

    /// Smallest-unit value of `amount`, rounded down
    pub fn required_amount(&self, amount: f64) -> Result<U256, SwapError> {
        parse_units(amount, self.decimals_or_default()).map_err(|e| SwapError::InvalidAmount(e.to_string()))
    }

    pub fn is_approval_needed(&self, required: U256) -> bool {
        if self.is_native {
            return false;
        }

        match self.allowance {
            Some(allowance) => allowance < required,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erc20(allowance: Option<u64>, decimals: Option<u8>) -> AllowanceSnapshot {
        AllowanceSnapshot {
            allowance: allowance.map(U256::from),
            decimals,
            is_native: false,
        }
    }

    #[test]
    fn required_amount_uses_token_decimals() {
        let snapshot = erc20(None, Some(6));

        assert_eq!(snapshot.required_amount(100.0).unwrap(), U256::from(100_000_000u64));
    }

    #[test]
    fn required_amount_defaults_to_18_decimals() {
        let snapshot = erc20(None, None);

        assert_eq!(snapshot.required_amount(1.5).unwrap(), U256::from(1_500_000_000_000_000_000u128));
    }

    #[test]
    fn required_amount_rounds_down() {
        let snapshot = erc20(None, Some(2));

        assert_eq!(snapshot.required_amount(1.239).unwrap(), U256::from(123u64));
    }

    #[test]
    fn required_amount_rejects_invalid_amounts() {
        let snapshot = erc20(None, Some(6));

        assert!(matches!(snapshot.required_amount(-1.0), Err(SwapError::InvalidAmount(_))));
        assert!(snapshot.required_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn native_token_never_needs_approval() {
        let mut snapshot = AllowanceSnapshot::native();
        assert!(!snapshot.is_approval_needed(U256::MAX));

        snapshot.allowance = Some(U256::ZERO);
        assert!(!snapshot.is_approval_needed(U256::from(1u64)));
    }

    #[test]
    fn sufficient_allowance_does_not_need_approval() {
        let snapshot = erc20(Some(100_000_000), Some(6));

        assert!(!snapshot.is_approval_needed(U256::from(100_000_000u64)));
        assert!(!snapshot.is_approval_needed(U256::from(1u64)));
    }

    #[test]
    fn insufficient_allowance_needs_approval() {
        let snapshot = erc20(Some(99_999_999), Some(6));

        assert!(snapshot.is_approval_needed(U256::from(100_000_000u64)));
    }

    #[test]
    fn unknown_allowance_needs_approval() {
        let snapshot = erc20(None, Some(6));

        assert!(snapshot.is_approval_needed(U256::from(1u64)));
    }

    #[test]
    fn zero_allowance_covers_zero_requirement() {
        let snapshot = erc20(Some(0), Some(6));

        assert!(!snapshot.is_approval_needed(U256::ZERO));
    }
}
