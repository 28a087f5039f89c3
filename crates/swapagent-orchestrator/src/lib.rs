use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use swapagent_common::service::Error as ServiceError;
use swapagent_evm::constants::{Contract, DEFAULT_SLIPPAGE};
use thiserror::Error;

pub mod allowance;
pub mod display;
pub mod intent;
mod orchestrator;
pub mod surface;

pub use allowance::AllowanceSnapshot;
pub use intent::{FormState, SwapIntent};
pub use orchestrator::{CancelLeg, SubmitOutcome, SwapOrchestrator};
pub use surface::ActionState;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
    #[error("smart account client is not ready")]
    ClientNotReady,

    #[error("no swap intent received")]
    NoIntent,

    #[error("could not fetch transaction payload {0}")]
    PayloadFetchFailure(String),

    #[error("user operation failed {0}")]
    SubmissionFailure(String),

    #[error("invalid amount {0}")]
    InvalidAmount(String),

    #[error("invalid slippage {0}")]
    InvalidSlippage(String),
}

impl From<swapagent_backend::Error> for SwapError {
    fn from(value: swapagent_backend::Error) -> Self {
        Self::PayloadFetchFailure(value.to_string())
    }
}

impl From<swapagent_account::Error> for SwapError {
    fn from(value: swapagent_account::Error) -> Self {
        Self::SubmissionFailure(value.to_string())
    }
}

/// Highest slippage tolerance accepted, in percent
pub const MAX_SLIPPAGE: f64 = 50.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapConfiguration {
    /// Default slippage tolerance, in percent
    #[serde(default = "SwapConfiguration::default_slippage")]
    pub slippage: f64,

    /// Spender whose allowance is checked before swapping
    #[serde(default = "SwapConfiguration::default_router")]
    pub router: Address,
}

impl Default for SwapConfiguration {
    fn default() -> Self {
        Self {
            slippage: Self::default_slippage(),
            router: Self::default_router(),
        }
    }
}

impl SwapConfiguration {
    fn default_slippage() -> f64 {
        DEFAULT_SLIPPAGE
    }

    fn default_router() -> Address {
        Contract::ONE_INCH_ROUTER
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_slippage(self.slippage).map_err(|e| ServiceError::new(&e.to_string()))?;
        if self.router == Address::ZERO {
            return Err(ServiceError::new("router cannot be the zero address"));
        }
        Ok(())
    }
}

pub(crate) fn validate_slippage(slippage: f64) -> Result<(), SwapError> {
    if !slippage.is_finite() || slippage <= 0.0 || slippage > MAX_SLIPPAGE {
        return Err(SwapError::InvalidSlippage(slippage.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let configuration = SwapConfiguration::default();

        assert_eq!(configuration.slippage, 0.1);
        assert_eq!(configuration.router, Contract::ONE_INCH_ROUTER);
        assert!(configuration.validate().is_ok());
    }

    #[test]
    fn slippage_must_be_in_range() {
        let mut configuration = SwapConfiguration::default();

        configuration.slippage = 0.0;
        assert!(configuration.validate().is_err());

        configuration.slippage = 51.0;
        assert!(configuration.validate().is_err());

        configuration.slippage = 50.0;
        assert!(configuration.validate().is_ok());
    }

    #[test]
    fn configuration_defaults_when_omitted() {
        let configuration: SwapConfiguration = serde_json::from_str("{}").unwrap();

        assert_eq!(configuration.slippage, DEFAULT_SLIPPAGE);
        assert_eq!(configuration.router, Contract::ONE_INCH_ROUTER);
    }

    #[test]
    fn collaborator_errors_are_classified() {
        let backend = swapagent_backend::Error::Status(500, "internal".to_string());
        let account = swapagent_account::Error::NoCalls;

        assert!(matches!(SwapError::from(backend), SwapError::PayloadFetchFailure(_)));
        assert!(matches!(SwapError::from(account), SwapError::SubmissionFailure(_)));
    }
}
