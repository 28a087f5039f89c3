use thiserror::Error;

pub mod context;

mod tracing;
pub use tracing::Fmt;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error {0}")]
    Configuration(String),

    #[error("invalid intent {0}")]
    Intent(String),

    #[error(transparent)]
    Evm(#[from] swapagent_evm::Error),

    #[error(transparent)]
    Backend(#[from] swapagent_backend::Error),

    #[error(transparent)]
    Account(#[from] swapagent_account::Error),

    #[error(transparent)]
    Swap(#[from] swapagent_orchestrator::SwapError),
}

impl From<swapagent_common::service::Error> for Error {
    fn from(value: swapagent_common::service::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}
