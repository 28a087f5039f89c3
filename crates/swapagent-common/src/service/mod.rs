use thiserror::Error;

pub mod monitoring;

pub use tracing;

#[macro_export]
macro_rules! log_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::service::tracing::error!("{}", e);
                Err(e)
            },
        }
    };
}

/// Same as [`log_if_error`] but emits a warning. Used for reads whose failure
/// only means that data is not available yet.
#[macro_export]
macro_rules! warn_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::service::tracing::warn!("{}", e);
                Err(e)
            },
        }
    };
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct Error(String);

impl Error {
    pub fn new(s: &str) -> Error {
        Error(s.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[derive(thiserror::Error, Debug)]
    #[error("inner {0}")]
    struct Inner(u8);

    #[test]
    fn error_keeps_message() {
        assert_eq!(Error::new("slippage must be positive").to_string(), "slippage must be positive");
        assert_eq!(Error::from(Inner(4)).to_string(), "inner 4");
    }

    #[test]
    fn log_if_error_forwards_result() {
        let ok: Result<u8, Error> = log_if_error!(Ok::<u8, Error>(3));
        assert_eq!(ok.unwrap(), 3);

        let err: Result<u8, Error> = log_if_error!(Err::<u8, Error>(Error::new("boom")));
        assert_eq!(err.unwrap_err().to_string(), "boom");
    }
}
