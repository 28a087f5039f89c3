use std::fs;
use std::path::PathBuf;

use clap::Args;
use swapagent_orchestrator::{SwapIntent, SwapOrchestrator};

use crate::core::context::Context;
use crate::core::Error;

pub mod allowance;
pub mod cancel;
pub mod swap;

#[derive(Args, Clone, Debug)]
pub struct IntentParameters {
    /// Configuration profile, defaults to `SWAPAGENT_PROFILE`
    #[clap(long)]
    pub profile: Option<String>,

    /// JSON file holding the swap intent
    #[clap(long)]
    pub intent: PathBuf,
}

impl IntentParameters {
    pub fn load_intent(&self) -> Result<SwapIntent, Error> {
        let data = fs::read(&self.intent).map_err(|e| Error::Intent(format!("could not read {}: {}", self.intent.display(), e)))?;

        serde_json::from_slice(&data).map_err(|e| Error::Intent(e.to_string()))
    }

    /// Build an orchestrator from the profile and hand it the intent
    pub async fn prepare(&self, context: &Context) -> Result<SwapOrchestrator, Error> {
        let intent = self.load_intent()?;
        let orchestrator = context.orchestrator()?;

        orchestrator.on_intent(intent).await?;
        orchestrator.refresh_allowance().await;

        Ok(orchestrator)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parameters(content: &str) -> (tempfile::NamedTempFile, IntentParameters) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();

        let parameters = IntentParameters {
            profile: None,
            intent: file.path().to_path_buf(),
        };

        (file, parameters)
    }

    #[test]
    fn intent_is_loaded_from_file() {
        let (_file, parameters) = parameters(
            r#"{
                "src": "USDC",
                "dst": "ETH",
                "src_address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                "dst_address": "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE",
                "src_amount": 100,
                "dst_amount": "0.0312"
            }"#,
        );

        let intent = parameters.load_intent().unwrap();

        assert_eq!(intent.source_token, "USDC");
        assert_eq!(intent.source_amount, 100.0);
    }

    #[test]
    fn malformed_intent_is_reported() {
        let (_file, parameters) = parameters(r#"{ "src": "USDC" }"#);

        assert!(matches!(parameters.load_intent(), Err(Error::Intent(_))));
    }
}
