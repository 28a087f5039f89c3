use alloy_primitives::Address;
use clap::Args;
use swapagent_orchestrator::SubmitOutcome;
use tracing::{info, warn};

use crate::command::IntentParameters;
use crate::core::context::Context;
use crate::core::Error;

#[derive(Args, Clone, Debug)]
pub struct SwapCommandParameters {
    #[command(flatten)]
    pub intent: IntentParameters,

    /// Slippage tolerance in percent, overrides the profile
    #[clap(long)]
    pub slippage: Option<f64>,

    /// Receiver of the swapped tokens, defaults to the smart account
    #[clap(long)]
    pub recipient: Option<Address>,
}

pub async fn command_swap(context: &Context, params: SwapCommandParameters) -> Result<(), Error> {
    let orchestrator = params.intent.prepare(context).await?;
    if let Some(slippage) = params.slippage {
        orchestrator.set_slippage(slippage).await?;
    }

    if let Some(intent) = orchestrator.intent().await {
        info!("🔁 Swapping {}", intent.summary());
    }
    info!("Approval needed: {}", orchestrator.is_approval_needed().await);

    let recipient = params
        .recipient
        .or_else(|| context.configuration.account.as_ref().map(|x| x.address))
        .unwrap_or(Address::ZERO);

    match orchestrator.submit(recipient).await {
        SubmitOutcome::Confirmed(receipt) => {
            info!("✅ Swap included in transaction {} (block {})", receipt.receipt.transaction_hash, receipt.receipt.block_number);
            Ok(())
        },
        SubmitOutcome::Failed(e) => Err(Error::Swap(e)),
        SubmitOutcome::Ignored(state) => {
            warn!("Swap not submitted, action is {:?}", state);
            Ok(())
        },
    }
}
