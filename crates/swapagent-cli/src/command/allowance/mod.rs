use clap::Args;
use swapagent_evm::math::format_units;
use tracing::info;

use crate::command::IntentParameters;
use crate::core::context::Context;
use crate::core::Error;

#[derive(Args, Clone, Debug)]
pub struct AllowanceCommandParameters {
    #[command(flatten)]
    pub intent: IntentParameters,
}

pub async fn command_allowance(context: &Context, params: AllowanceCommandParameters) -> Result<(), Error> {
    let orchestrator = params.intent.prepare(context).await?;

    let snapshot = orchestrator.snapshot().await;
    let decimals = snapshot.decimals_or_default();

    if snapshot.is_native {
        info!("Source token is native, no approval involved");
    } else {
        match snapshot.allowance {
            Some(allowance) => info!("Allowance: {}", format_units(allowance, decimals)?),
            None => info!("Allowance: unknown"),
        }
        info!("Decimals: {}", decimals);
    }

    info!("Approval needed: {}", orchestrator.is_approval_needed().await);

    Ok(())
}
