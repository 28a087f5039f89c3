use clap::Args;
use tracing::info;

use crate::command::IntentParameters;
use crate::core::context::Context;
use crate::core::Error;

#[derive(Args, Clone, Debug)]
pub struct CancelCommandParameters {
    #[command(flatten)]
    pub intent: IntentParameters,
}

pub async fn command_cancel(context: &Context, params: CancelCommandParameters) -> Result<(), Error> {
    let orchestrator = params.intent.prepare(context).await?;

    let leg = orchestrator.cancel().await;
    info!("Cancelled {:?} leg", leg);
    println!("{}", leg.code());

    Ok(())
}
