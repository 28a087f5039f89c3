use clap::{Parser, Subcommand};
use swapagent_common::service::monitoring::Metric;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::command::allowance::{command_allowance, AllowanceCommandParameters};
use crate::command::cancel::{command_cancel, CancelCommandParameters};
use crate::command::swap::{command_swap, SwapCommandParameters};
use crate::core::context::Context;
use crate::core::{Error, Fmt};

mod command;
mod core;

#[derive(Parser)]
#[command(name = "swapagent", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Approve if needed and swap, as a single user operation")]
    Swap(SwapCommandParameters),

    #[command(about = "Show the router allowance on the source token of an intent")]
    Allowance(AllowanceCommandParameters),

    #[command(about = "Reject an intent and print the leg being cancelled")]
    Cancel(CancelCommandParameters),
}

impl Commands {
    fn profile(&self) -> Option<&str> {
        match self {
            Commands::Swap(params) => params.intent.profile.as_deref(),
            Commands::Allowance(params) => params.intent.profile.as_deref(),
            Commands::Cancel(params) => params.intent.profile.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let context = Context::load(cli.command.profile())?;

    let metric_layer = context.configuration.prometheus.as_ref().map(|x| Metric::layer(x));
    let fmt_layer = Fmt::layer(&context.configuration.verbosity);

    let subscriber = Registry::default().with(fmt_layer).with(metric_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Configuration(e.to_string()))?;

    match cli.command {
        Commands::Swap(params) => command_swap(&context, params).await?,
        Commands::Allowance(params) => command_allowance(&context, params).await?,
        Commands::Cancel(params) => command_cancel(&context, params).await?,
    }

    Ok(())
}
