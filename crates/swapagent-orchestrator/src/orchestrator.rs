use alloy_primitives::Address;
use swapagent_account::{SmartAccountClient, UserOperationReceipt};
use swapagent_backend::BackendClient;
use swapagent_common::metric;
use swapagent_evm::constants::Token;
use swapagent_evm::transaction::Calls;
use swapagent_evm::{ChainID, Client as EvmClient};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::allowance::AllowanceSnapshot;
use crate::intent::{FormState, SwapIntent};
use crate::surface::{ActionState, ActionSurface};
use crate::{validate_slippage, SwapConfiguration, SwapError};

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The user operation was included and the action is now disabled
    Confirmed(UserOperationReceipt),

    /// The submission failed, the action stays enabled
    Failed(SwapError),

    /// The action was busy or disabled, nothing was done
    Ignored(ActionState),
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Leg rejected by the user when cancelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelLeg {
    Swap,
    Approval,
}

impl CancelLeg {
    pub fn code(&self) -> u8 {
        match self {
            Self::Swap => 0,
            Self::Approval => 1,
        }
    }
}

/// Intent state captured when a submission starts
struct Submission {
    generation: u64,
    intent: SwapIntent,
    form: FormState,
    snapshot: AllowanceSnapshot,
}

/// Drives a swap intent from allowance check to the confirmation of a single
/// batched user operation.
///
/// One orchestrator handles one intent at a time and at most one submission
/// for it. A new intent replaces the previous one and enables the action again.
pub struct SwapOrchestrator {
    configuration: SwapConfiguration,
    chain_id: ChainID,

    chain: EvmClient,
    backend: BackendClient,
    account: RwLock<Option<SmartAccountClient>>,

    intent: RwLock<Option<SwapIntent>>,
    form: RwLock<FormState>,
    snapshot: RwLock<AllowanceSnapshot>,
    surface: ActionSurface,
}

impl SwapOrchestrator {
    pub fn new(configuration: SwapConfiguration, chain_id: ChainID, chain: EvmClient, backend: BackendClient, account: Option<SmartAccountClient>) -> Self {
        let form = FormState {
            slippage: configuration.slippage,
            ..FormState::default()
        };

        Self {
            configuration,
            chain_id,

            chain,
            backend,
            account: RwLock::new(account),

            intent: RwLock::new(None),
            form: RwLock::new(form),
            snapshot: RwLock::new(AllowanceSnapshot::default()),
            surface: ActionSurface::default(),
        }
    }

    /// Attach the smart account once it becomes available
    pub async fn set_account(&self, account: SmartAccountClient) {
        *self.account.write().await = Some(account);
    }

    pub fn state(&self) -> ActionState {
        self.surface.state()
    }

    pub async fn intent(&self) -> Option<SwapIntent> {
        self.intent.read().await.clone()
    }

    pub async fn form(&self) -> FormState {
        self.form.read().await.clone()
    }

    pub async fn snapshot(&self) -> AllowanceSnapshot {
        *self.snapshot.read().await
    }

    /// Replace the current intent. The form is seeded from `intent`, the allowance
    /// snapshot is cleared and the action is enabled again.
    #[instrument(name = "on_intent", skip(self, intent), fields(src = %intent.source_token, dst = %intent.destination_token))]
    pub async fn on_intent(&self, intent: SwapIntent) -> Result<(), SwapError> {
        intent.validate()?;

        let mut current = self.intent.write().await;
        let mut form = self.form.write().await;
        let mut snapshot = self.snapshot.write().await;

        let slippage = form.slippage;
        form.reset(&intent, slippage);
        *snapshot = if Token::is_native(&intent.source_address) {
            AllowanceSnapshot::native()
        } else {
            AllowanceSnapshot::default()
        };
        *current = Some(intent);

        let generation = self.surface.reset();
        info!(generation, "new swap intent");

        Ok(())
    }

    pub async fn set_slippage(&self, slippage: f64) -> Result<(), SwapError> {
        validate_slippage(slippage)?;
        self.form.write().await.slippage = slippage;
        Ok(())
    }

    /// Read the router allowance and the decimals of the source token. Failed reads
    /// are recorded as missing data.
    #[instrument(name = "refresh_allowance", skip(self))]
    pub async fn refresh_allowance(&self) -> AllowanceSnapshot {
        let (generation, token) = {
            let _intent = self.intent.read().await;
            (self.surface.generation(), self.form.read().await.token_address_0)
        };

        let snapshot = if Token::is_native(&token) {
            AllowanceSnapshot::native()
        } else {
            let owner = self.account.read().await.as_ref().map(|x| x.address()).unwrap_or(Address::ZERO);

            let allowance = self.chain.fetch_allowance(token, owner, self.configuration.router).await;
            if let Err(ref e) = allowance {
                warn!("could not read allowance of {}: {}", token, e);
            }

            let decimals = self.chain.fetch_decimals(token).await;
            if let Err(ref e) = decimals {
                warn!("could not read decimals of {}: {}", token, e);
            }

            AllowanceSnapshot {
                allowance: allowance.ok(),
                decimals: decimals.ok(),
                is_native: false,
            }
        };

        let _intent = self.intent.read().await;
        if self.surface.generation() == generation {
            *self.snapshot.write().await = snapshot;
        }

        snapshot
    }

    pub async fn is_approval_needed(&self) -> bool {
        let amount = self.form.read().await.amount;
        let snapshot = self.snapshot.read().await;

        Self::approval_needed(&snapshot, amount)
    }

    fn approval_needed(snapshot: &AllowanceSnapshot, amount: f64) -> bool {
        match snapshot.required_amount(amount) {
            Ok(required) => snapshot.is_approval_needed(required),
            Err(_) => !snapshot.is_native,
        }
    }

    /// Fetch the payloads, submit them as one user operation and wait for its
    /// receipt. Errors are logged and returned as [`SubmitOutcome::Failed`].
    #[instrument(name = "submit", skip(self))]
    pub async fn submit(&self, recipient: Address) -> SubmitOutcome {
        let Some(_guard) = self.surface.try_acquire() else {
            let state = self.surface.state();
            info!(?state, "submission ignored");
            return SubmitOutcome::Ignored(state);
        };

        let account = self.account.read().await.clone();
        let prepared = match account {
            Some(account) => self.prepare().await.map(|submission| (account, submission)),
            None => Err(SwapError::ClientNotReady),
        };

        let (account, submission) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => return self.failed(e),
        };

        // The intent may have been replaced and cancelled since the busy flag was taken
        if self.surface.is_disabled_at(submission.generation) {
            info!(generation = submission.generation, "submission ignored, intent is disabled");
            return SubmitOutcome::Ignored(ActionState::Disabled);
        }

        let generation = submission.generation;
        match self.execute(&account, recipient, submission).await {
            Ok(receipt) => {
                self.surface.disable(generation);
                metric!(counter[swap_confirmed] = 1, chain = self.chain_id.as_id());
                info!(user_op_hash = %receipt.user_op_hash, generation, "swap confirmed");

                SubmitOutcome::Confirmed(receipt)
            },
            Err(e) => self.failed(e),
        }
    }

    fn failed(&self, e: SwapError) -> SubmitOutcome {
        metric!(counter[swap_failed] = 1, chain = self.chain_id.as_id());
        error!("could not submit swap: {}", e);

        SubmitOutcome::Failed(e)
    }

    /// Read the intent, its form and snapshot and its generation as one view.
    /// `on_intent` replaces all of them while holding the intent lock.
    async fn prepare(&self) -> Result<Submission, SwapError> {
        let intent = self.intent.read().await;
        let current = intent.clone().ok_or(SwapError::NoIntent)?;

        Ok(Submission {
            generation: self.surface.generation(),
            intent: current,
            form: self.form.read().await.clone(),
            snapshot: *self.snapshot.read().await,
        })
    }

    async fn execute(&self, account: &SmartAccountClient, recipient: Address, submission: Submission) -> Result<UserOperationReceipt, SwapError> {
        let Submission {
            generation,
            intent,
            form,
            snapshot,
        } = submission;

        let decimals = snapshot.decimals_or_default();
        let mut calls = Calls::empty();

        let approval = if Self::approval_needed(&snapshot, form.amount) {
            let payload = self
                .backend
                .get_approval_tx(self.chain_id, form.token_address_0, form.amount, decimals)
                .await?;
            calls.push(payload.response.as_call());
            Some(payload)
        } else {
            None
        };

        let swap = self
            .backend
            .get_swap_tx(form.token_address_0, form.token_address_1, recipient, form.amount, form.slippage, self.chain_id, decimals)
            .await?;
        calls.push(swap.tx.as_call());

        {
            let _intent = self.intent.read().await;
            if self.surface.generation() == generation {
                let mut form = self.form.write().await;
                form.approval_tx_payload = approval;
                form.swap_tx_payload = Some(swap);
            }
        }

        info!(calls = calls.len(), src = %intent.source_token, dst = %intent.destination_token, "submitting swap");

        let operation = account.build_user_op(&calls).await?;
        let handle = account.send_user_op(operation).await?;
        let receipt = handle.wait().await?;

        Ok(receipt)
    }

    /// Record that the user rejected the swap. Returns the leg they were being
    /// asked to sign.
    pub async fn cancel(&self) -> CancelLeg {
        let leg = if self.is_approval_needed().await {
            CancelLeg::Approval
        } else {
            CancelLeg::Swap
        };

        self.surface.disable(self.surface.generation());
        info!(code = leg.code(), "swap cancelled");

        leg
    }
}
