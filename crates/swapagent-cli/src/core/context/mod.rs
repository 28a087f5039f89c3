use swapagent_account::SmartAccountClient;
use swapagent_backend::BackendClient;
use swapagent_evm::Client as EvmClient;
use swapagent_orchestrator::SwapOrchestrator;

use crate::core::context::configuration::{Configuration, Profile};
use crate::core::context::environment::VariablesResolver;
use crate::core::Error;

pub mod configuration;
pub mod environment;

#[derive(Clone)]
pub struct Context {
    pub configuration: Configuration,
}

impl Context {
    pub fn new(configuration: Configuration) -> Context {
        Context { configuration }
    }

    /// Load the configuration from the profile file, if any, overridden by the
    /// `SWAPAGENT_*` environment variables. `profile` takes precedence over
    /// `SWAPAGENT_PROFILE`.
    pub fn load(profile: Option<&str>) -> Result<Self, Error> {
        let resolver = VariablesResolver::initialize()?;
        let environment = resolver.resolve_environment()?;

        let profile_path = profile
            .map(|x| x.to_string())
            .or_else(|| environment.get("profile").and_then(|x| x.as_str()).map(|x| x.to_string()))
            .filter(|x| !x.is_empty());

        let mut complete_profile = Profile::empty();
        if let Some(path) = &profile_path {
            complete_profile.merge(&Profile::from_file(path)?);
        }
        complete_profile.insert_variables(environment)?;

        let configuration = Configuration::from_profile(&complete_profile)?;
        configuration.validate()?;

        Ok(Self::new(configuration))
    }

    pub fn orchestrator(&self) -> Result<SwapOrchestrator, Error> {
        let chain_id = self.configuration.evm.chain_id;
        let chain = EvmClient::new(&self.configuration.evm)?;
        let backend = BackendClient::new(&self.configuration.backend)?;

        let account = self
            .configuration
            .account
            .as_ref()
            .map(|x| SmartAccountClient::new(x, chain_id, chain.clone()))
            .transpose()?;

        Ok(SwapOrchestrator::new(self.configuration.swap.clone(), chain_id, chain, backend, account))
    }
}
