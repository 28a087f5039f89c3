use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use swapagent_account::SmartAccountConfiguration;
use swapagent_backend::BackendConfiguration;
use swapagent_common::service::monitoring::Configuration as MonitoringConfiguration;
use swapagent_evm::Configuration as EvmConfiguration;
use swapagent_orchestrator::SwapConfiguration;

use crate::core::context::environment::{JSONPath, Variables};
use crate::core::Error;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityConfiguration {
    Debug,
    #[default]
    Info,
}

impl FromStr for VerbosityConfiguration {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(VerbosityConfiguration::Debug),
            _ => Ok(VerbosityConfiguration::Info),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub verbosity: VerbosityConfiguration,
    pub prometheus: Option<MonitoringConfiguration>,

    pub evm: EvmConfiguration,
    pub backend: BackendConfiguration,

    /// Without an account, swaps can be inspected but not submitted
    pub account: Option<SmartAccountConfiguration>,

    #[serde(default)]
    pub swap: SwapConfiguration,
}

impl Configuration {
    pub fn from_profile(profile: &Profile) -> Result<Self, Error> {
        serde_json::from_value(Value::Object(profile.0.clone())).map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.evm.validate()?;
        self.backend.validate()?;
        if let Some(account) = &self.account {
            account.validate()?;
        }
        self.swap.validate()?;

        Ok(())
    }
}

/// Raw configuration tree, assembled from a profile file and the environment
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(format!("could not read profile {}: {}", path, e)))?;

        serde_json::from_slice(&data)
            .map(Self)
            .map_err(|e| Error::Configuration(format!("invalid profile {}: {}", path, e)))
    }

    /// Deep merge `other` into this profile, `other` wins on conflicts
    pub fn merge(&mut self, other: &Profile) {
        fn merge_objects(target: &mut Map<String, Value>, source: &Map<String, Value>) {
            for (key, value) in source {
                if let (Some(Value::Object(inner)), Value::Object(other)) = (target.get_mut(key), value) {
                    merge_objects(inner, other);
                    continue;
                }

                target.insert(key.clone(), value.clone());
            }
        }

        merge_objects(&mut self.0, &other.0)
    }

    pub fn insert_variables(&mut self, variables: Variables) -> Result<(), Error> {
        variables.into_iter().try_for_each(|(path, value)| self.insert_variable(path, value))
    }

    pub fn insert_variable(&mut self, path: JSONPath, value: Value) -> Result<(), Error> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };

        let mut object = &mut self.0;
        for parent in parents {
            object = object
                .entry(parent.clone())
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(|| Error::Configuration(format!("could not merge variable {} in configuration", parent)))?;
        }

        object.insert(last.clone(), value);
        Ok(())
    }
}
