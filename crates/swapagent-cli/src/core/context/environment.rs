use std::collections::hash_map::IntoIter;
use std::collections::HashMap;
use std::ops::Deref;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};

use crate::core::Error;

static CONFIGURATION_SPECIFICATION: &str = include_str!("../../../../../resources/specification/configuration.json");

const ENVIRONMENT_PREFIX: &str = "SWAPAGENT_";

lazy_static! {
    static ref IS_QUOTED: Regex = Regex::new(r"^'[^']*'$").expect("invalid regex");
    static ref IS_NUMBER: Regex = Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("invalid regex");
    static ref IS_ARRAY: Regex = Regex::new(r"^\[.*\]$").expect("invalid regex");
}

/// Lowercased dotted path to a configuration field, e.g. `evm.endpoint`
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct JSONPath(Vec<String>);

impl Deref for JSONPath {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl JSONPath {
    pub fn from_str(s: &str) -> Self {
        JSONPath(s.split('.').map(|x| x.to_lowercase()).collect())
    }
}

/// Maps environment variable names (without prefix) to configuration paths. Names are
/// the path segments joined by `_`: `SWAPAGENT_ACCOUNT_BUNDLER_ENDPOINT` sets
/// `account.bundler_endpoint`.
#[derive(Debug)]
pub struct VariablesResolver(HashMap<String, JSONPath>);

impl VariablesResolver {
    pub fn initialize() -> Result<Self, Error> {
        fn collect(path: &[String], value: &Value, resolutions: &mut HashMap<String, JSONPath>) {
            match value {
                Value::Object(fields) => {
                    for (field, value) in fields {
                        collect(&[path, &[field.clone()]].concat(), value, resolutions)
                    }
                },
                _ => {
                    resolutions.insert(path.join("_"), JSONPath(path.to_vec()));
                },
            }
        }

        let specification: Value =
            serde_json::from_str(CONFIGURATION_SPECIFICATION).map_err(|e| Error::Configuration(format!("invalid configuration specification {}", e)))?;

        let mut resolutions = HashMap::new();
        resolutions.insert("profile".to_string(), JSONPath::from_str("profile"));
        collect(&[], &specification, &mut resolutions);

        Ok(Self(resolutions))
    }

    pub fn resolve_environment(&self) -> Result<Variables, Error> {
        let variables = envy::prefixed(ENVIRONMENT_PREFIX)
            .from_env::<HashMap<String, String>>()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        self.resolve_variables(variables)
    }

    fn resolve_variables(&self, variables: HashMap<String, String>) -> Result<Variables, Error> {
        let mut resolved = HashMap::new();
        for (name, value) in variables {
            if let Some(path) = self.0.get(&name.to_lowercase()) {
                resolved.insert(path.clone(), Self::decode_value(&value)?);
            }
        }

        Ok(Variables(resolved))
    }

    /// Decode a raw variable. Quote a value (`'1'`) to keep it as a string.
    fn decode_value(value: &str) -> Result<Value, Error> {
        Ok(match value.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),

            value if IS_QUOTED.is_match(value) => Value::String(value[1..value.len() - 1].to_string()),
            value if IS_NUMBER.is_match(value) => Number::from_str(value)
                .map(Value::Number)
                .map_err(|e| Error::Configuration(e.to_string()))?,
            "[]" => Value::Array(vec![]),
            value if IS_ARRAY.is_match(value) => Value::Array(
                value[1..value.len() - 1]
                    .split(',')
                    .map(Self::decode_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),

            value => Value::String(value.to_string()),
        })
    }
}

pub struct Variables(HashMap<JSONPath, Value>);

impl Variables {
    pub fn get(&self, s: &str) -> Option<&Value> {
        self.0.get(&JSONPath::from_str(s))
    }

    pub fn into_iter(self) -> IntoIter<JSONPath, Value> {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Number, Value};

    use super::{JSONPath, VariablesResolver};

    #[test]
    fn path_is_lowercased() {
        assert_eq!(JSONPath::from_str("EVM.Endpoint").0, vec!["evm".to_string(), "endpoint".to_string()]);
        assert_eq!(JSONPath::from_str("swap").0, vec!["swap".to_string()]);
    }

    #[test]
    fn nested_fields_resolve_to_variable_names() {
        let resolver = VariablesResolver::initialize().unwrap();

        assert_eq!(resolver.0.get("evm_endpoint"), Some(&JSONPath::from_str("evm.endpoint")));
        assert_eq!(
            resolver.0.get("account_owner_private_key"),
            Some(&JSONPath::from_str("account.owner_private_key"))
        );
        assert_eq!(resolver.0.get("swap_slippage"), Some(&JSONPath::from_str("swap.slippage")));
        assert_eq!(resolver.0.get("profile"), Some(&JSONPath::from_str("profile")));
        assert!(!resolver.0.contains_key("evm"));
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let resolver = VariablesResolver::initialize().unwrap();

        let variables = resolver
            .resolve_variables(HashMap::from([
                ("EVM_TIMEOUT".to_string(), "30".to_string()),
                ("unrelated".to_string(), "value".to_string()),
            ]))
            .unwrap();

        assert_eq!(variables.get("evm.timeout"), Some(&json!(30)));
        assert_eq!(variables.into_iter().count(), 1);
    }

    #[test]
    fn values_are_decoded() {
        let cases = vec![
            ("0", Value::Number(Number::from(0))),
            ("94", Value::Number(Number::from(94))),
            ("0.5", json!(0.5)),
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("''", Value::String("".to_string())),
            ("'42'", Value::String("42".to_string())),
            ("[]", Value::Array(vec![])),
            ("[1,2]", json!([1, 2])),
            ("['a','b']", json!(["a", "b"])),
            ("base", Value::String("base".to_string())),
            (
                "0x111111125421cA6dc452d289314280a0f8842A65",
                Value::String("0x111111125421cA6dc452d289314280a0f8842A65".to_string()),
            ),
        ];

        for (raw, expected) in cases {
            assert_eq!(VariablesResolver::decode_value(raw).unwrap(), expected, "decoding {}", raw);
        }
    }
}
