use std::collections::HashMap;

use serde::{Deserialize, Serialize};

mod metric;
pub use metric::Metric;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub endpoint: String,
    pub token: Option<String>,
}

impl Configuration {
    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(token) = &self.token {
            headers.insert("Authorization".to_string(), format!("Basic {}", token));
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::Configuration;

    #[test]
    fn headers_carry_token_only_when_set() {
        let anonymous = Configuration {
            endpoint: "http://localhost:4318".to_string(),
            token: None,
        };
        assert!(anonymous.headers().is_empty());

        let authenticated = Configuration {
            endpoint: "http://localhost:4318".to_string(),
            token: Some("c2VjcmV0".to_string()),
        };
        assert_eq!(authenticated.headers().get("Authorization").unwrap(), "Basic c2VjcmV0");
    }
}
