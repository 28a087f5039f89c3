use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client as HTTPClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use swapagent_evm::ChainID;

use crate::models::{ApprovalRequest, ApprovalTxPayload, SwapRequest, SwapTxPayload};
use crate::{Backend, BackendConfiguration, Error};

#[derive(Clone)]
pub struct HttpBackendClient {
    endpoint: String,
    client: HTTPClient,
}

impl HttpBackendClient {
    pub fn new(configuration: &BackendConfiguration) -> Result<Self, Error> {
        let client = HTTPClient::builder()
            .timeout(Duration::from_secs(configuration.timeout))
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            endpoint: configuration.endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, Error> {
        let response = self.client.post(format!("{}/{}", self.endpoint, path)).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status(status.as_u16(), text));
        }

        serde_json::from_str::<R>(&text).map_err(|e| Error::Format(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackendClient {
    async fn get_approval_tx(&self, chain_id: ChainID, token_address: Address, amount: f64, decimals: u8) -> Result<ApprovalTxPayload, Error> {
        let request = ApprovalRequest {
            chain_id: chain_id.as_id(),
            amount,
            token_address,
            decimals,
        };

        self.post("approve", &request).await
    }

    async fn get_swap_tx(
        &self,
        source_token: Address,
        destination_token: Address,
        recipient: Address,
        amount: f64,
        slippage: f64,
        chain_id: ChainID,
        decimals: u8,
    ) -> Result<SwapTxPayload, Error> {
        let request = SwapRequest {
            src: source_token,
            dst: destination_token,
            wallet_address: recipient,
            amount,
            slippage,
            chain_id: chain_id.as_id(),
            decimals,
        };

        self.post("swap", &request).await
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use serde_json::json;
    use swapagent_evm::constants::Token;
    use swapagent_evm::ChainID;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::HttpBackendClient;
    use crate::{Backend, BackendConfiguration, Error};

    fn client(server: &MockServer) -> HttpBackendClient {
        HttpBackendClient::new(&BackendConfiguration {
            endpoint: format!("{}/", server.uri()),
            timeout: 3,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn approval_request_is_posted_with_token_and_amount() {
        // Given
        let server = MockServer::start().await;
        let usdc = Token::usdc(&ChainID::Base).address;
        Mock::given(method("POST"))
            .and(path("/approve"))
            .and(body_partial_json(json!({ "chain_id": 8453, "amount": 100.0, "decimals": 6 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": { "to": usdc, "data": "0x095ea7b3" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        // When
        let payload = client(&server).get_approval_tx(ChainID::Base, usdc, 100.0, 6).await.unwrap();

        // Then
        assert_eq!(payload.response.to, usdc);
    }

    #[tokio::test]
    async fn swap_request_is_posted_with_recipient_and_slippage() {
        // Given
        let server = MockServer::start().await;
        let recipient = address!("0000000000000000000000000000000000000b0b");
        Mock::given(method("POST"))
            .and(path("/swap"))
            .and(body_partial_json(json!({ "wallet_address": recipient, "slippage": 0.1, "chain_id": 8453 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tx": { "to": "0x111111125421cA6dc452d289314280a0f8842A65", "data": "0x12aa3caf", "value": "0" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        // When
        let payload = client(&server)
            .get_swap_tx(Token::usdc(&ChainID::Base).address, Token::NATIVE_ADDRESS, recipient, 100.0, 0.1, ChainID::Base, 6)
            .await
            .unwrap();

        // Then
        assert_eq!(payload.tx.to, address!("111111125421cA6dc452d289314280a0f8842A65"));
    }

    #[tokio::test]
    async fn server_errors_are_reported_with_status() {
        // Given
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/swap"))
            .respond_with(ResponseTemplate::new(500).set_body_string("insufficient liquidity"))
            .mount(&server)
            .await;

        // When
        let result = client(&server)
            .get_swap_tx(Token::usdc(&ChainID::Base).address, Token::NATIVE_ADDRESS, Token::NATIVE_ADDRESS, 1.0, 0.1, ChainID::Base, 6)
            .await;

        // Then
        assert!(matches!(result, Err(Error::Status(500, body)) if body == "insufficient liquidity"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_format_error() {
        // Given
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/approve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
            .mount(&server)
            .await;

        // When
        let result = client(&server)
            .get_approval_tx(ChainID::Base, Token::usdc(&ChainID::Base).address, 1.0, 6)
            .await;

        // Then
        assert!(matches!(result, Err(Error::Format(_))));
    }
}
