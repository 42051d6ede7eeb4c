use crate::domain::model::Envelope;
use crate::domain::ports::Transport;
use crate::utils::error::{ProvisionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("roster-boards/", env!("CARGO_PKG_VERSION"));

/// 以 reqwest 實作的 GraphQL 傳輸:每次呼叫一個 POST
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(endpoint: String, token: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, query: &str, variables: serde_json::Value) -> Result<Envelope> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        tracing::debug!("POST {}", self.endpoint);

        // 平台有新舊兩代節點 ID,要求新格式才不會混用
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-Github-Next-Global-ID", "1")
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&text)?;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_execute_sends_expected_headers_and_body() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("authorization", "Bearer test-token")
                .header("x-github-next-global-id", "1")
                .header("content-type", "application/json")
                .body_contains("\"query\"")
                .body_contains("\"variables\"")
                .body_contains("octocat");
            then.status(200).json_body(serde_json::json!({
                "data": { "user": { "id": "U_kgDOB1" } }
            }));
        });

        let transport =
            HttpTransport::new(server.url("/graphql"), "test-token".to_string(), 5).unwrap();

        let envelope = transport
            .execute(
                "query($login: String!) { user(login: $login) { id } }",
                serde_json::json!({ "login": "octocat" }),
            )
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(envelope.extract_str("user.id").unwrap(), "U_kgDOB1");
    }

    #[tokio::test]
    async fn test_execute_non_2xx_is_typed_error() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(401).body("Bad credentials");
        });

        let transport =
            HttpTransport::new(server.url("/graphql"), "bad-token".to_string(), 5).unwrap();

        let err = transport
            .execute("query { viewer { id } }", serde_json::json!({}))
            .await
            .unwrap_err();

        api_mock.assert();
        match err {
            ProvisionError::HttpStatusError { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Bad credentials"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_passes_errors_envelope_through() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(serde_json::json!({
                "data": null,
                "errors": [{ "message": "Could not resolve to a User" }]
            }));
        });

        let transport =
            HttpTransport::new(server.url("/graphql"), "test-token".to_string(), 5).unwrap();

        let envelope = transport
            .execute(
                "query($login: String!) { user(login: $login) { id } }",
                serde_json::json!({ "login": "ghost" }),
            )
            .await
            .unwrap();

        // 信封原樣回傳,錯誤判讀交給上層
        assert!(envelope.extract("user.id").is_err());
    }
}
