//! Secret Manager REST client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, Method};
use secretgen_types::config::ProviderConfig;
use secretgen_types::{Result, SecretGenError, SecretName, SecretVersionStore, VersionId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Client for the Secret Manager v1 REST API.
#[derive(Clone)]
pub struct SecretManagerClient {
    client: Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    data: String,
}

#[derive(Serialize)]
struct AddVersionRequest {
    payload: Payload,
}

#[derive(Deserialize)]
struct SecretVersion {
    name: String,
}

#[derive(Deserialize)]
struct AccessResponse {
    payload: Payload,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl SecretManagerClient {
    /// Create a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SecretGenError::Config`] when no access token is configured,
    /// the endpoint is not a URL, or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let token = config
            .access_token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                SecretGenError::Config(
                    "No access token configured (set GOOGLE_OAUTH_ACCESS_TOKEN)".to_string(),
                )
            })?;

        Url::parse(&config.endpoint)
            .map_err(|e| SecretGenError::Config(format!("Invalid endpoint URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("secretgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SecretGenError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = if config.endpoint.ends_with('/') {
            config.endpoint.clone()
        } else {
            format!("{}/", config.endpoint)
        };

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Base URL requests are made against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of a custom method (`{name}:{verb}`) on a resource.
    fn method_url(&self, name: &str, verb: &str) -> Result<Url> {
        let url = format!("{}{}:{}", self.endpoint, name.trim_start_matches('/'), verb);
        Url::parse(&url).map_err(|e| SecretGenError::Store(format!("Invalid request URL {}: {}", url, e)))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        tracing::debug!(%method, %url, "secret manager request");

        let mut req = self.client.request(method, url).bearer_auth(&self.token);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SecretGenError::Store(format!("Request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SecretGenError::Store(describe_error(status.as_u16(), &text)));
        }

        resp.json()
            .await
            .map_err(|e| SecretGenError::Store(format!("Failed to parse response: {}", e)))
    }
}

/// Render an API error response, preferring the structured error envelope.
fn describe_error(http_status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => {
            let code = if error.code == 0 { http_status } else { error.code };
            if error.status.is_empty() {
                format!("{} ({})", error.message, code)
            } else {
                format!("{} ({}): {}", error.status, code, error.message)
            }
        }
        Err(_) if body.trim().is_empty() => format!("HTTP {}", http_status),
        Err(_) => format!("HTTP {}: {}", http_status, body.trim()),
    }
}

#[async_trait]
impl SecretVersionStore for SecretManagerClient {
    async fn add_version(&self, parent: &SecretName, payload: &[u8]) -> Result<VersionId> {
        let body = AddVersionRequest {
            payload: Payload {
                data: STANDARD.encode(payload),
            },
        };
        let body = serde_json::to_value(body)?;

        let version: SecretVersion = self
            .request(Method::POST, self.method_url(parent.as_str(), "addVersion")?, Some(body))
            .await?;

        VersionId::new(version.name)
            .map_err(|_| SecretGenError::Store("Response did not include a version name".to_string()))
    }

    async fn access_version(&self, version: &VersionId) -> Result<Vec<u8>> {
        let response: AccessResponse = self
            .request(Method::GET, self.method_url(version.as_str(), "access")?, None)
            .await?;

        STANDARD
            .decode(response.payload.data)
            .map_err(|e| SecretGenError::Store(format!("Payload is not valid base64: {}", e)))
    }

    async fn disable_version(&self, version: &VersionId) -> Result<()> {
        let _: SecretVersion = self
            .request(
                Method::POST,
                self.method_url(version.as_str(), "disable")?,
                Some(serde_json::json!({})),
            )
            .await?;
        Ok(())
    }

    async fn destroy_version(&self, version: &VersionId) -> Result<()> {
        let _: SecretVersion = self
            .request(
                Method::POST,
                self.method_url(version.as_str(), "destroy")?,
                Some(serde_json::json!({})),
            )
            .await?;
        Ok(())
    }
}
