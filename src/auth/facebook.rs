use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::FacebookConfig;

/// Verified identity returned by the Graph API after a code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid provider configuration: {0}")]
    Config(String),
    #[error("Provider request timed out")]
    Timeout,
    #[error("Code exchange failed: {0}")]
    ExchangeFailed(String),
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Client for the Facebook OAuth dialog and Graph API.
#[derive(Debug)]
pub struct FacebookClient {
    http_client: Client,
    dialog_url: Url,
    graph_url: String,
    app_id: String,
    app_secret: String,
    callback_url: String,
}

impl FacebookClient {
    pub fn new(config: &FacebookConfig) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        let dialog_url =
            Url::parse(&config.dialog_url).map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            dialog_url,
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            callback_url: config.callback_url.clone(),
        })
    }

    /// URL of the provider's login dialog, requesting the email scope.
    pub fn authorize_url(&self) -> String {
        let mut url = self.dialog_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.app_id)
            .append_pair("redirect_uri", &self.callback_url)
            .append_pair("scope", "email");
        url.to_string()
    }

    /// Exchange an authorization code for a verified profile.
    ///
    /// Two Graph round trips: code -> access token, then token -> profile.
    pub async fn exchange_code(&self, code: &str) -> Result<FacebookProfile, ProviderError> {
        let token_url = format!("{}/oauth/access_token", self.graph_url);

        let response = self
            .http_client
            .get(&token_url)
            .query(&[
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::ExchangeFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ExchangeFailed(format!("{}: {}", status, body)));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ExchangeFailed(e.to_string()))?;

        let profile_url = format!("{}/me", self.graph_url);

        let response = self
            .http_client
            .get(&profile_url)
            .query(&[
                ("fields", "id,first_name,last_name,email"),
                ("access_token", token.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::ProfileFetchFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ProfileFetchFailed(format!(
                "{}: {}",
                status, body
            )));
        }

        let profile: FacebookProfile = response
            .json()
            .await
            .map_err(|e| ProviderError::ProfileFetchFailed(e.to_string()))?;

        tracing::debug!("Fetched Facebook profile for {}", profile.id);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FacebookConfig;

    fn test_client(graph_url: &str) -> FacebookClient {
        FacebookClient::new(&FacebookConfig {
            app_id: "app123".to_string(),
            app_secret: "secret".to_string(),
            callback_url: "http://localhost:5000/auth/facebook/callback".to_string(),
            graph_url: graph_url.to_string(),
            ..FacebookConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url_carries_client_and_scope() {
        let client = test_client("https://graph.facebook.com");
        let url = Url::parse(&client.authorize_url()).unwrap();

        let pairs: Vec<_> = url.query_pairs().collect();
        assert!(pairs.iter().any(|(k, v)| k == "client_id" && v == "app123"));
        assert!(pairs.iter().any(|(k, v)| k == "scope" && v == "email"));
        assert!(pairs
            .iter()
            .any(|(k, v)| k == "redirect_uri" && v.contains("/auth/facebook/callback")));
    }

    #[test]
    fn test_invalid_dialog_url_is_config_error() {
        let err = FacebookClient::new(&FacebookConfig {
            dialog_url: "not a url".to_string(),
            ..FacebookConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[tokio::test]
    async fn test_exchange_code_happy_path() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .and(query_param("code", "code-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-1",
                "token_type": "bearer"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(query_param("access_token", "token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "fb123",
                "first_name": "Ann",
                "last_name": "Archer",
                "email": "ann@x.com"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let profile = client.exchange_code("code-1").await.unwrap();
        assert_eq!(profile.id, "fb123");
        assert_eq!(profile.first_name, "Ann");
        assert_eq!(profile.email, Some("ann@x.com".to_string()));
    }

    #[tokio::test]
    async fn test_exchange_rejected_code_is_exchange_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad code"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.exchange_code("bogus").await.unwrap_err();
        assert!(matches!(err, ProviderError::ExchangeFailed(_)));
    }

    #[tokio::test]
    async fn test_profile_without_email() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-1"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "fb999",
                "first_name": "NoMail",
                "last_name": "User"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let profile = client.exchange_code("code-1").await.unwrap();
        assert_eq!(profile.id, "fb999");
        assert!(profile.email.is_none());
    }
}
