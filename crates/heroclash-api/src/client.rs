//! REST client for the game backend.
//!
//! One request/response per operation, no client-side retry; a failed call
//! reports a typed [`ClientError`] and the caller decides whether to
//! re-issue. Credentials are threaded into each authenticated call rather
//! than read from any shared slot.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::errors::{
    ClientError, DecodeError, NetworkError, ValidationError, build_api_error,
};
use crate::types::{
    GameSession, GameSummary, LoginRequest, LoginResponse, RegisterRequest, UserProfile,
    UsernameUpdate,
};

/// Local validation message shown when a username field is left blank.
pub const EMPTY_USERNAME_MESSAGE: &str = "Please enter your username";

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout.connect)
            .timeout(config.timeout.request)
            .default_headers(headers)
            .build()
            .map_err(|error| ClientError::Network(NetworkError::new(error.to_string())))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /api/login`. A 401 maps to an authentication error, anything
    /// else non-2xx to its own kind.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.config.api_endpoint("login"))
            .json(&body)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `POST /api/register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.config.api_endpoint("register"))
            .json(request)
            .send()
            .await
            .map_err(into_network_error)?;
        expect_success(response).await
    }

    /// `GET /api/user/current`.
    pub async fn current_user(
        &self,
        credentials: &Credentials,
    ) -> Result<UserProfile, ClientError> {
        require_credentials(credentials)?;
        let response = self
            .http
            .get(self.config.api_endpoint("user/current"))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `PUT /api/user/username`.
    pub async fn update_username(
        &self,
        credentials: &Credentials,
        username: &str,
    ) -> Result<(), ClientError> {
        require_credentials(credentials)?;
        require_username(username)?;
        let body = UsernameUpdate {
            username: username.to_string(),
        };
        let response = self
            .http
            .put(self.config.api_endpoint("user/username"))
            .bearer_auth(&credentials.token)
            .json(&body)
            .send()
            .await
            .map_err(into_network_error)?;
        expect_success(response).await
    }

    /// `POST /api/games/create`.
    pub async fn create_session(
        &self,
        credentials: &Credentials,
    ) -> Result<GameSession, ClientError> {
        require_credentials(credentials)?;
        let response = self
            .http
            .post(self.config.api_endpoint("games/create"))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `GET /api/games/active`.
    pub async fn active_games(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<GameSummary>, ClientError> {
        require_credentials(credentials)?;
        let response = self
            .http
            .get(self.config.api_endpoint("games/active"))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `POST /api/games/{gameId}/join`. The username must be non-empty or
    /// the call fails locally without touching the network.
    pub async fn join_session(
        &self,
        credentials: &Credentials,
        session_id: &str,
        username: &str,
    ) -> Result<GameSession, ClientError> {
        require_credentials(credentials)?;
        require_username(username)?;
        let response = self
            .http
            .post(self.config.api_endpoint(&format!("games/{session_id}/join")))
            .json(&json!({ "username": username }))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `POST /api/games/search`. Same local username validation as join.
    pub async fn search_for_session(
        &self,
        credentials: &Credentials,
        username: &str,
    ) -> Result<GameSession, ClientError> {
        require_credentials(credentials)?;
        require_username(username)?;
        let response = self
            .http
            .post(self.config.api_endpoint("games/search"))
            .json(&json!({ "username": username }))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `GET /api/games/{gameId}`, the polling read.
    pub async fn fetch_session(
        &self,
        credentials: &Credentials,
        session_id: &str,
    ) -> Result<GameSession, ClientError> {
        require_credentials(credentials)?;
        let response = self
            .http
            .get(self.config.api_endpoint(&format!("games/{session_id}")))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `POST /api/games/selectHero?gameId=..&heroId=..`.
    pub async fn select_hero(
        &self,
        credentials: &Credentials,
        session_id: &str,
        hero_id: u64,
    ) -> Result<GameSession, ClientError> {
        require_credentials(credentials)?;
        let hero_id = hero_id.to_string();
        let response = self
            .http
            .post(self.config.api_endpoint("games/selectHero"))
            .query(&[("gameId", session_id), ("heroId", hero_id.as_str())])
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        decode_json(response).await
    }

    /// `POST /api/duel/start`. The response body carries no combat state;
    /// combat arrives only on the duel channel. A 403 stays distinguishable
    /// from generic failure via [`ClientError::is_access_denied`].
    pub async fn start_duel(
        &self,
        credentials: &Credentials,
        session_id: &str,
    ) -> Result<(), ClientError> {
        require_credentials(credentials)?;
        tracing::debug!(session_id, "requesting duel start");
        let response = self
            .http
            .post(self.config.api_endpoint("duel/start"))
            .json(&json!({ "gameId": session_id }))
            .bearer_auth(&credentials.token)
            .send()
            .await
            .map_err(into_network_error)?;
        expect_success(response).await
    }
}

fn require_credentials(credentials: &Credentials) -> Result<(), ClientError> {
    if credentials.is_usable() {
        Ok(())
    } else {
        Err(ClientError::MissingCredentials)
    }
}

fn require_username(username: &str) -> Result<(), ClientError> {
    if username.trim().is_empty() {
        Err(ClientError::Validation(ValidationError::new(
            EMPTY_USERNAME_MESSAGE,
        )))
    } else {
        Ok(())
    }
}

fn into_network_error(error: reqwest::Error) -> ClientError {
    ClientError::Network(NetworkError::new(error.to_string()))
}

async fn expect_success(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let raw = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "request rejected");
    Err(build_api_error(status.as_u16(), &raw))
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let raw = response.text().await.map_err(into_network_error)?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "request rejected");
        return Err(build_api_error(status.as_u16(), &raw));
    }
    serde_json::from_str(&raw).map_err(|error| {
        ClientError::Decode(DecodeError::new(format!(
            "malformed response body: {error}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::default()).expect("client")
    }

    fn logged_in() -> Credentials {
        Credentials::new("tok-1", "ada")
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blank_token_short_circuits_before_any_request() {
        let anonymous = Credentials::new("", "ada");
        let result = client().fetch_session(&anonymous, "g1").await;
        assert_eq!(result.unwrap_err(), ClientError::MissingCredentials);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_username_fails_join_locally() {
        let result = client().join_session(&logged_in(), "g1", "  ").await;
        match result.unwrap_err() {
            ClientError::Validation(err) => {
                assert_eq!(err.info.message, EMPTY_USERNAME_MESSAGE);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_username_fails_search_locally() {
        let result = client().search_for_session(&logged_in(), "").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_username_fails_update_locally() {
        let result = client().update_username(&logged_in(), "").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
