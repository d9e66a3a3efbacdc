//! REST collaborator: authentication, gateway resolution, and replies.

use crate::error::RestError;
use async_trait::async_trait;
use driftwire_model::{Account, Id};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

/// The request/response side of the platform, opaque to the supervisor.
#[async_trait]
pub trait RestApi: Send + Sync {
    /// Exchange a token for the account it belongs to.
    async fn login(&self, token: &str) -> Result<Account, RestError>;

    /// Resolve the gateway websocket URL.
    async fn gateway_url(&self) -> Result<String, RestError>;

    /// Post a message to a channel.
    async fn send_message(&self, channel: Id, content: &str) -> Result<(), RestError>;

    /// Release any held resources. Called once by `Client::close`.
    async fn close(&self);
}

/// Default REST layer over reqwest with bearer-token auth.
pub struct HttpRest {
    http: reqwest::Client,
    base: String,
    token: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct GatewayResponse {
    url: String,
}

impl HttpRest {
    /// Create a REST client rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpRest {
            http: reqwest::Client::new(),
            base: base_url.into(),
            token: RwLock::new(None),
        }
    }

    fn auth_header(&self) -> Result<String, RestError> {
        let guard = self.token.read();
        let token = guard
            .as_deref()
            .ok_or_else(|| RestError::Auth("no token stored; login first".into()))?;
        Ok(format!("Bot {token}"))
    }
}

#[async_trait]
impl RestApi for HttpRest {
    async fn login(&self, token: &str) -> Result<Account, RestError> {
        let response = self
            .http
            .get(format!("{}/users/@me", self.base))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {token}"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RestError::Auth(format!(
                "token rejected with status {}",
                response.status()
            )));
        }

        let account: Account = response.error_for_status()?.json().await?;
        *self.token.write() = Some(token.to_string());
        debug!(account = %account.username, "login accepted");
        Ok(account)
    }

    async fn gateway_url(&self) -> Result<String, RestError> {
        let response: GatewayResponse = self
            .http
            .get(format!("{}/gateway", self.base))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.url.is_empty() {
            return Err(RestError::Malformed("empty gateway url".into()));
        }
        Ok(response.url)
    }

    async fn send_message(&self, channel: Id, content: &str) -> Result<(), RestError> {
        self.http
            .post(format!("{}/channels/{}/messages", self.base, channel))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn close(&self) {
        // reqwest clients release their pool on drop; forget the token
        // eagerly so a closed client cannot authenticate new requests.
        *self.token.write() = None;
    }
}
