//! Session tokens and the read-only / read-write handles built from them.
use std::fmt;
use std::ops::Deref;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::info;

use crate::adguard::client::ApplianceClient;
use crate::config::ApplianceConfig;
use crate::error::SyncResult;

/// Opaque value of the `agh_session` cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        SessionToken(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Authenticated read access to one appliance.
#[derive(Clone, Copy)]
pub struct Session<'a> {
    client: &'a ApplianceClient,
    token: &'a SessionToken,
}

impl<'a> Session<'a> {
    pub fn new(client: &'a ApplianceClient, token: &'a SessionToken) -> Self {
        Self { client, token }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SyncResult<T> {
        self.client.get_json(path, self.token).await
    }

    pub async fn get_value(&self, path: &str) -> SyncResult<Value> {
        self.client.get_value(path, self.token).await
    }
}

/// Authenticated write access. Only the secondary is ever wrapped in this.
#[derive(Clone, Copy)]
pub struct WriteSession<'a>(Session<'a>);

impl<'a> WriteSession<'a> {
    pub fn new(client: &'a ApplianceClient, token: &'a SessionToken) -> Self {
        WriteSession(Session::new(client, token))
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> SyncResult<()> {
        self.0.client.post_json(path, self.0.token, body).await
    }

    pub async fn post_text(&self, path: &str, text: &str) -> SyncResult<()> {
        self.0.client.post_text(path, self.0.token, text).await
    }

    pub async fn post_empty(&self, path: &str) -> SyncResult<()> {
        self.0.client.post_empty(path, self.0.token).await
    }
}

impl<'a> Deref for WriteSession<'a> {
    type Target = Session<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Log a single appliance in.
pub async fn login(client: &ApplianceClient, config: &ApplianceConfig) -> SyncResult<SessionToken> {
    let token = client.login(&config.username, &config.password).await?;
    info!(appliance = client.base_url(), "logged in");
    Ok(token)
}

/// Tokens for both appliances. Replaced as a whole on every (re-)login.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub primary: SessionToken,
    pub secondary: SessionToken,
}

impl SessionState {
    pub async fn login_both(
        primary: (&ApplianceClient, &ApplianceConfig),
        secondary: (&ApplianceClient, &ApplianceConfig),
    ) -> SyncResult<Self> {
        let primary = login(primary.0, primary.1).await?;
        let secondary = login(secondary.0, secondary.1).await?;
        Ok(Self { primary, secondary })
    }
}
