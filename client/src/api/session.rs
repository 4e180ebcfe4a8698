//! # Session API
//!
//! Login, logout and session probing. The session token itself lives in the
//! client's cookie jar; this module tracks the credentials needed to obtain a
//! new one when it expires.

use std::fmt;

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::params::Params;

/// Username and password for `/login/`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    fn to_params(&self) -> Params {
        Params::new()
            .with("name", self.name.as_str())
            .with("password", self.password.as_str())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"***")
            .finish()
    }
}

/// Whether the last session operation left us authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

impl ApiClient {
    /// Log in and keep the session cookie in the jar.
    ///
    /// The credentials are remembered for [`relogin`](Self::relogin) even when
    /// the login itself fails.
    pub async fn login(&mut self, credentials: Credentials) -> Result<Value, ApiError> {
        debug!("Logging in as {}", credentials.name);
        let params = credentials.to_params();
        self.credentials = Some(credentials);

        match self.post("/login/", Some(&params)).await {
            Ok(value) => {
                self.state = SessionState::LoggedIn;
                Ok(value)
            }
            Err(e) => {
                self.state = SessionState::LoggedOut;
                Err(e)
            }
        }
    }

    /// Log in again with the stored credentials, but only if the current
    /// session has expired.
    ///
    /// The session is probed with `GET /status/`. Only a `NotAuthorized` answer
    /// triggers a single new login; every other error is returned unchanged.
    pub async fn relogin(&mut self) -> Result<(), ApiError> {
        let Some(credentials) = self.credentials.clone() else {
            return Err(ApiError::Configuration {
                message: "No stored credentials, call login first".to_string(),
            });
        };

        match self.get_status().await {
            Ok(_) => {
                self.state = SessionState::LoggedIn;
                Ok(())
            }
            Err(ApiError::NotAuthorized { .. }) => {
                info!("Session expired, logging in again as {}", credentials.name);
                self.login(credentials).await.map(|_| ())
            }
            Err(e) => Err(e),
        }
    }

    /// Log out and forget the stored credentials.
    ///
    /// Credentials are dropped before the request is sent and are not restored
    /// if it fails.
    pub async fn logout(&mut self) -> Result<Value, ApiError> {
        self.credentials = None;
        self.state = SessionState::LoggedOut;

        let result = self.post("/logout/", None).await;
        if let Err(ref e) = result {
            warn!("Logout request failed: {}", e);
        }
        result
    }

    /// Current session state as seen by this client.
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    /// Whether credentials are stored for [`relogin`](Self::relogin).
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Status of the current user; fails with `NotAuthorized` without a
    /// valid session.
    pub async fn get_status(&self) -> Result<Value, ApiError> {
        self.get("/status/", None).await
    }

    /// API version information.
    pub async fn get_version(&self) -> Result<Value, ApiError> {
        self.get("/version/", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_params() {
        let params = Credentials::new("alice", "p w").to_params();
        assert_eq!(params.to_query_string(), "name=alice&password=p%20w");
    }

    #[tokio::test]
    async fn test_relogin_without_credentials_is_configuration_error() {
        // Nothing listens on port 9, so any request would be a network error.
        let mut client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.relogin().await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
        assert_eq!(client.session_state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_logout_clears_credentials_even_when_request_fails() {
        let mut client = ApiClient::new("http://127.0.0.1:9").unwrap();
        client.credentials = Some(Credentials::new("alice", "secret"));
        client.state = SessionState::LoggedIn;

        let result = client.logout().await;
        assert!(matches!(result, Err(ApiError::Transport { .. })));
        assert!(!client.has_credentials());
        assert_eq!(client.session_state(), SessionState::LoggedOut);
    }
}
