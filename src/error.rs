// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// How the orchestrator treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Session expired or was rejected; fixed by logging in again.
    Auth,
    /// The appliance refused the call or could not be reached; retried next pass.
    Request,
    /// Credentials rejected at login; needs the operator.
    Login,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("session rejected on {path}")]
    Unauthenticated { path: String },

    #[error("request to {path} failed with {status}")]
    Request { path: String, status: StatusCode },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("login to {url} failed: {reason}")]
    Login { url: String, reason: String },
}

impl SyncError {
    pub fn login(url: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::Login {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            SyncError::Unauthenticated { .. } => ErrorClass::Auth,
            SyncError::Request { .. } | SyncError::Transport(_) => ErrorClass::Request,
            SyncError::Login { .. } => ErrorClass::Login,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.class() == ErrorClass::Auth
    }
}
