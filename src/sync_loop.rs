//! The pass loop: log in, reconcile every enabled domain, sleep, repeat.
use std::convert::Infallible;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::adguard::client::ApplianceClient;
use crate::auth::{Session, SessionState, WriteSession};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::reconcile::{self, Domain, PassShared, Source};

/// Stage name used when the shared filtering status fetch fails.
pub const SHARED_STAGE: &str = "filtering-status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Authenticated,
    Reauthenticating,
}

#[derive(Debug)]
pub enum PassOutcome {
    Completed { actions: usize },
    /// The pass stopped at `stage`; earlier domains keep what was applied.
    RequestFailed { stage: &'static str, error: SyncError },
    Unauthenticated { stage: &'static str },
}

pub struct Mirror {
    config: SyncConfig,
    primary: ApplianceClient,
    secondary: ApplianceClient,
    session: Option<SessionState>,
    state: LoopState,
}

impl Mirror {
    pub fn new(config: SyncConfig) -> Self {
        let primary = ApplianceClient::new(config.primary.base_url_root());
        let secondary = ApplianceClient::new(config.secondary.base_url_root());
        Self::with_clients(config, primary, secondary)
    }

    pub fn with_clients(
        config: SyncConfig,
        primary: ApplianceClient,
        secondary: ApplianceClient,
    ) -> Self {
        Self {
            config,
            primary,
            secondary,
            session: None,
            state: LoopState::Reauthenticating,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Log both appliances in. Any failure here is fatal to the caller.
    pub async fn login(&mut self) -> SyncResult<()> {
        self.session = None;
        let session = SessionState::login_both(
            (&self.primary, &self.config.primary),
            (&self.secondary, &self.config.secondary),
        )
        .await?;
        self.session = Some(session);
        self.state = LoopState::Authenticated;
        Ok(())
    }

    /// One reconciliation pass over every enabled domain, in fixed order.
    pub async fn run_pass(&self) -> PassOutcome {
        let Some(session) = &self.session else {
            return PassOutcome::Unauthenticated { stage: "session" };
        };
        let primary = Session::new(&self.primary, &session.primary);
        let target = WriteSession::new(&self.secondary, &session.secondary);

        let shared = if self.config.domains.needs_filtering_status() {
            match PassShared::fetch(&primary, &target).await {
                Ok(shared) => shared,
                Err(err) => return failed(SHARED_STAGE, err),
            }
        } else {
            PassShared::default()
        };

        let primary_src = Source::new(primary, shared.primary.as_ref());
        let secondary_src = Source::new(*target, shared.secondary.as_ref());

        let mut actions = 0;
        for domain in Domain::ALL {
            if !self.config.domains.is_enabled(domain) {
                continue;
            }
            match reconcile::run_domain(domain, &primary_src, &secondary_src, &target).await {
                Ok(n) => actions += n,
                Err(err) => return failed(domain.as_str(), err),
            }
        }

        if actions > 0 {
            info!(actions, "pass complete");
        } else {
            debug!("pass complete, already in sync");
        }
        PassOutcome::Completed { actions }
    }

    /// Run a pass and handle the re-login transition it may require.
    pub async fn step(&mut self) -> SyncResult<PassOutcome> {
        let outcome = self.run_pass().await;
        if let PassOutcome::Unauthenticated { stage } = &outcome {
            self.state = LoopState::Reauthenticating;
            info!(stage, "session expired, logging in again");
            if let Err(err) = self.login().await {
                error!(error = %err, "re-authentication failed");
                return Err(err);
            }
        }
        Ok(outcome)
    }

    /// Loop until a login fails.
    pub async fn run(mut self) -> SyncResult<Infallible> {
        info!(
            primary = self.primary.base_url(),
            secondary = self.secondary.base_url(),
            interval_secs = self.config.interval.as_secs(),
            "starting sync"
        );
        if let Err(err) = self.login().await {
            error!(error = %err, "initial login failed");
            return Err(err);
        }

        loop {
            self.step().await?;
            sleep(self.config.interval).await;
        }
    }
}

fn failed(stage: &'static str, error: SyncError) -> PassOutcome {
    if error.is_auth() {
        warn!(stage, error = %error, "session rejected during pass");
        PassOutcome::Unauthenticated { stage }
    } else {
        error!(stage, error = %error, "pass aborted");
        PassOutcome::RequestFailed { stage, error }
    }
}
