//! Crate entrypoint wiring together configuration, the AdGuard client, and the reconcilers.

pub mod adguard;
pub mod auth;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod sync_loop;
pub mod validation;

pub use config::{ApplianceConfig, DomainToggles, SyncConfig};
pub use error::{ErrorClass, SyncError, SyncResult};
pub use sync_loop::{LoopState, Mirror, PassOutcome};
