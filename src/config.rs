use std::fmt;
use std::time::Duration;

use crate::reconcile::Domain;

/// Where an appliance lives and how to log into it.
#[derive(Clone)]
pub struct ApplianceConfig {
    pub base_url: String, // e.g. "http://192.168.1.2:3000"
    pub username: String,
    pub password: String,
}

impl ApplianceConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl fmt::Debug for ApplianceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplianceConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which reconcilers run on each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainToggles {
    pub entries: bool,
    pub blocked_services: bool,
    pub filter_lists: bool,
    pub custom_rules: bool,
    pub general_settings: bool,
    pub dns_settings: bool,
    pub encryption_settings: bool,
}

impl DomainToggles {
    pub fn all() -> Self {
        Self {
            entries: true,
            blocked_services: true,
            filter_lists: true,
            custom_rules: true,
            general_settings: true,
            dns_settings: true,
            encryption_settings: true,
        }
    }

    pub fn none() -> Self {
        Self {
            entries: false,
            blocked_services: false,
            filter_lists: false,
            custom_rules: false,
            general_settings: false,
            dns_settings: false,
            encryption_settings: false,
        }
    }

    /// Set a single domain on or off, builder style.
    pub fn with(mut self, domain: Domain, enabled: bool) -> Self {
        *self.slot(domain) = enabled;
        self
    }

    pub fn is_enabled(&self, domain: Domain) -> bool {
        match domain {
            Domain::Entries => self.entries,
            Domain::BlockedServices => self.blocked_services,
            Domain::FilterLists => self.filter_lists,
            Domain::CustomRules => self.custom_rules,
            Domain::GeneralSettings => self.general_settings,
            Domain::DnsSettings => self.dns_settings,
            Domain::EncryptionSettings => self.encryption_settings,
        }
    }

    /// True when at least one enabled reconciler reads `/control/filtering/status`.
    pub fn needs_filtering_status(&self) -> bool {
        Domain::ALL
            .iter()
            .any(|d| d.uses_filtering_status() && self.is_enabled(*d))
    }

    fn slot(&mut self, domain: Domain) -> &mut bool {
        match domain {
            Domain::Entries => &mut self.entries,
            Domain::BlockedServices => &mut self.blocked_services,
            Domain::FilterLists => &mut self.filter_lists,
            Domain::CustomRules => &mut self.custom_rules,
            Domain::GeneralSettings => &mut self.general_settings,
            Domain::DnsSettings => &mut self.dns_settings,
            Domain::EncryptionSettings => &mut self.encryption_settings,
        }
    }
}

impl Default for DomainToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything the sync loop needs, built once at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub primary: ApplianceConfig,
    pub secondary: ApplianceConfig,
    pub interval: Duration,
    pub domains: DomainToggles,
}
