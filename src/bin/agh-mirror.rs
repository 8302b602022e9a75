use std::time::Duration;

use agh_mirror::{
    ApplianceConfig, DomainToggles, Mirror, SyncConfig,
    validation::{normalize_base_url, validate_base_url, validate_interval_secs, validate_username},
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Base URL of the primary (source of truth) appliance
    #[arg(long, env = "ADGUARD_PRIMARY", value_name = "URL")]
    primary: String,
    /// Base URL of the secondary (mirrored) appliance
    #[arg(long, env = "ADGUARD_SECONDARY", value_name = "URL")]
    secondary: String,
    /// Username on the primary appliance
    #[arg(long, env = "ADGUARD_USER", value_name = "NAME")]
    user: String,
    /// Password on the primary appliance
    #[arg(long, env = "ADGUARD_PASS", value_name = "PASSWORD", hide_env_values = true)]
    pass: String,
    /// Username on the secondary appliance (defaults to --user)
    #[arg(long, env = "SECONDARY_ADGUARD_USER", value_name = "NAME")]
    secondary_user: Option<String>,
    /// Password on the secondary appliance (defaults to --pass)
    #[arg(
        long,
        env = "SECONDARY_ADGUARD_PASS",
        value_name = "PASSWORD",
        hide_env_values = true
    )]
    secondary_pass: Option<String>,
    /// Seconds to sleep between passes
    #[arg(long, env = "REFRESH_INTERVAL_SECS", value_name = "SECS", default_value_t = 60)]
    refresh_interval_secs: u64,
    /// Mirror DNS rewrite entries
    #[arg(long, env = "SYNC_ENTRIES", default_value_t = true, action = ArgAction::Set)]
    sync_entries: bool,
    /// Mirror the blocked services list
    #[arg(long, env = "SYNC_BLOCKED_SERVICES", default_value_t = true, action = ArgAction::Set)]
    sync_blocked_services: bool,
    /// Mirror block and allow list subscriptions
    #[arg(long, env = "SYNC_FILTER_LISTS", default_value_t = true, action = ArgAction::Set)]
    sync_filter_lists: bool,
    /// Mirror custom filtering rules
    #[arg(long, env = "SYNC_CUSTOM_RULES", default_value_t = true, action = ArgAction::Set)]
    sync_custom_rules: bool,
    /// Mirror protection, filtering, query log and stats settings
    #[arg(long, env = "SYNC_GENERAL_SETTINGS", default_value_t = true, action = ArgAction::Set)]
    sync_general_settings: bool,
    /// Mirror DNS and access settings
    #[arg(long, env = "SYNC_DNS_SETTINGS", default_value_t = true, action = ArgAction::Set)]
    sync_dns_settings: bool,
    /// Mirror encryption (TLS) settings
    #[arg(long, env = "SYNC_ENCRYPTION_SETTINGS", default_value_t = true, action = ArgAction::Set)]
    sync_encryption_settings: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_sync_config(&cli)?;
    let mirror = Mirror::new(config);

    tokio::select! {
        res = mirror.run() => {
            let err = match res {
                Ok(never) => match never {},
                Err(err) => err,
            };
            Err(anyhow::Error::new(err).context("sync stopped"))
        }
        _ = shutdown_signal() => Ok(()),
    }
}

fn build_sync_config(cli: &Cli) -> Result<SyncConfig> {
    let primary = build_appliance(&cli.primary, &cli.user, &cli.pass)
        .context("invalid primary appliance settings")?;

    let secondary_user = cli.secondary_user.as_deref().unwrap_or(&cli.user);
    let secondary_pass = cli.secondary_pass.as_deref().unwrap_or(&cli.pass);
    let secondary = build_appliance(&cli.secondary, secondary_user, secondary_pass)
        .context("invalid secondary appliance settings")?;

    validate_interval_secs(cli.refresh_interval_secs)
        .with_context(|| format!("invalid refresh interval '{}'", cli.refresh_interval_secs))?;

    let domains = DomainToggles {
        entries: cli.sync_entries,
        blocked_services: cli.sync_blocked_services,
        filter_lists: cli.sync_filter_lists,
        custom_rules: cli.sync_custom_rules,
        general_settings: cli.sync_general_settings,
        dns_settings: cli.sync_dns_settings,
        encryption_settings: cli.sync_encryption_settings,
    };

    Ok(SyncConfig {
        primary,
        secondary,
        interval: Duration::from_secs(cli.refresh_interval_secs),
        domains,
    })
}

fn build_appliance(url: &str, user: &str, pass: &str) -> Result<ApplianceConfig> {
    let base_url = normalize_base_url(url);
    validate_base_url(&base_url).with_context(|| format!("invalid URL '{url}'"))?;
    validate_username(user)?;
    Ok(ApplianceConfig::new(base_url, user.trim(), pass))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,reqwest=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
