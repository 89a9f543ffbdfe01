use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/issuedesk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub token: String,
    pub account_id: String,
    pub timezone: String,
    pub page_size: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: String::new(),
            account_id: String::new(),
            timezone: engine::DEFAULT_TIMEZONE.to_string(),
            page_size: client::DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

/// Flags shared by every command; each one overrides file and environment.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000/api).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override bearer token.
    #[arg(long, global = true, hide_env_values = true, env = "ISSUEDESK_TOKEN")]
    pub token: Option<String>,
    /// Override the account the commands run against.
    #[arg(long = "account", global = true)]
    pub account_id: Option<String>,
    /// Override timezone (IANA name) used for dates.
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override page size for listings.
    #[arg(long, global = true)]
    pub page_size: Option<u32>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ISSUEDESK"));
    let settings: AppConfig = builder.build()?.try_deserialize()?;

    Ok(apply_overrides(settings, args))
}

fn apply_overrides(mut settings: AppConfig, args: &GlobalArgs) -> AppConfig {
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        settings.token = token.clone();
    }
    if let Some(account_id) = &args.account_id {
        settings.account_id = account_id.clone();
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }
    settings
}
