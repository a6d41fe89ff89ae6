use anyhow::{Context, Result};
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info};
use workflow::{AccountDirectory, BalanceRequestWorkflow};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fundsadmin.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "fundsadmin=debug,workflow=debug,tower_http=debug";

/// Runtime settings.
///
/// Built-in defaults, then an optional `fundsadmin.toml` in the working
/// directory, then `FUNDSADMIN_*` environment variables. Command line flags
/// are applied on top by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from("fundsadmin")
    }

    /// Load with `file` as the base name of the optional settings file.
    pub fn load_from(file: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(::config::File::with_name(file).required(false))
            .add_source(::config::Environment::with_prefix("FUNDSADMIN").try_parsing(true))
            .build()
            .context("Failed to read settings")?;

        let settings: Settings = settings
            .try_deserialize()
            .context("Invalid settings")?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }
}

/// Log filter to use when `RUST_LOG` is not set.
pub fn log_filter_from_env() -> String {
    Settings::load()
        .map(|settings| settings.log_filter)
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Connect to the database and build the application state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        requests: BalanceRequestWorkflow::with_tracing(db.clone()),
        accounts: AccountDirectory::new(db.clone()),
        db,
    })
}
