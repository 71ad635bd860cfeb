//! Application configuration loading from config.toml
//!
//! The tracker runs without any configuration file: every setting has a
//! default matching a Portuguese-language personal budget (euro as the base
//! currency, Portuguese month and category names). A `config.toml` in the
//! working directory, or the file named by `EXPENSES_CONFIG`, overrides
//! those defaults field by field. The database path can then be replaced
//! by `EXPENSES_DATABASE`, and that in turn by the `--database` flag.
//! See [`apply_overrides`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "EXPENSES_CONFIG";
/// Environment variable overriding `database_path`.
pub const DATABASE_PATH_ENV: &str = "EXPENSES_DATABASE";
/// Configuration file looked up when `EXPENSES_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// A currency the user can record expenses in.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CurrencyConfig {
    /// ISO-style code stored with each expense (e.g. `EUR`)
    pub code: String,
    /// Symbol used when displaying amounts (e.g. `€`)
    pub symbol: String,
}

/// Settings for the whole application.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// `SQLite` file holding the expenses table
    pub database_path: PathBuf,
    /// Currency preselected for new expenses
    pub default_currency: String,
    /// Currencies offered for new expenses and filters
    pub currencies: Vec<CurrencyConfig>,
    /// Categories offered for new expenses and filters
    pub categories: Vec<String>,
    /// Localized month names, January first
    pub month_names: Vec<String>,
    /// Earliest year accepted for a new expense
    pub first_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let currency = |code: &str, symbol: &str| CurrencyConfig {
            code: code.to_string(),
            symbol: symbol.to_string(),
        };
        Self {
            database_path: PathBuf::from("expenses.db"),
            default_currency: "EUR".to_string(),
            currencies: vec![
                currency("BRL", "R$"),
                currency("USD", "$"),
                currency("EUR", "€"),
            ],
            categories: [
                "Alimentação",
                "Moradia",
                "Transporte",
                "Serviços",
                "Lazer",
                "Outros",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            month_names: [
                "Janeiro",
                "Fevereiro",
                "Março",
                "Abril",
                "Maio",
                "Junho",
                "Julho",
                "Agosto",
                "Setembro",
                "Outubro",
                "Novembro",
                "Dezembro",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            first_year: 2021,
        }
    }
}

impl AppConfig {
    /// Checks the invariants the rest of the application relies on.
    pub fn validate(&self) -> Result<()> {
        if self.month_names.len() != 12 {
            return Err(Error::Config {
                message: format!(
                    "month_names must list exactly 12 names, found {}",
                    self.month_names.len()
                ),
            });
        }
        if self.categories.is_empty() {
            return Err(Error::Config {
                message: "at least one category must be configured".to_string(),
            });
        }
        if self.currencies.is_empty() {
            return Err(Error::Config {
                message: "at least one currency must be configured".to_string(),
            });
        }
        if self.currency(&self.default_currency).is_none() {
            return Err(Error::Config {
                message: format!(
                    "default_currency '{}' is not among the configured currencies",
                    self.default_currency
                ),
            });
        }
        Ok(())
    }

    /// Looks up a configured currency by code.
    #[must_use]
    pub fn currency(&self, code: &str) -> Option<&CurrencyConfig> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Display symbol for a currency code; empty when the code is unknown.
    #[must_use]
    pub fn symbol_for(&self, code: &str) -> &str {
        self.currency(code).map_or("", |c| c.symbol.as_str())
    }

    /// Localized name of a month number, `N/A` outside 1-12.
    #[must_use]
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|index| self.month_names.get(index as usize))
            .map_or("N/A", String::as_str)
    }

    /// Whether `category` is one of the configured categories.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Loads configuration from a TOML file.
///
/// Fields absent from the file keep their defaults.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid TOML, or
/// fails [`AppConfig::validate`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    let config: AppConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Resolves the configuration the application starts with.
///
/// Reads the file named by `EXPENSES_CONFIG` (or `config.toml`); a missing
/// default file falls back to [`AppConfig::default`], while a missing file
/// named explicitly through the environment is an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok();
    let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE));

    let config = if explicit.is_some() || path.exists() {
        info!("Loading configuration from {}", path.display());
        load_config(&path)?
    } else {
        info!("No {} found, using built-in defaults.", DEFAULT_CONFIG_FILE);
        AppConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Replaces `database_path` with `cli_database` (the `--database` flag)
/// or, failing that, with `EXPENSES_DATABASE`.
///
/// Applies the same way whichever file the configuration came from.
pub fn apply_overrides(config: &mut AppConfig, cli_database: Option<PathBuf>) {
    let from_env = std::env::var_os(DATABASE_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    override_database_path(config, cli_database, from_env);
}

fn override_database_path(
    config: &mut AppConfig,
    cli_database: Option<PathBuf>,
    env_database: Option<PathBuf>,
) {
    if let Some(path) = cli_database {
        debug!("Database path overridden by --database");
        config.database_path = path;
    } else if let Some(path) = env_database {
        debug!("Database path overridden by {}", DATABASE_PATH_ENV);
        config.database_path = path;
    }
}
