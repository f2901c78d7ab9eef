//! Application configuration read from environment variables.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use crate::{
    Error,
    models::{DEFAULT_CURRENCY, is_valid_currency},
};

/// Selects the product variant, which decides e.g. whether default categories are seeded.
pub const VARIANT_VAR: &str = "FINBOARD_VARIANT";
/// The path to a SQLite database. Records are kept in memory when it is unset.
pub const DB_PATH_VAR: &str = "FINBOARD_DB_PATH";
/// The default currency code for new users.
pub const CURRENCY_VAR: &str = "FINBOARD_CURRENCY";
/// The `tracing` filter directives.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// The product variants sharing this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Personal finances.
    #[default]
    Personal,
    /// Individual micro-entrepreneurs (MEI).
    Mei,
    /// Domestic workers paid by the day.
    Diarista,
}

impl Variant {
    /// The lowercase name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Personal => "personal",
            Variant::Mei => "mei",
            Variant::Diarista => "diarista",
        }
    }

    /// Whether an empty category collection gets the default categories.
    pub fn seeds_default_categories(&self) -> bool {
        matches!(self, Variant::Mei)
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Variant::Personal),
            "mei" => Ok(Variant::Mei),
            "diarista" => Ok(Variant::Diarista),
            _ => Err(Error::InvalidConfig(VARIANT_VAR, s.to_owned())),
        }
    }
}

/// Where records are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Backend {
    /// In process memory, lost on exit.
    #[default]
    Memory,
    /// A SQLite database file.
    Sqlite(PathBuf),
}

/// The settings needed to wire up the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The product variant.
    pub variant: Variant,
    /// Where records are persisted.
    pub backend: Backend,
    /// The default currency code for new users.
    pub currency: String,
    /// The `tracing` filter directives, e.g. "info" or "finboard=debug".
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            backend: Backend::default(),
            currency: DEFAULT_CURRENCY.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if a variable is set to a value that cannot be used.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Unset and blank variables take their default.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if a variable is set to a value that cannot be used.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let variant = match get(VARIANT_VAR) {
            Some(value) => value.parse()?,
            None => defaults.variant,
        };

        let backend = match get(DB_PATH_VAR) {
            Some(path) => Backend::Sqlite(PathBuf::from(path)),
            None => defaults.backend,
        };

        let currency = match get(CURRENCY_VAR) {
            Some(code) if is_valid_currency(&code) => code,
            Some(code) => return Err(Error::InvalidConfig(CURRENCY_VAR, code)),
            None => defaults.currency,
        };

        let log_filter = get(LOG_FILTER_VAR).unwrap_or(defaults.log_filter);

        Ok(Self {
            variant,
            backend,
            currency,
            log_filter,
        })
    }
}
