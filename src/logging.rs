//! Sets up the global `tracing` subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::Error;

/// Install a subscriber that prints events matching `filter` to stdout.
///
/// `filter` takes `tracing` directives such as "info" or
/// "finboard=debug,warn". Call once at start-up.
///
/// # Errors
/// Returns [Error::InvalidConfig] if `filter` cannot be parsed, or
/// [Error::LoggingError] if a global subscriber is already installed.
pub fn setup_logging(filter: &str) -> Result<(), Error> {
    let filter = parse_filter(filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|error| Error::LoggingError(error.to_string()))
}

fn parse_filter(directives: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(directives)
        .map_err(|_| Error::InvalidConfig(crate::config::LOG_FILTER_VAR, directives.to_owned()))
}
