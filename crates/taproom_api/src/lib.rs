//! Transport-boundary adapter over `taproom_core`.
//!
//! Turns raw request pieces (path ids, query values, JSON bodies) into
//! service calls and service outcomes into status/location/body envelopes.

pub mod api;
pub mod config;
pub mod response;

pub use api::{
    with_beer_api, with_customer_api, BeerApi, BeerListParams, CustomerApi, CustomerListParams,
    BEER_PATH, CUSTOMER_PATH,
};
pub use config::ApiConfig;
pub use response::{ApiError, ApiResponse};

/// Starts file logging when `config` names a log directory.
///
/// Returns `Ok(false)` without side effects when no directory is configured.
///
/// # Errors
/// Same as [`taproom_core::init_logging`].
pub fn init_logging(config: &ApiConfig) -> Result<bool, String> {
    match config.log_dir.as_deref() {
        Some(log_dir) => taproom_core::init_logging(&config.log_level, log_dir).map(|()| true),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::{init_logging, ApiConfig};

    #[test]
    fn init_logging_is_skipped_without_log_dir() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(init_logging(&config), Ok(false));
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let config = ApiConfig {
            log_dir: Some("tmp/logs".to_string()),
            ..ApiConfig::from_lookup(|_| None)
        };
        assert!(init_logging(&config).is_err());
    }
}
