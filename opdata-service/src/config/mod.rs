use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct OpDataConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    /// Deadline applied to every store call made while serving a request.
    pub store_timeout: Duration,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl OpDataConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(OpDataConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI")?,
                database: get_env("MONGODB_DATABASE")?,
                collection: get_env("COLLECTION_NAME")?,
            },
            store_timeout: parse_timeout(env::var("STORE_TIMEOUT_SECS").ok().as_deref())?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn parse_timeout(raw: Option<&str>) -> Result<Duration, AppError> {
    let secs = match raw {
        None => DEFAULT_STORE_TIMEOUT_SECS,
        Some(value) => value.trim().parse::<u64>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "STORE_TIMEOUT_SECS must be a positive integer, got '{}': {}",
                value,
                e
            ))
        })?,
    };

    if secs == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "STORE_TIMEOUT_SECS must be greater than zero"
        )));
    }

    Ok(Duration::from_secs(secs))
}

/// Required variable; an empty value counts as unset.
fn get_env(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_to_five_seconds() {
        assert_eq!(parse_timeout(None).unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_parses_override() {
        assert_eq!(parse_timeout(Some("12")).unwrap(), Duration::from_secs(12));
    }

    #[test]
    fn test_timeout_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_timeout(Some("0")),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            parse_timeout(Some("soon")),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let err = get_env("OPDATA_TEST_SURELY_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("OPDATA_TEST_SURELY_UNSET_KEY"));
    }
}
