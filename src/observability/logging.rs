use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::AppError;

/// Installs the global tracing subscriber. Fails if one is already set.
pub fn init(config: &Config) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|err| AppError::Internal(format!("invalid LOG_LEVEL: {err}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match config.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|err| AppError::Internal(format!("failed to install subscriber: {err}")))
}

#[cfg(test)]
mod tests {
    use super::init;
    use crate::config::{Config, LogFormat};

    #[test]
    fn rejects_a_second_subscriber() {
        let config = Config {
            log_format: LogFormat::Json,
            ..Config::default()
        };
        assert!(init(&config).is_ok());
        assert!(init(&config).is_err());
    }
}
