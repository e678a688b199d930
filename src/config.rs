use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub donation_queue_size: usize,
    pub event_buffer_size: usize,
    /// Radius of the NGO geo query run for every donation.
    pub ngo_search_radius_meters: f64,
    pub restaurant_search_radius_km: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            donation_queue_size: 1024,
            event_buffer_size: 1024,
            ngo_search_radius_meters: 10_000.0,
            restaurant_search_radius_km: 10.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref())?,
            donation_queue_size: parse_or_default(
                "DONATION_QUEUE_SIZE",
                env_value("DONATION_QUEUE_SIZE").as_deref(),
                defaults.donation_queue_size,
            )?,
            event_buffer_size: parse_or_default(
                "EVENT_BUFFER_SIZE",
                env_value("EVENT_BUFFER_SIZE").as_deref(),
                defaults.event_buffer_size,
            )?,
            ngo_search_radius_meters: parse_or_default(
                "NGO_SEARCH_RADIUS_METERS",
                env_value("NGO_SEARCH_RADIUS_METERS").as_deref(),
                defaults.ngo_search_radius_meters,
            )?,
            restaurant_search_radius_km: parse_or_default(
                "RESTAURANT_SEARCH_RADIUS_KM",
                env_value("RESTAURANT_SEARCH_RADIUS_KM").as_deref(),
                defaults.restaurant_search_radius_km,
            )?,
        })
    }
}

fn parse_log_format(raw: Option<&str>) -> Result<LogFormat, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("compact") => Ok(LogFormat::Compact),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(AppError::Internal(format!(
            "invalid LOG_FORMAT: {other}, expected compact/json"
        ))),
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_or_default<T>(key: &str, raw: Option<&str>, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        None => Ok(default),
    }
}
