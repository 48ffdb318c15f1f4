use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    pub session_ttl_hours: i64,
    pub session_purge_secs: u64,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("ROOMSWAP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse(&lookup, "ROOMSWAP_PORT", 5000)?;
        let bind_address = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("ROOMSWAP_HOST", e.to_string()))?;

        let db_path = lookup("ROOMSWAP_DB_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let session_ttl_hours: i64 = parse(&lookup, "ROOMSWAP_SESSION_TTL_HOURS", 24)?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "ROOMSWAP_SESSION_TTL_HOURS",
                "must be positive".into(),
            ));
        }
        let session_purge_secs: u64 = parse(&lookup, "ROOMSWAP_SESSION_PURGE_SECS", 300)?;
        if session_purge_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ROOMSWAP_SESSION_PURGE_SECS",
                "must be positive".into(),
            ));
        }
        let seed: bool = parse(&lookup, "ROOMSWAP_SEED", true)?;

        Ok(Self {
            bind_address,
            db_path,
            session_ttl_hours,
            session_purge_secs,
            seed,
        })
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
        None => Ok(default),
    }
}
