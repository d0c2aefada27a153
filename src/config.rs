use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::Duration;
use tracing::{debug, info};

use crate::error::Error;

/// Runtime settings, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
    pub bind_address: String,
    pub public_url: String,
    pub session_ttl_hours: i64,
    pub seed_sample_data: bool,
    pub admin_name: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn load() -> Result<Config, Error> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("loaded environment from {}", path.display());
        }

        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            mongodb_uri: try_load(&lookup, "MONGODB_URI", "mongodb://localhost:27017")?,
            database_name: try_load(&lookup, "DATABASE_NAME", "campaign_admin")?,
            bind_address: try_load(&lookup, "BIND_ADDRESS", "127.0.0.1:8080")?,
            public_url: try_load(&lookup, "PUBLIC_URL", "http://localhost:8080")?,
            session_ttl_hours: try_load(&lookup, "SESSION_TTL_HOURS", "24")?,
            seed_sample_data: try_load(&lookup, "SEED_SAMPLE_DATA", "true")?,
            admin_name: try_load(&lookup, "ADMIN_NAME", "Administrator")?,
            admin_email: lookup("ADMIN_EMAIL").filter(|value| !value.is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|value| !value.is_empty()),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }

    /// The connection string with any `user:password@` replaced, for logs.
    pub fn redacted_mongodb_uri(&self) -> String {
        redact_userinfo(&self.mongodb_uri)
    }
}

fn redact_userinfo(uri: &str) -> String {
    let (scheme, rest) = match uri.split_once("://") {
        Some(parts) => parts,
        None => return uri.to_string(),
    };

    let authority_end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => uri.to_string(),
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|err: T::Err| Error::InvalidConfiguration {
        key: key.to_string(),
        reason: err.to_string(),
    })
}
