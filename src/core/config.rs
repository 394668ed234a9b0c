use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub incidents: IncidentConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Pool bounds for the single Postgres database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Settings for the incident resource
#[derive(Debug, Clone)]
pub struct IncidentConfig {
    /// Deadline applied to every store operation, on the client and on the server
    pub operation_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            incidents: IncidentConfig::from_env()?,
        })
    }
}

/// Reads `key`, falling back to `default` when unset. A set but unparsable
/// value is an error rather than a silent fallback.
fn env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env_or("HOST", "127.0.0.1".to_string())?,
            port: env_or("PORT", 8080)?,
            cors_allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", "*".to_string())?),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
        })
    }
}

impl IncidentConfig {
    const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let secs = env_or(
            "INCIDENT_OPERATION_TIMEOUT_SECS",
            Self::DEFAULT_OPERATION_TIMEOUT_SECS,
        )?;
        Self::with_timeout_secs(secs)
    }

    fn with_timeout_secs(secs: u64) -> Result<Self, String> {
        if secs == 0 {
            return Err("INCIDENT_OPERATION_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            operation_timeout: Duration::from_secs(secs),
        })
    }
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(Self::DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}
