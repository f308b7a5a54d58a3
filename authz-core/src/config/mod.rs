use serde::Deserialize;
use std::env;

use crate::services::error::AuthzError;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthzConfig {
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub test_mode: TestModeConfig,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Test mode (impersonation) settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TestModeConfig {
    /// Fixed session TTL in minutes. Not renewable mid-session.
    pub ttl_minutes: i64,
}

impl Default for TestModeConfig {
    fn default() -> Self {
        Self { ttl_minutes: 5 }
    }
}

impl TestModeConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl AuthzConfig {
    pub fn from_env() -> Result<Self, AuthzError> {
        dotenvy::dotenv().ok();

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AuthzError::Config(anyhow::anyhow!(e)))?;

        let ttl_minutes = get_env("TEST_MODE_TTL_MINUTES", Some("5"))?
            .parse::<i64>()
            .map_err(|e| {
                AuthzError::Config(anyhow::anyhow!("invalid TEST_MODE_TTL_MINUTES: {}", e))
            })?;
        if ttl_minutes <= 0 {
            return Err(AuthzError::Config(anyhow::anyhow!(
                "TEST_MODE_TTL_MINUTES must be positive"
            )));
        }

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Some(DatabaseConfig {
                url,
                max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("10"))?
                    .parse::<u32>()
                    .map_err(|e| {
                        AuthzError::Config(anyhow::anyhow!(
                            "invalid DATABASE_MAX_CONNECTIONS: {}",
                            e
                        ))
                    })?,
                min_connections: get_env("DATABASE_MIN_CONNECTIONS", Some("1"))?
                    .parse::<u32>()
                    .map_err(|e| {
                        AuthzError::Config(anyhow::anyhow!(
                            "invalid DATABASE_MIN_CONNECTIONS: {}",
                            e
                        ))
                    })?,
            }),
            _ => None,
        };

        Ok(AuthzConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("authz-core"))?,
            log_level: get_env("LOG_LEVEL", Some("info"))?,
            test_mode: TestModeConfig { ttl_minutes },
            database,
        })
    }
}

fn get_env(name: &str, default: Option<&str>) -> Result<String, AuthzError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => match default {
            Some(value) => Ok(value.to_string()),
            None => Err(AuthzError::Config(anyhow::anyhow!(
                "missing required environment variable: {}",
                name
            ))),
        },
    }
}
