use database::{
    config::{DatabaseConfig, optional, parse_optional, required},
    error::ConfigError,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    /// Issuer whose JWTs authenticate users
    pub oidc_issuer_url: String,
    pub bind_address: String,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_address: optional("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_owned()),
            run_migrations: parse_optional("RUN_MIGRATIONS")?.unwrap_or(false),
        })
    }
}
