//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub sweep_interval: Duration,
    pub log_level: tracing::Level,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} must be a valid value ('{}'): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde el entorno (`.env` ya cargado por main)
    pub fn from_env() -> Result<Self> {
        let environment = var_or("ENVIRONMENT", "development");
        let default_level = if environment == "production" { "info" } else { "debug" };

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        let sweep_secs: u64 = parse_var("RESERVATION_SWEEP_INTERVAL_SECS", 60)?;
        if sweep_secs == 0 {
            return Err(anyhow!("RESERVATION_SWEEP_INTERVAL_SECS must be greater than 0"));
        }

        Ok(Self {
            port: parse_var("PORT", 3000)?,
            host: var_or("HOST", "0.0.0.0"),
            jwt_secret,
            cors_origins: parse_origins(&var_or("CORS_ORIGINS", "")),
            sweep_interval: Duration::from_secs(sweep_secs),
            log_level: parse_var("LOG_LEVEL", default_level.parse()?)?,
            environment,
        })
    }

    /// Configuración de desarrollo con valores por defecto
    pub fn development(jwt_secret: impl Into<String>) -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "127.0.0.1".to_string(),
            jwt_secret: jwt_secret.into(),
            cors_origins: Vec::new(),
            sweep_interval: Duration::from_secs(60),
            log_level: tracing::Level::DEBUG,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert_eq!(
            parse_origins("http://localhost:5173, https://admin.example.com ,"),
            vec!["http://localhost:5173", "https://admin.example.com"]
        );
    }

    #[test]
    fn test_development_defaults() {
        let config = EnvironmentConfig::development("secret");
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.server_url(), "127.0.0.1:3000");
    }
}
