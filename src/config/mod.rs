use std::env;
use anyhow::{Result, Context};
use tracing::{info, warn};

const BYTES_PER_MB: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_size_mb: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| {
                info!("SERVER_HOST not set, using default: 127.0.0.1");
                "127.0.0.1".to_string()
            }),
            server_port: Self::parse_env_var("SERVER_PORT", 9041)
                .context("Failed to parse SERVER_PORT")?,
            max_upload_size_mb: Self::parse_env_var("MAX_UPLOAD_SIZE_MB", 50)
                .context("Failed to parse MAX_UPLOAD_SIZE_MB")?,
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_upload_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.max_upload_size_mb.checked_mul(BYTES_PER_MB).is_none() {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_MB is too large: {}",
                self.max_upload_size_mb
            ));
        }
        Ok(())
    }

    /// Upload body limit in bytes, as handed to `DefaultBodyLimit`.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// `host:port`, with `PORT` taking precedence over `SERVER_PORT` when it parses.
    pub fn bind_address(&self) -> String {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.server_port);
        format!("{}:{}", self.server_host, port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 9041,
            max_upload_size_mb: 50,
        }
    }
}
