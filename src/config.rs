use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub read_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CJTP_PORT must be a valid u16")]
    InvalidPort,
    #[error("CJTP_READ_TIMEOUT_MS must be a positive number of milliseconds")]
    InvalidReadTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            bind_port: DEFAULT_PORT,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = env::var("CJTP_BIND_ADDR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.bind_addr);
        let bind_port = env::var("CJTP_PORT")
            .ok()
            .map(|value| value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(defaults.bind_port);
        let read_timeout = env::var("CJTP_READ_TIMEOUT_MS")
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|millis| *millis > 0)
                    .map(Duration::from_millis)
                    .ok_or(ConfigError::InvalidReadTimeout)
            })
            .transpose()?
            .unwrap_or(defaults.read_timeout);

        let config = Self {
            bind_addr,
            bind_port,
            read_timeout,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
