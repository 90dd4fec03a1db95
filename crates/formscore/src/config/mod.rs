use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::submissions::{AutoResponseConfig, SpamConfig, DEFAULT_SPAM_THRESHOLD};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub quality: QualityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quality: QualityConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Spam detection and auto-response settings for the submission engine.
#[derive(Debug, Clone, Default)]
pub struct QualityConfig {
    pub spam: SpamConfig,
    pub auto_response: AutoResponseConfig,
}

impl QualityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let threshold = match env::var("SPAM_THRESHOLD") {
            Ok(value) => value
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|threshold| *threshold <= 100)
                .ok_or(ConfigError::InvalidThreshold { value })?,
            Err(_) => DEFAULT_SPAM_THRESHOLD,
        };

        let ai_api_key = env::var("AI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let defaults = AutoResponseConfig::default();
        let from_name = env::var("AUTO_RESPONSE_FROM_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.from_name);
        let company_name = env::var("AUTO_RESPONSE_COMPANY_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| from_name.clone());

        Ok(Self {
            spam: SpamConfig {
                threshold,
                detection_enabled: flag("SPAM_DETECTION_ENABLED", true)?,
                ai_check_enabled: flag("AI_SPAM_CHECK_ENABLED", false)?,
                ai_api_key,
            },
            auto_response: AutoResponseConfig {
                enabled: flag("AUTO_RESPONSE_ENABLED", false)?,
                skip_low_scores: flag("AUTO_RESPONSE_SKIP_LOW_SCORES", false)?,
                from_name,
                company_name,
            },
        })
    }
}

fn flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { value } => {
                write!(f, "SPAM_THRESHOLD must be between 0 and 100, got '{value}'")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
