use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated. Any origin when unset.
    pub cors_origins: Option<String>,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Code execution backend endpoint
    #[serde(default = "default_jdoodle_url")]
    pub jdoodle_url: String,
    pub jdoodle_client_id: Option<String>,
    pub jdoodle_client_secret: Option<String>,

    #[serde(default = "default_compile_timeout_secs")]
    pub compile_timeout_secs: u64,

    /// Drop document logs untouched for this long. Never when unset.
    pub doc_idle_ttl_secs: Option<u64>,

    /// Upper bound on retained document logs. No bound when unset.
    pub doc_max_rooms: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    pub fn doc_idle_ttl(&self) -> Option<Duration> {
        self.doc_idle_ttl_secs.map(Duration::from_secs)
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }

    /// Configured CORS origins, empty when any origin is allowed
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            service_name: default_service_name(),
            jdoodle_url: default_jdoodle_url(),
            jdoodle_client_id: None,
            jdoodle_client_secret: None,
            compile_timeout_secs: default_compile_timeout_secs(),
            doc_idle_ttl_secs: None,
            doc_max_rooms: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] envy::Error),
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_service_name() -> String {
    "colabri-rooms".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_jdoodle_url() -> String {
    "https://api.jdoodle.com/v1/execute".to_string()
}

fn default_compile_timeout_secs() -> u64 {
    10
}
