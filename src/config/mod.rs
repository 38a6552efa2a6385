use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::TranscriptApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Settings for requests sent to YouTube
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Listening port
    pub port: u16,

    /// Verbose logging for development
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Browser user agent presented to YouTube
    pub user_agent: String,

    /// Accept-Language header presented to YouTube
    pub accept_language: String,

    /// Transport timeout for each upstream request, in seconds
    pub timeout_secs: u64,

    /// Language requested when the caller does not pass one
    pub default_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                debug: false,
            },
            upstream: UpstreamConfig {
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
                accept_language: "en-US,en;q=0.9".to_string(),
                timeout_secs: 30,
                default_language: "en".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from `path`, the default location, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs_err::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-api").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(TranscriptApiError::ConfigError("server.host must not be empty".to_string()).into());
        }

        if self.upstream.user_agent.trim().is_empty() {
            return Err(TranscriptApiError::ConfigError("upstream.user_agent must not be empty".to_string()).into());
        }

        if self.upstream.timeout_secs == 0 {
            return Err(TranscriptApiError::ConfigError("upstream.timeout_secs must be positive".to_string()).into());
        }

        if self.upstream.default_language.trim().is_empty() {
            return Err(TranscriptApiError::ConfigError("upstream.default_language must not be empty".to_string()).into());
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Host: {}", self.server.host);
        println!("  Port: {}", self.server.port);
        println!("  Debug: {}", self.server.debug);
        println!("  User Agent: {}", self.upstream.user_agent);
        println!("  Accept-Language: {}", self.upstream.accept_language);
        println!("  Timeout: {}s", self.upstream.timeout_secs);
        println!("  Default Language: {}", self.upstream.default_language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.upstream.default_language, "en");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 8080
  debug: true
upstream:
  user_agent: test-agent
  accept_language: de-DE
  timeout_secs: 5
  default_language: de
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.server.debug);
        assert_eq!(config.upstream.timeout_secs, 5);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/transcript-api.yaml"))).is_err());
    }
}
