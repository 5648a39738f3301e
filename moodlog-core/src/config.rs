use config::{Config, File};
use serde::Deserialize;

use crate::error::MoodlogError;

/// Environment variable consulted when `[speech] api_key` is left empty.
pub const SPEECH_API_KEY_ENV: &str = "MOODLOG_SPEECH_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct MoodlogConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "HttpConfig::echo_default")]
    pub echo: HttpConfig,
    #[serde(default)]
    pub speech: SpeechSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://moodlog.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl HttpConfig {
    fn echo_default() -> Self {
        Self {
            port: 5001,
            ..Self::default()
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechSettings {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/speech-api/v2".to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for MoodlogConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            http: HttpConfig::default(),
            echo: HttpConfig::echo_default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl MoodlogConfig {
    pub fn load(path: &str) -> Result<Self, MoodlogError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        let mut config: Self = s.try_deserialize()?;
        if config.speech.api_key.is_empty() {
            config.speech.api_key = std::env::var(SPEECH_API_KEY_ENV).unwrap_or_default();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = MoodlogConfig::load("/nonexistent/moodlog-config").unwrap();
        assert_eq!(config.database.url, "sqlite://moodlog.db");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.echo.port, 5001);
        assert_eq!(config.speech.language, "en-US");
    }

    #[test]
    fn test_partial_file_overrides_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "sqlite:///tmp/journal.db"
max_connections = 2

[echo]
host = "0.0.0.0"
port = 7001
"#
        )
        .unwrap();

        let config = MoodlogConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database.url, "sqlite:///tmp/journal.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.echo.addr(), "0.0.0.0:7001");
        // untouched sections keep their defaults
        assert_eq!(config.http.addr(), "127.0.0.1:5000");
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_mistyped_value_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[http]
port = "not-a-port"
"#
        )
        .unwrap();

        let result = MoodlogConfig::load(file.path().to_str().unwrap());
        assert!(matches!(result, Err(MoodlogError::Config(_))));
    }
}
