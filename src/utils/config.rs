use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.yml";

/// Application configuration.
///
/// Values come from the YAML config file and are then overridden by
/// environment variables and command line flags (see `ConfigOverrides`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,

    /// CSV file to index
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub port: Option<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base level or `EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single-line events
    #[default]
    Compact,
    /// JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" | "jsonl" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected compact or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    /// Load config from `path`, or from `DEFAULT_CONFIG_PATH` if it exists.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document is a valid, all-default config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides on top of the loaded values
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(file) = overrides.file {
            self.file = Some(file);
        }
        if let Some(host) = overrides.host {
            self.http.host = host;
        }
        if let Some(port) = overrides.port {
            self.http.port = Some(port);
        }
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
    }

    /// The CSV file to index; required
    pub fn source_file(&self) -> Result<&Path> {
        self.file
            .as_deref()
            .context("config: `file` is required (set FILE or pass --file)")
    }

    /// Address to bind the HTTP listener to; requires a port
    pub fn listen_addr(&self) -> Result<String> {
        let port = self
            .http
            .port
            .context("config: `http.port` is required (set HTTP_PORT or pass --port)")?;
        Ok(format!("{}:{}", self.http.host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_yaml() {
        let config = AppConfig::from_yaml(
            "http:\n  port: 8080\nfile: ./data/items.csv\nlog:\n  level: debug\n  format: json\n",
        )
        .unwrap();

        assert_eq!(config.http.port, Some(8080));
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.file, Some(PathBuf::from("./data/items.csv")));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_bad_port() {
        assert!(AppConfig::from_yaml("http:\n  port: not-a-port\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::from_yaml("http:\n  port: 8080\nfile: a.csv\n").unwrap();
        config.apply(ConfigOverrides {
            file: Some(PathBuf::from("b.csv")),
            port: Some(9090),
            log_format: Some(LogFormat::Json),
            ..Default::default()
        });

        assert_eq!(config.source_file().unwrap(), Path::new("b.csv"));
        assert_eq!(config.listen_addr().unwrap(), "0.0.0.0:9090");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_required_values() {
        let config = AppConfig::default();
        let file_err = config.source_file().unwrap_err().to_string();
        assert!(file_err.contains("FILE"));
        let port_err = config.listen_addr().unwrap_err().to_string();
        assert!(port_err.contains("HTTP_PORT"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http:\n  host: 127.0.0.1\n  port: 3000").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:3000");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/getitems.yml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
