use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use relay_core::{ParserCategory, ParserDescriptor, ParserRegistry, RegistryError};
use relay_engine::{
    CoordinatorSettings, DeliveryMode, HostSettings, DEFAULT_CONTENT_SCRIPT, DEFAULT_HOST_PORTS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_ENV: &str = "RELAY_CONFIG";
const DEFAULT_CONFIG_FILENAME: &str = "relay.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hosts: HostsConfig,
    pub delivery: DeliveryMode,
    pub content_script: String,
    pub parsers: Vec<ParserDescriptor>,
    pub log: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hosts: HostsConfig::default(),
            delivery: DeliveryMode::default(),
            content_script: DEFAULT_CONTENT_SCRIPT.to_string(),
            parsers: default_parsers(),
            log: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn registry(&self) -> Result<ParserRegistry, RegistryError> {
        ParserRegistry::from_descriptors(self.parsers.iter().cloned())
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            content_script: self.content_script.clone(),
            delivery: self.delivery,
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    pub address: String,
    pub include_default_ports: bool,
    pub custom_ports: Vec<u16>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for HostsConfig {
    fn default() -> Self {
        let defaults = HostSettings::default();
        Self {
            address: defaults.address,
            include_default_ports: true,
            custom_ports: Vec::new(),
            connect_timeout_ms: defaults.connect_timeout.as_millis() as u64,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
        }
    }
}

impl HostsConfig {
    pub fn to_settings(&self) -> HostSettings {
        let mut ports = Vec::new();
        if self.include_default_ports {
            ports.extend_from_slice(&DEFAULT_HOST_PORTS);
        }
        ports.extend_from_slice(&self.custom_ports);

        HostSettings {
            address: self.address.clone(),
            ports,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

fn default_parsers() -> Vec<ParserDescriptor> {
    [
        ("AtCoderProblemParser", ParserCategory::Problem),
        ("AtCoderContestParser", ParserCategory::Contest),
        ("CodeforcesProblemParser", ParserCategory::Problem),
        ("CodeforcesContestParser", ParserCategory::Contest),
        ("CSESProblemParser", ParserCategory::Problem),
        ("KattisProblemParser", ParserCategory::Problem),
    ]
    .into_iter()
    .map(|(name, category)| ParserDescriptor::new(name, category))
    .collect()
}

/// `$RELAY_CONFIG` if set, otherwise `./relay.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".").join(DEFAULT_CONFIG_FILENAME))
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.hosts.to_settings().ports, DEFAULT_HOST_PORTS.to_vec());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relay.ron");
        fs::write(
            &path,
            r#"(
                hosts: (include_default_ports: false, custom_ports: [8080, 8081]),
                delivery: Concurrent,
                parsers: [(name: "LocalContestParser", category: Contest)],
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.delivery, DeliveryMode::Concurrent);
        assert_eq!(config.content_script, DEFAULT_CONTENT_SCRIPT);
        assert_eq!(config.hosts.to_settings().ports, vec![8080, 8081]);

        let registry = config.registry().unwrap();
        assert!(registry.get("LocalContestParser").unwrap().is_contest());
    }

    #[test]
    fn serialized_default_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relay.ron");
        let text =
            ron::ser::to_string_pretty(&AppConfig::default(), ron::ser::PrettyConfig::new())
                .unwrap();
        fs::write(&path, text).unwrap();

        assert_eq!(load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relay.ron");
        fs::write(&path, "(hosts: oops").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn duplicate_parsers_are_rejected() {
        let config = AppConfig {
            parsers: vec![
                ParserDescriptor::new("X", ParserCategory::Problem),
                ParserDescriptor::new("X", ParserCategory::Contest),
            ],
            ..AppConfig::default()
        };

        assert!(matches!(
            config.registry(),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);

        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }
}
