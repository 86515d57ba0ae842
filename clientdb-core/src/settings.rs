//! Settings loading from env files and the process environment.
//!
//! Sources are layered in order, later sources overriding earlier ones.
//! Every required key is looked up across the merged view and coerced to
//! its declared kind before a [`Settings`] value is constructed.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigurationError;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_NAME: &str = "DB_NAME";

/// Env file consulted by [`default_sources`]
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Kind a raw setting value is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingKind {
    String,
    Port,
}

impl SettingKind {
    fn describe(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Port => "integer port (0-65535)",
        }
    }
}

const REQUIRED: [(&str, SettingKind); 5] = [
    (DB_HOST, SettingKind::String),
    (DB_PORT, SettingKind::Port),
    (DB_USER, SettingKind::String),
    (DB_PASSWORD, SettingKind::String),
    (DB_NAME, SettingKind::String),
];

/// One layer of configuration input
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// `KEY=value` file; skipped when it does not exist
    EnvFile(PathBuf),
    /// The process environment
    Environment,
    /// Explicit key/value pairs
    Map(HashMap<String, String>),
}

impl SettingsSource {
    /// Build a `Map` source from any iterator of pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn collect_into(&self, merged: &mut HashMap<String, String>) -> Result<(), ConfigurationError> {
        match self {
            Self::EnvFile(path) => {
                if !path.exists() {
                    debug!("env file {} not found, skipping", path.display());
                    return Ok(());
                }

                // from_path_iter parses without touching the process environment
                let iter = dotenvy::from_path_iter(path)
                    .map_err(|e| ConfigurationError::env_file(path, e))?;
                let mut count = 0usize;
                for item in iter {
                    let (key, value) = item.map_err(|e| ConfigurationError::env_file(path, e))?;
                    merged.insert(key, value);
                    count += 1;
                }
                debug!("loaded {} entries from {}", count, path.display());
            }
            Self::Environment => {
                for (key, _) in REQUIRED {
                    if let Ok(value) = std::env::var(key) {
                        merged.insert(key.to_string(), value);
                    }
                }
            }
            Self::Map(pairs) => {
                merged.extend(pairs.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        Ok(())
    }
}

/// `.env` in the working directory, then the process environment.
pub fn default_sources() -> Vec<SettingsSource> {
    vec![
        SettingsSource::EnvFile(PathBuf::from(DEFAULT_ENV_FILE)),
        SettingsSource::Environment,
    ]
}

/// Validated database connection parameters.
///
/// Constructed only by [`load_settings`] or [`Settings::new`]; never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    host: String,
    port: u16,
    user: String,
    password: String,
    database_name: String,
}

impl Settings {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database_name: database_name.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database_name", &self.database_name)
            .finish()
    }
}

/// Load [`Settings`] from `sources`, applied in order.
///
/// # Errors
///
/// - [`ConfigurationError::Missing`] listing every required key absent from all sources
/// - [`ConfigurationError::InvalidValue`] when a value fails coercion (e.g. `DB_PORT=abc`)
/// - [`ConfigurationError::EnvFile`] when an existing env file cannot be parsed
pub fn load_settings(sources: &[SettingsSource]) -> Result<Settings, ConfigurationError> {
    let mut merged = HashMap::new();
    for source in sources {
        source.collect_into(&mut merged)?;
    }

    let missing: Vec<&'static str> = REQUIRED
        .iter()
        .filter(|(key, _)| !merged.contains_key(*key))
        .map(|(key, _)| *key)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigurationError::Missing { keys: missing });
    }

    let mut take = |key: &'static str| merged.remove(key).unwrap_or_default();

    let host = take(DB_HOST);
    let port = coerce_port(take(DB_PORT))?;
    let user = take(DB_USER);
    let password = take(DB_PASSWORD);
    let database_name = take(DB_NAME);

    Ok(Settings {
        host,
        port,
        user,
        password,
        database_name,
    })
}

fn coerce_port(raw: String) -> Result<u16, ConfigurationError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigurationError::invalid_value(DB_PORT, raw, SettingKind::Port.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn full_map() -> SettingsSource {
        SettingsSource::map([
            (DB_HOST, "localhost"),
            (DB_PORT, "5432"),
            (DB_USER, "u"),
            (DB_PASSWORD, "p"),
            (DB_NAME, "d"),
        ])
    }

    #[test]
    fn loads_all_fields_from_map() {
        let settings = load_settings(&[full_map()]).unwrap();
        assert_eq!(settings.host(), "localhost");
        assert_eq!(settings.port(), 5432);
        assert_eq!(settings.user(), "u");
        assert_eq!(settings.password(), "p");
        assert_eq!(settings.database_name(), "d");
    }

    #[test]
    fn missing_keys_are_all_reported() {
        let source = SettingsSource::map([(DB_HOST, "localhost"), (DB_USER, "u")]);
        match load_settings(&[source]) {
            Err(ConfigurationError::Missing { keys }) => {
                assert_eq!(keys, vec![DB_PORT, DB_PASSWORD, DB_NAME]);
            }
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let override_port = SettingsSource::map([(DB_PORT, "abc")]);
        let err = load_settings(&[full_map(), override_port]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidValue { key: DB_PORT, .. }
        ));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let override_port = SettingsSource::map([(DB_PORT, "70000")]);
        assert!(load_settings(&[full_map(), override_port]).is_err());
    }

    #[test]
    fn later_sources_override_earlier() {
        let override_host = SettingsSource::map([(DB_HOST, "db.internal")]);
        let settings = load_settings(&[full_map(), override_host]).unwrap();
        assert_eq!(settings.host(), "db.internal");
    }

    #[test]
    fn env_file_is_read_and_overridable() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DB_HOST=filehost").unwrap();
        writeln!(file, "DB_PORT=6543").unwrap();
        writeln!(file, "DB_USER=fileuser").unwrap();
        writeln!(file, "DB_PASSWORD=filepass").unwrap();
        writeln!(file, "DB_NAME=filedb").unwrap();
        file.flush().unwrap();

        let sources = [
            SettingsSource::EnvFile(file.path().to_path_buf()),
            SettingsSource::map([(DB_PASSWORD, "override")]),
        ];
        let settings = load_settings(&sources).unwrap();
        assert_eq!(settings.host(), "filehost");
        assert_eq!(settings.port(), 6543);
        assert_eq!(settings.password(), "override");
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let sources = [
            SettingsSource::EnvFile(PathBuf::from("/nonexistent/clientdb/.env")),
            full_map(),
        ];
        assert!(load_settings(&sources).is_ok());
    }

    #[test]
    fn malformed_env_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DB_HOST='unterminated").unwrap();
        file.flush().unwrap();

        let err = load_settings(&[SettingsSource::EnvFile(file.path().to_path_buf())]).unwrap_err();
        assert!(matches!(err, ConfigurationError::EnvFile { .. }));
    }

    #[test]
    fn debug_redacts_password() {
        let settings = Settings::new("h", 1, "u", "hunter2", "d");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
