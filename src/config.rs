use std::{collections::HashMap, fs, io, path::Path, sync::OnceLock};

use thiserror::Error;

/// Configuration resource bundled alongside the executable.
pub const RESOURCE: &str = "multitenant.properties";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration resource unavailable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("malformed configuration line {line}: expected key=value")]
    Malformed { line: usize },
    #[error("missing or empty configuration key `{0}`")]
    MissingKey(&'static str),
}

/// The five values every redirect is assembled from. Loaded once, never
/// mutated afterwards.
#[derive(Clone, Debug)]
pub struct LoginConfig {
    /// Base URL of the identity provider, without a trailing slash.
    pub authority: String,
    pub client_id: String,
    pub redirect: String,
    pub state: String,
    pub resource: String,
}

impl LoginConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses `key=value` lines; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut pairs = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or(ConfigError::Malformed { line: index + 1 })?;
            pairs.insert(key.trim().to_owned(), value.trim().to_owned());
        }

        Ok(Self {
            authority: required(&pairs, "login.authority")?,
            client_id: required(&pairs, "login.clientId")?,
            redirect: required(&pairs, "login.redirect")?,
            state: required(&pairs, "login.state")?,
            resource: required(&pairs, "login.resource")?,
        })
    }
}

fn required(pairs: &HashMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    match pairs.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::MissingKey(key)),
    }
}

static CONFIG: OnceLock<LoginConfig> = OnceLock::new();

/// Loads the configuration resource into process-wide state. Idempotent:
/// once published, the resource is never re-read. Call before the server
/// starts accepting connections.
pub fn init(path: impl AsRef<Path>) -> Result<&'static LoginConfig, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = LoginConfig::load(path)?;
    println!("authority: {}", config.authority);

    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Azure AD multitenant sample
login.authority=https://login.windows.net/common
login.clientId=36bda7c5-cc23-4618-9e09-e710b2357818

login.redirect=http://example.test:8080/multitenant/token
login.state=random
login.resource=https://graph.windows.net/
";

    #[test]
    fn parses_all_keys() {
        let config = LoginConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.authority, "https://login.windows.net/common");
        assert_eq!(config.client_id, "36bda7c5-cc23-4618-9e09-e710b2357818");
        assert_eq!(config.redirect, "http://example.test:8080/multitenant/token");
        assert_eq!(config.state, "random");
        assert_eq!(config.resource, "https://graph.windows.net/");
    }

    #[test]
    fn preserves_whitespace_inside_values() {
        let text = SAMPLE.replace("login.state=random", "login.state=a b&c");
        let config = LoginConfig::parse(&text).unwrap();
        assert_eq!(config.state, "a b&c");
    }

    #[test]
    fn rejects_missing_key() {
        let text: String = SAMPLE
            .lines()
            .filter(|line| !line.starts_with("login.resource"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(matches!(
            LoginConfig::parse(&text),
            Err(ConfigError::MissingKey("login.resource"))
        ));
    }

    #[test]
    fn rejects_empty_value() {
        let text = SAMPLE.replace("login.state=random", "login.state=");
        assert!(matches!(
            LoginConfig::parse(&text),
            Err(ConfigError::MissingKey("login.state"))
        ));
    }

    #[test]
    fn rejects_line_without_separator() {
        let err = LoginConfig::parse("login.authority").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 1 }));
    }

    #[test]
    fn load_reports_unreadable_resource() {
        assert!(matches!(
            LoginConfig::load("does-not-exist.properties"),
            Err(ConfigError::Unavailable(_))
        ));
    }

    #[test]
    fn init_opens_the_resource_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multitenant.properties");
        fs::write(&path, SAMPLE).unwrap();

        let first = init(&path).unwrap();

        // A second call must not touch the filesystem; deleting the file
        // makes any re-read fail loudly.
        fs::remove_file(&path).unwrap();
        let second = init(&path).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.authority, "https://login.windows.net/common");
    }
}
