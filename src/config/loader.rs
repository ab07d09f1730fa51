//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, SettingError};

/// Environment variables naming the backend base URL, in order of precedence.
pub const BACKEND_URL_VARS: [&str; 2] = ["BACKEND_URL", "NEXT_PUBLIC_API_URL"];

/// Environment variable overriding the listener bind address.
pub const BIND_ADDRESS_VAR: &str = "GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<SettingError>),
}

fn join(errors: &[SettingError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply the process
/// environment on top and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(url) = BACKEND_URL_VARS.iter().find_map(|name| lookup(*name)) {
        config.backend.base_url = url.trim().to_string();
    }

    if let Some(addr) = lookup(BIND_ADDRESS_VAR) {
        config.listener.bind_address = addr.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn primary_backend_variable_wins() {
        let vars = env(&[
            ("BACKEND_URL", "http://primary:5000"),
            ("NEXT_PUBLIC_API_URL", "http://alias:5000"),
        ]);
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |name| vars.get(name).cloned());
        assert_eq!(config.backend.base_url, "http://primary:5000");
    }

    #[test]
    fn alias_used_when_primary_blank() {
        let vars = env(&[("BACKEND_URL", "  "), ("NEXT_PUBLIC_API_URL", "http://alias:5000")]);
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |name| vars.get(name).cloned());
        assert_eq!(config.backend.base_url, "http://alias:5000");
    }

    #[test]
    fn no_variables_keeps_defaults() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |_| None);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validation_message_lists_all_errors() {
        let err = ConfigError::Validation(vec![
            SettingError::Zero("timeouts.request_secs"),
            SettingError::BindAddress("x".into()),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: timeouts.request_secs must be greater than zero, \
             listener.bind_address 'x' is not a socket address"
        );
    }
}
