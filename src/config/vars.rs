//! Variable resolution
//!
//! Builds the frozen variable map handed to every task body. Later sources win:
//! `vars` in the config file, then the dotenv file, then command-line overrides.

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::path::Path;

/// Parse a `KEY=VALUE` command-line override
pub fn parse_override(raw: &str) -> ConfigResult<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

/// Load `KEY=VALUE` pairs from a dotenv file without touching the process environment
pub fn load_dotenv(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::Dotenv {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| ConfigError::Dotenv {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Merge config defaults, the optional dotenv file and overrides
pub fn resolve_vars(
    config: &Config,
    config_dir: &Path,
    overrides: &[(String, String)],
) -> ConfigResult<HashMap<String, String>> {
    let mut vars = config.vars.clone();

    if let Some(dotenv) = &config.dotenv {
        vars.extend(load_dotenv(&config_dir.join(dotenv))?);
    }

    for (key, value) in overrides {
        vars.insert(key.clone(), value.clone());
    }

    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("env=production").unwrap(),
            ("env".to_string(), "production".to_string())
        );
        assert_eq!(
            parse_override("url=http://host/?a=b").unwrap(),
            ("url".to_string(), "http://host/?a=b".to_string())
        );
        assert_eq!(
            parse_override("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_override_rejects_missing_key() {
        assert!(matches!(
            parse_override("novalue"),
            Err(ConfigError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_override("=value"),
            Err(ConfigError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_resolve_vars_precedence() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            "host=deploy.internal\nenv=qa\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.vars.insert("env".to_string(), "staging".to_string());
        config.vars.insert("host".to_string(), "localhost".to_string());
        config.vars.insert("dist".to_string(), "./dist".to_string());
        config.dotenv = Some(".env".to_string());

        let overrides = vec![("env".to_string(), "production".to_string())];
        let vars = resolve_vars(&config, temp_dir.path(), &overrides).unwrap();

        assert_eq!(vars.get("dist"), Some(&"./dist".to_string()));
        assert_eq!(vars.get("host"), Some(&"deploy.internal".to_string()));
        assert_eq!(vars.get("env"), Some(&"production".to_string()));
    }

    #[test]
    fn test_missing_dotenv_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            dotenv: Some("missing.env".to_string()),
            ..Config::default()
        };

        let result = resolve_vars(&config, temp_dir.path(), &[]);
        assert!(matches!(result, Err(ConfigError::Dotenv { .. })));
    }
}
