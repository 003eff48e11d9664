//! Configuration file discovery and parsing

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, RunseqError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names looked up in each directory, in order of preference
const CONFIG_FILE_NAMES: &[&str] = &["runseq.yml", "runseq.yaml"];

/// Locate the configuration file, starting from the current directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let cwd = env::current_dir()
        .map_err(|e| ConfigError::Invalid(format!("cannot read current directory: {}", e)))?;
    find_config_file_from(cwd)
}

/// Locate the configuration file in `start_dir` or the nearest ancestor holding one
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut searched = Vec::new();

    for dir in start_dir.ancestors() {
        let candidates = CONFIG_FILE_NAMES.iter().map(|name| dir.join(name));
        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found configuration");
                return Ok(candidate);
            }
            searched.push(candidate.display().to_string());
        }
    }

    Err(ConfigError::NotFound(searched.join(", ")))
}

/// Read and parse a configuration file
pub fn parse_config_file(path: &Path) -> Result<Config, RunseqError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("cannot read {}: {}", path.display(), e)))?;

    parse_config(&contents)
}

/// Parse configuration from YAML text
pub fn parse_config(yaml: &str) -> Result<Config, RunseqError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Discover the configuration file and parse it
pub fn parse_config_auto() -> Result<(Config, PathBuf), RunseqError> {
    let path = find_config_file()?;
    let config = parse_config_file(&path)?;
    Ok((config, path))
}
