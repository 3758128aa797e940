//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::RivetConfig;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "rivet.toml";

/// Loads and validates `rivet.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<RivetConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_optional(project_dir: &Path) -> Result<RivetConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(RivetConfig::default());
    }
    load_config(project_dir)
}

/// Parses and validates a `rivet.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<RivetConfig, ConfigError> {
    let config: RivetConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &RivetConfig) -> Result<(), ConfigError> {
    for clock in &config.simulation.clocks {
        if clock.signal.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "simulation.clocks entry has an empty signal name".to_string(),
            ));
        }
        if clock.half_period == 0 {
            return Err(ConfigError::ValidationError(format!(
                "clock '{}' has a zero half_period",
                clock.signal
            )));
        }
    }
    if let Some(drive) = config
        .simulation
        .drives
        .iter()
        .find(|d| d.signal.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "simulation.drives entry at time {} names no signal",
            drive.time
        )));
    }
    Ok(())
}
