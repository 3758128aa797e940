//! Shared helpers for reading inputs, loading configuration and writing outputs.

use std::fs;
use std::path::Path;

use rivet_config::{load_config_from_str, load_optional, ConfigError, RivetConfig};
use rivet_ir::Module;
use rivet_parser::parse_module;
use tracing::debug;

use crate::GlobalArgs;

/// Reads a source file, naming the path in the error.
pub fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Parses the first module of `source`, naming `path` when there is none.
pub fn require_module(source: &str, path: &Path) -> Result<Module, Box<dyn std::error::Error>> {
    parse_module(source).ok_or_else(|| format!("no module found in {}", path.display()).into())
}

/// Loads `--config` if given, else `rivet.toml` from the current directory.
/// A missing `rivet.toml` yields the defaults; a missing `--config` file is an error.
pub fn load_project_config(global: &GlobalArgs) -> Result<RivetConfig, ConfigError> {
    match &global.config {
        Some(path) => {
            debug!(path = %path, "loading config");
            let content = fs::read_to_string(path)?;
            load_config_from_str(&content)
        }
        None => load_optional(&std::env::current_dir()?),
    }
}

/// Writes `content` to `path`, or prints it to stdout.
pub fn write_output(path: Option<&Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => fs::write(path, content),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_missing_source_names_path() {
        let err = read_source(Path::new("/nonexistent/top.v")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/top.v"));
    }

    #[test]
    fn require_module_errors_on_garbage() {
        assert!(require_module("module m(); endmodule", Path::new("m.v")).is_ok());
        let err = require_module("wire x;", Path::new("x.v")).unwrap_err();
        assert_eq!(err.to_string(), "no module found in x.v");
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[simulation]\nmax_steps = 7\n").unwrap();
        let global = GlobalArgs {
            config: Some(path.to_string_lossy().into_owned()),
            ..GlobalArgs::for_tests()
        };
        let config = load_project_config(&global).unwrap();
        assert_eq!(config.simulation.max_steps, 7);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let global = GlobalArgs {
            config: Some("/nonexistent/rivet.toml".to_string()),
            ..GlobalArgs::for_tests()
        };
        assert!(matches!(
            load_project_config(&global),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn write_output_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
