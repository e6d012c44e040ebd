//! Locating and reading the decoder configuration.
//!
//! The `--config` path wins when given. Without it the CLI falls back to a
//! project-local file, then to the platform config directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use flatname::{FlatnameError, config::AppConfig};

/// Errors raised while locating or reading the CLI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for FlatnameError {
    fn from(err: ConfigError) -> Self {
        FlatnameError::Config(err.to_string())
    }
}

/// Where a configuration file was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    /// `flatname/config.toml` below the working directory.
    Local,
    /// The platform config directory, e.g. `~/.config/flatname`.
    System,
}

impl ConfigSource {
    fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Local => "local",
            ConfigSource::System => "system",
        }
    }
}

/// Implicit configuration locations, highest priority first.
fn implicit_locations() -> Vec<(ConfigSource, PathBuf)> {
    let mut locations = vec![(ConfigSource::Local, PathBuf::from("flatname/config.toml"))];

    match ProjectDirs::from("com", "flatname", "flatname") {
        Some(dirs) => locations.push((ConfigSource::System, dirs.config_dir().join("config.toml"))),
        None => debug!("Could not determine platform-specific config directory"),
    }

    locations
}

/// Find and load the decoder configuration.
///
/// An explicit path must exist. Otherwise the first existing file among
/// `flatname/config.toml` and the platform config directory is used, and
/// the defaults apply when neither exists.
///
/// # Errors
///
/// Returns [`FlatnameError::Config`] when the explicit path is missing or a
/// file that was found is not valid TOML for [`AppConfig`], and
/// [`FlatnameError::Io`] when a found file cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, FlatnameError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    for (source, path) in implicit_locations() {
        if path.exists() {
            info!(source = source.as_str(), path = path.display().to_string(); "Loading configuration");
            return load_config_file(&path);
        }
        debug!(source = source.as_str(), path = path.display().to_string(); "Configuration file not found");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Read and parse one TOML configuration file.
fn load_config_file(path: &Path) -> Result<AppConfig, FlatnameError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flatname::config::AttachPolicy;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_explicit_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nattach_policy = \"strict\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.registry().attach_policy(), AttachPolicy::Strict);
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();

        assert!(matches!(err, FlatnameError::Config(ref msg) if msg.contains("Missing")));
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nattach_policy = 3").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        let path = file.path().display().to_string();
        assert!(matches!(
            err,
            FlatnameError::Config(ref msg) if msg.contains("TOML") && msg.contains(&path)
        ));
    }

    #[test]
    fn test_local_location_comes_first() {
        let locations = implicit_locations();

        assert_eq!(
            locations.first(),
            Some(&(ConfigSource::Local, PathBuf::from("flatname/config.toml")))
        );
        assert!(
            locations
                .iter()
                .skip(1)
                .all(|(source, _)| *source == ConfigSource::System)
        );
    }
}
