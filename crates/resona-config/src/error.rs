//! Errors raised while loading, saving or checking an engine configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationError;

/// Filesystem step that failed on an engine configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading the TOML file.
    Read,
    /// Writing the TOML file.
    Write,
    /// Creating the file's parent directory.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create the directory of",
        })
    }
}

/// Why an [`EngineConfig`](crate::EngineConfig) could not be loaded, saved or
/// accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file or its directory could not be accessed.
    #[error("cannot {op} engine config '{path}': {source}")]
    Io {
        /// Step that failed.
        op: FileOp,
        /// File (or directory) involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not TOML matching the engine config layout.
    #[error("engine config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("engine config cannot be written as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// One or more settings are out of range.
    #[error("engine config rejected: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    /// Wrap an I/O failure on `path`.
    pub fn io(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// File involved in an I/O failure, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether the config itself is at fault rather than the filesystem.
    pub fn is_content_error(&self) -> bool {
        !matches!(self, ConfigError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::ErrorKind;

    fn missing() -> std::io::Error {
        std::io::Error::new(ErrorKind::NotFound, "no such file")
    }

    #[test]
    fn test_io_error_names_step_and_file() {
        let err = ConfigError::io(FileOp::Read, "/etc/resona/engine.toml", missing());
        assert_eq!(
            err.to_string(),
            "cannot read engine config '/etc/resona/engine.toml': no such file"
        );
        assert_eq!(err.path(), Some(Path::new("/etc/resona/engine.toml")));
        assert!(err.source().is_some());
        assert!(!err.is_content_error());
    }

    #[test]
    fn test_directory_step_wording() {
        let err = ConfigError::io(FileOp::CreateDir, "presets", missing());
        assert!(
            err.to_string().starts_with("cannot create the directory of engine config 'presets'"),
            "got: {err}"
        );
    }

    #[test]
    fn test_bad_toml_is_content_error() {
        let parse = toml::from_str::<crate::EngineConfig>("transform_size = \"big\"").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.is_content_error());
        assert!(err.path().is_none());
        assert!(err.to_string().starts_with("engine config is not valid TOML"), "got: {err}");
    }

    #[test]
    fn test_range_violation_keeps_field() {
        let err: ConfigError = ValidationError::InvalidValue {
            field: "sample_rate".to_string(),
            reason: "must be positive".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "engine config rejected: invalid value for 'sample_rate': must be positive"
        );
    }
}
