//! Configuration loading: a file first, then environment variables on top.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables `<PREFIX><KEY>`, nested keys joined by `__`
//!    (`APP_DATABASE__PORT` sets `database.port`)
//! 2. The config file (`app.yaml` by default; YAML, TOML or JSON by
//!    extension)
//!
//! The file is required. Every failure comes back as an
//! [`ErrorNode`] with the operation `configer.load`, so callers can keep
//! wrapping it on the way up.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use errtrail_core::{Arg, ErrorNode, Operation, ResultExt, wrap};

use crate::error::ConfigerError;

pub const DEFAULT_CONFIG_FILE: &str = "app.yaml";
pub const DEFAULT_ENV_PREFIX: &str = "APP_";

const OP_LOAD: Operation = Operation::from_static("configer.load");

/// Reads a configuration file and overlays environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configer {
    file: PathBuf,
    env_prefix: String,
    env_vars: Option<config::Map<String, String>>,
}

impl Default for Configer {
    fn default() -> Self {
        Self::new()
    }
}

impl Configer {
    pub fn new() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            env_vars: None,
        }
    }

    /// Read from `file` instead of `app.yaml`.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    /// Match environment variables starting with `prefix`, uppercased.
    pub fn with_env_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.env_prefix = prefix.as_ref().to_uppercase();
        self
    }

    /// Overlay these variables instead of the process environment.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Load `T` from the file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorNode`] with operation `configer.load` wrapping
    /// the `std::io::Error` if the file cannot be read, or a
    /// [`ConfigerError`] if its format is unknown or decoding fails.
    #[instrument(skip(self), fields(file = %self.file.display(), prefix = %self.env_prefix))]
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, ErrorNode> {
        debug!("Loading configuration");

        let contents = std::fs::read_to_string(&self.file).wrap_op(OP_LOAD)?;

        let format = file_format(&self.file).ok_or_else(|| {
            wrap!(
                Arg::cause(ConfigerError::UnsupportedFormat {
                    path: self.file.clone(),
                }),
                OP_LOAD
            )
        })?;

        Config::builder()
            .add_source(File::from_str(&contents, format))
            .add_source(self.environment())
            .build()
            .and_then(|config| config.try_deserialize::<T>())
            .map_err(|source| ConfigerError::Decode {
                path: self.file.clone(),
                source,
            })
            .wrap_op(OP_LOAD)
    }

    fn environment(&self) -> Environment {
        let prefix = self.env_prefix.trim_end_matches('_');
        let env = if prefix.is_empty() {
            Environment::default()
        } else {
            Environment::with_prefix(prefix).prefix_separator("_")
        };

        env.separator("__")
            .try_parsing(true)
            .source(self.env_vars.clone())
    }
}

/// Load `T` with the default file and prefix.
pub fn load<T: DeserializeOwned>() -> Result<T, ErrorNode> {
    Configer::default().load()
}

fn file_format(path: &Path) -> Option<FileFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Some(FileFormat::Yaml),
        "toml" => Some(FileFormat::Toml),
        "json" => Some(FileFormat::Json),
        _ => None,
    }
}
