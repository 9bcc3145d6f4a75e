use crate::paths;
use crate::platform::DisplayFlags;
use log::{trace, warn};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine default config directory")]
    NoConfigDir,
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Name passed to the native entry point when the worker thread starts
    pub entry_name: String,
    /// OS-level name of the worker thread
    pub worker_thread_name: String,
    /// Stack size of the worker thread in bytes. Uses the platform default when unset
    pub worker_stack_size: Option<usize>,
    /// System UI flags applied to the window every time the activity is created
    pub display: DisplayFlags,
    /// Whether to log surface callbacks the OS delivers out of the expected order
    pub warn_on_out_of_order_events: bool,
}

static CURRENT_CONFIG: Lazy<Arc<RwLock<Config>>> =
    Lazy::new(|| Arc::new(RwLock::new(Config::default())));

impl Config {
    pub fn default_config_path() -> Option<PathBuf> {
        paths::default_config_path()
    }

    pub fn load(config_path: Option<&Path>, save: bool) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if !path.exists() {
            Self::create_default_config_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        config.config_path = Some(path.clone());

        // Save the config back to ensure all fields are present
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    fn create_default_config_file(path: &Path) -> Result<(), ConfigError> {
        Config::default().save_to_file(path)
    }

    /// Checks values that would otherwise only fail once the worker thread is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_name.is_empty() {
            return Err(ConfigError::Invalid("entry_name must not be empty".into()));
        }
        if self.worker_thread_name.contains('\0') {
            return Err(ConfigError::Invalid(
                "worker_thread_name must not contain NUL bytes".into(),
            ));
        }
        if self.worker_stack_size == Some(0) {
            return Err(ConfigError::Invalid(
                "worker_stack_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn set_config(config: Config) {
        *Self::write_current() = config;
    }

    pub fn current() -> RwLockReadGuard<'static, Config> {
        CURRENT_CONFIG
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current config. Use this instead of [`Config::current`] when the caller runs
    /// code that may update the config while it still needs the values.
    pub fn snapshot() -> Config {
        Self::current().clone()
    }

    pub fn update<F>(f: F)
    where
        F: FnOnce(&mut Config),
    {
        f(&mut Self::write_current());
    }

    pub fn reset() {
        *Self::write_current() = Config::default();
    }

    fn write_current() -> RwLockWriteGuard<'static, Config> {
        CURRENT_CONFIG
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Save the config to a file, with field documentation as comments
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        super::serialize_config(self, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            entry_name: "surfacelink".to_string(),
            worker_thread_name: "surfacelink-main".to_string(),
            worker_stack_size: None,
            display: DisplayFlags::default(),
            warn_on_out_of_order_events: true,
        }
    }
}
