//! Configuration loading from files and the environment.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConfigError, RootConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "undox-liquid.yaml";

/// Prefix of environment variables that override config values.
pub const ENV_PREFIX: &str = "UNDOX_LIQUID";

impl RootConfig {
    /// Load the config named on the command line, or the default file if
    /// it exists.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let required = config_file.is_some();
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        if required && !tokio::fs::try_exists(&config_file).await.unwrap_or(false) {
            return Err(ConfigError::NotFound(config_file));
        }

        Self::load_with_env(&config_file, environment())
    }

    /// Layer `env` over the YAML file at `path` (if present).
    pub(crate) fn load_with_env(
        path: &Path,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let mut root = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize::<RootConfig>()?;

        root.resolve_paths(&base_dir(path));
        debug!(config = %path.display(), settings = ?root.liquid, "loaded config");
        Ok(root)
    }
}

/// `UNDOX_LIQUID__LIQUID__CYCLES=false` maps to `liquid.cycles`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
