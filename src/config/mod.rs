//! Configuration loading and types for undox-liquid.
//!
//! Settings come from three layers, lowest precedence first:
//! - an optional `undox-liquid.yaml` file (`load`)
//! - `UNDOX_LIQUID__*` environment variables, e.g.
//!   `UNDOX_LIQUID__LIQUID__CONDITIONS_IN_CODE=true`
//! - command line flags, applied by the commands themselves

mod load;
mod types;

use std::path::PathBuf;

pub use load::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use types::RootConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(PathBuf),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),
}
