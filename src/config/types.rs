//! Configuration type definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::liquid::Settings;

/// The contents of an `undox-liquid.yaml` file.
///
/// ```yaml
/// liquid:
///   conditions_in_code: true
/// vars:
///   - vars/site.yaml
///   - vars/users.json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Interpreter switches.
    pub liquid: Settings,

    /// Variable files loaded for every document, merged in order.
    ///
    /// Relative paths are resolved against the config file's directory.
    pub vars: Vec<PathBuf>,
}

impl RootConfig {
    /// Make relative `vars` paths relative to `base` instead.
    pub(super) fn resolve_paths(&mut self, base: &Path) {
        for path in &mut self.vars {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
