//! Render settings.

use serde::{Deserialize, Serialize};

/// Switches controlling which tags are recognized.
///
/// Every field has a default, so an empty `liquid:` section in a config
/// file (or `Settings::default()`) gives the standard behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Evaluate tags inside fenced code blocks instead of emitting them verbatim.
    #[serde(alias = "conditionsInCode")]
    pub conditions_in_code: bool,

    /// Recognize `{% for %}` / `{% endfor %}`.
    pub cycles: bool,

    /// Recognize `{% if %}` / `{% else %}` / `{% endif %}`.
    pub conditions: bool,

    /// Recognize `{{ ... }}` interpolations.
    pub substitutions: bool,

    /// Keep the `not_var` prefix when emitting an escaped interpolation.
    #[serde(alias = "keepNotVar")]
    pub keep_not_var: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conditions_in_code: false,
            cycles: true,
            conditions: true,
            substitutions: true,
            keep_not_var: false,
        }
    }
}
