//! Flat server settings and their update protocol.
//!
//! Settings arrive as the `adderls` section of a
//! `workspace/didChangeConfiguration` payload. [`Settings::merge`] applies
//! the recognized keys and reports which derived caches the update
//! invalidates, so the session can evict them before the next use.

/// The recognized option set, with the defaults of the protocol contract.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Pyflakes finding categories escalated to error severity.
    pub pyflakes_errors: Vec<String>,
    /// Explicit pycodestyle config path; `None` means per-folder discovery.
    pub pycodestyle_config: Option<String>,
    /// Hover shows engine help output when true, inferred types when false.
    pub help_on_hover: bool,
    /// Gates the out-of-process type checker in the validation pass.
    pub mypy_enabled: bool,
    /// Lists snippet expansions before their plain counterpart.
    pub completion_snippet_first: bool,
    /// Fuzzy instead of prefix candidate matching.
    pub completion_fuzzy: bool,
    pub diagnostic_on_open: bool,
    pub diagnostic_on_save: bool,
    pub diagnostic_on_change: bool,
    /// Style name or config path passed to the autoformatter.
    pub yapf_style_config: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pyflakes_errors: vec!["UndefinedName".to_string()],
            pycodestyle_config: None,
            help_on_hover: true,
            mypy_enabled: false,
            completion_snippet_first: false,
            completion_fuzzy: false,
            diagnostic_on_open: true,
            diagnostic_on_save: true,
            diagnostic_on_change: false,
            yapf_style_config: "pep8".to_string(),
        }
    }
}

/// What a settings update invalidated.
///
/// Presentation-only keys (`help_on_hover`, `completion_snippet_first`)
/// never set `revalidate`; they take effect on the next request without a
/// fresh diagnostics pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsDelta {
    /// `pycodestyle_config` was updated; the style-options cache must be cleared.
    pub style_options_invalidated: bool,
    /// `mypy_enabled` was updated; the type-checker-config cache must be cleared.
    pub type_checker_configs_invalidated: bool,
    /// At least one diagnostics-affecting key was updated.
    pub revalidate: bool,
}

impl Settings {
    /// Apply the recognized keys of a configuration payload.
    ///
    /// Unknown keys and type-mismatched values are ignored. A key counts as
    /// updated whenever it is present, even if the value is unchanged --
    /// coarse, but it keeps invalidation decisions independent of value
    /// comparison semantics.
    pub fn merge(&mut self, payload: &serde_json::Value) -> SettingsDelta {
        let mut delta = SettingsDelta::default();
        let Some(map) = payload.as_object() else {
            return delta;
        };

        if let Some(v) = map.get("pyflakes_errors").and_then(|v| v.as_array()) {
            self.pyflakes_errors = v
                .iter()
                .filter_map(|e| e.as_str().map(String::from))
                .collect();
            delta.revalidate = true;
        }
        if let Some(v) = map.get("pycodestyle_config") {
            self.pycodestyle_config = v.as_str().map(String::from);
            delta.style_options_invalidated = true;
            delta.revalidate = true;
        }
        if let Some(v) = map.get("help_on_hover").and_then(|v| v.as_bool()) {
            self.help_on_hover = v;
        }
        if let Some(v) = map.get("mypy_enabled").and_then(|v| v.as_bool()) {
            self.mypy_enabled = v;
            delta.type_checker_configs_invalidated = true;
            delta.revalidate = true;
        }
        if let Some(v) = map
            .get("completion_snippet_first")
            .and_then(|v| v.as_bool())
        {
            self.completion_snippet_first = v;
        }
        if let Some(v) = map.get("completion_fuzzy").and_then(|v| v.as_bool()) {
            self.completion_fuzzy = v;
            delta.revalidate = true;
        }
        if let Some(v) = map.get("diagnostic_on_open").and_then(|v| v.as_bool()) {
            self.diagnostic_on_open = v;
            delta.revalidate = true;
        }
        if let Some(v) = map.get("diagnostic_on_save").and_then(|v| v.as_bool()) {
            self.diagnostic_on_save = v;
            delta.revalidate = true;
        }
        if let Some(v) = map.get("diagnostic_on_change").and_then(|v| v.as_bool()) {
            self.diagnostic_on_change = v;
            delta.revalidate = true;
        }
        if let Some(v) = map.get("yapf_style_config").and_then(|v| v.as_str()) {
            self.yapf_style_config = v.to_string();
            delta.revalidate = true;
        }

        delta
    }
}
