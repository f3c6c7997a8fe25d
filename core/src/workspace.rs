//! Workspace-folder resolution and per-folder derived config caches.
//!
//! A document URI resolves to the longest-matching configured workspace
//! folder (most specific wins), falling back to the root folder when no
//! folders were declared. Two independent memoized maps hang off the
//! resolved folder: style-checker options and the type checker's config
//! path. Invalidation is coarse -- a relevant settings update clears the
//! whole map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Well-known pycodestyle project config files, probed in order.
const STYLE_CONFIG_FILES: &[&str] = &["setup.cfg", "tox.ini"];

/// Well-known mypy config files, probed in order. Relative names resolve
/// against the workspace folder, absolute ones against the user's home.
const TYPE_CHECKER_CONFIG_FILES: &[&str] = &["mypy.ini", ".mypy.ini", "pyproject.toml", "setup.cfg"];
const TYPE_CHECKER_USER_CONFIG_FILES: &[&str] = &[".config/mypy/config", ".mypy.ini"];

/// A configured workspace folder: its URI prefix and filesystem path.
#[derive(Debug, Clone)]
pub struct Folder {
    pub uri: String,
    pub path: PathBuf,
}

/// The declared workspace folders plus the single-root fallback.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFolders {
    folders: Vec<Folder>,
    root: Option<PathBuf>,
}

impl WorkspaceFolders {
    #[must_use]
    pub fn new(folders: Vec<Folder>, root: Option<PathBuf>) -> Self {
        Self { folders, root }
    }

    /// The folder a document belongs to: the longest configured folder URI
    /// that prefixes the document URI, else the root folder.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<&Path> {
        self.folders
            .iter()
            .filter(|f| uri.starts_with(&f.uri))
            .max_by_key(|f| f.uri.len())
            .map(|f| f.path.as_path())
            .or(self.root.as_deref())
    }
}

/// Style-checker inputs derived for one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    /// Explicit config from settings, else the first project config file
    /// found in the folder, else nothing (checker defaults apply).
    pub config_path: Option<PathBuf>,
    /// Paths handed to the checker for its own per-project discovery.
    pub search_paths: Vec<PathBuf>,
}

/// Memoized per-folder derived configuration.
///
/// Entries stay valid exactly as long as the global settings they were
/// derived from; [`Self::invalidate_style_options`] /
/// [`Self::invalidate_type_checker_configs`] must run on every update of
/// `pycodestyle_config` / `mypy_enabled` respectively.
#[derive(Debug, Default)]
pub struct FolderConfigCache {
    style_options: HashMap<PathBuf, StyleOptions>,
    type_checker_configs: HashMap<PathBuf, Option<PathBuf>>,
}

impl FolderConfigCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Style options for `folder`, computed once and memoized.
    pub fn style_options(&mut self, folder: &Path, global_config: Option<&Path>) -> StyleOptions {
        if let Some(opts) = self.style_options.get(folder) {
            return opts.clone();
        }
        let config_path = global_config.map(Path::to_path_buf).or_else(|| {
            STYLE_CONFIG_FILES
                .iter()
                .map(|name| folder.join(name))
                .find(|p| p.is_file())
        });
        let opts = StyleOptions {
            config_path,
            search_paths: vec![folder.to_path_buf()],
        };
        tracing::debug!(folder = %folder.display(), config = ?opts.config_path, "resolved style options");
        self.style_options.insert(folder.to_path_buf(), opts.clone());
        opts
    }

    /// The type checker's config file for `folder`: first existing
    /// well-known name, project-level before user-level. `None` (no config
    /// anywhere) is a valid, cached answer, not a failure.
    pub fn type_checker_config(&mut self, folder: &Path) -> Option<PathBuf> {
        if let Some(cached) = self.type_checker_configs.get(folder) {
            return cached.clone();
        }
        let project = TYPE_CHECKER_CONFIG_FILES
            .iter()
            .map(|name| folder.join(name))
            .find(|p| p.is_file());
        let found = project.or_else(|| {
            let home = dirs::home_dir()?;
            TYPE_CHECKER_USER_CONFIG_FILES
                .iter()
                .map(|name| home.join(name))
                .find(|p| p.is_file())
        });
        tracing::debug!(folder = %folder.display(), config = ?found, "resolved type checker config");
        self.type_checker_configs
            .insert(folder.to_path_buf(), found.clone());
        found
    }

    /// Clear every memoized style entry. Called when `pycodestyle_config`
    /// changes; the next validation pass recomputes all folders.
    pub fn invalidate_style_options(&mut self) {
        self.style_options.clear();
    }

    /// Clear every memoized type-checker config entry.
    pub fn invalidate_type_checker_configs(&mut self) {
        self.type_checker_configs.clear();
    }

    #[must_use]
    pub fn cached_style_folders(&self) -> usize {
        self.style_options.len()
    }
}
