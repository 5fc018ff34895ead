//! Host environment description: where themes live and how URLs resolve.
//!
//! A `ThemeLayout` can be deserialized from a JSON file or assembled from
//! `THEME_COMPONENTS_*` environment variables. The stylesheet (override)
//! directory defaults to the template directory, which is the "no child
//! theme" case.

use crate::{COMPONENTS_DIR, MARKER_FILE};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_THEME_ROOT: &str = "THEME_COMPONENTS_THEME_ROOT";
pub const ENV_TEMPLATE: &str = "THEME_COMPONENTS_TEMPLATE";
pub const ENV_STYLESHEET: &str = "THEME_COMPONENTS_STYLESHEET";
pub const ENV_SITE_ROOT: &str = "THEME_COMPONENTS_SITE_ROOT";
pub const ENV_SITE_URL: &str = "THEME_COMPONENTS_SITE_URL";
pub const ENV_ADMIN_URL: &str = "THEME_COMPONENTS_ADMIN_URL";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Filesystem and URL anchors supplied by the host application.
pub struct ThemeLayout {
    /// Directory holding every installed theme.
    pub theme_root: PathBuf,
    /// Parent theme directory (the template root).
    pub template_dir: PathBuf,
    /// Child theme directory (the override root); defaults to `template_dir`.
    #[serde(default)]
    pub stylesheet_dir: Option<PathBuf>,
    /// Filesystem root of the site; stripped when building asset URLs.
    pub site_root: PathBuf,
    /// Public base URL of the site.
    pub site_url: String,
    /// Base URL of the admin area.
    pub admin_url: String,
}

impl ThemeLayout {
    /// Load a layout from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading theme layout {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing theme layout {}", path.display()))
    }

    /// Build a layout from `THEME_COMPONENTS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a layout from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{key} is not set"));

        Ok(Self {
            theme_root: PathBuf::from(require(ENV_THEME_ROOT)?),
            template_dir: PathBuf::from(require(ENV_TEMPLATE)?),
            stylesheet_dir: get(ENV_STYLESHEET).map(PathBuf::from),
            site_root: PathBuf::from(require(ENV_SITE_ROOT)?),
            site_url: require(ENV_SITE_URL)?,
            admin_url: require(ENV_ADMIN_URL)?,
        })
    }

    pub fn stylesheet_dir(&self) -> &Path {
        self.stylesheet_dir.as_deref().unwrap_or(&self.template_dir)
    }

    /// True when the stylesheet directory is a separate override layer.
    pub fn overrides_template(&self) -> bool {
        !same_location(&self.template_dir, self.stylesheet_dir())
    }

    /// Path of the file editor page, relative to `admin_url`.
    pub fn editor_url(&self) -> String {
        join_url(&self.admin_url, "theme-editor.php")
    }
}

/// `<root>/theme-components`.
pub fn components_dir(root: &Path) -> PathBuf {
    root.join(COMPONENTS_DIR)
}

/// `<root>/theme-components/<slug>/component.php`.
pub fn marker_path(root: &Path, slug: &str) -> PathBuf {
    let mut path = components_dir(root);
    for segment in slug.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.join(MARKER_FILE)
}

/// Canonicalize when possible, otherwise keep the path as given.
pub fn canonicalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether two roots refer to the same directory.
pub fn same_location(a: &Path, b: &Path) -> bool {
    a == b || canonicalize_path(a) == canonicalize_path(b)
}

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
