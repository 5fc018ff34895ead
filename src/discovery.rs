//! Component discovery across the template and override roots.
//!
//! Every `component.php` below `<root>/theme-components/` marks a component.
//! Template-root matches come first, override-root matches second, each
//! sorted by path so repeated scans of the same tree agree. Nothing is cached:
//! each call walks the filesystem and builds fresh records.

use crate::MARKER_FILE;
use crate::header::ComponentHeaders;
use crate::layout::{ThemeLayout, components_dir, same_location};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One discovered component and the metadata from its marker header.
pub struct ComponentRecord {
    /// Absolute path to the marker file.
    pub filepath: PathBuf,
    /// Component directory relative to its root's `theme-components/`.
    pub slug: String,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    pub repository: String,
    pub package: String,
    pub subpackage: String,
}

impl ComponentRecord {
    /// Parse the marker at `filepath`, which lives under `components_root`.
    pub fn from_marker(filepath: &Path, components_root: &Path) -> Result<Self> {
        let headers = ComponentHeaders::from_file(filepath)?;
        let slug = slug_for(filepath, components_root);
        let name = display_name(&headers, &slug);
        Ok(Self {
            filepath: filepath.to_path_buf(),
            slug,
            name,
            author: headers.author,
            version: headers.version,
            description: headers.description,
            repository: headers.repository,
            package: headers.package,
            subpackage: headers.subpackage,
        })
    }
}

/// Discover components for a host layout.
pub fn discover(layout: &ThemeLayout) -> Result<Vec<ComponentRecord>> {
    discover_components(&layout.template_dir, layout.stylesheet_dir())
}

/// Discover components under a template root and an override root.
///
/// When both roots are the same directory only one scan runs, so a theme
/// without an override layer never yields duplicates. An empty list means no
/// components are installed.
pub fn discover_components(
    template_root: &Path,
    override_root: &Path,
) -> Result<Vec<ComponentRecord>> {
    let mut roots = vec![template_root];
    if !same_location(template_root, override_root) {
        roots.push(override_root);
    }

    let mut records = Vec::new();
    for root in roots {
        let components_root = components_dir(root);
        let markers = collect_markers(&components_root)?;
        debug!(
            root = %components_root.display(),
            count = markers.len(),
            "scanned for component markers"
        );
        for marker in markers {
            records.push(ComponentRecord::from_marker(&marker, &components_root)?);
        }
    }
    Ok(records)
}

/// Every marker file below `components_root`, sorted by path.
///
/// A marker sitting directly in `components_root` is not a component; only
/// markers inside a component directory (at any depth) count. Symlinked
/// directories are never entered, so a link pointing back up the tree cannot
/// repeat a component. A missing directory yields an empty list.
pub fn collect_markers(components_root: &Path) -> Result<Vec<PathBuf>> {
    let mut markers = Vec::new();
    if !components_root.is_dir() {
        return Ok(markers);
    }
    for (path, file_type) in read_dir(components_root)? {
        if file_type.is_dir() {
            collect_from_dir(&path, &mut markers)?;
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "skipping symlinked directory");
        }
    }
    markers.sort();
    Ok(markers)
}

fn collect_from_dir(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<()> {
    for (path, file_type) in read_dir(dir)? {
        if file_type.is_dir() {
            collect_from_dir(&path, acc)?;
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "skipping symlinked directory");
        } else if path.file_name().and_then(|n| n.to_str()) == Some(MARKER_FILE) {
            acc.push(path);
        }
    }
    Ok(())
}

/// Entries of `dir` with their own (unfollowed) file types.
fn read_dir(dir: &Path) -> Result<Vec<(PathBuf, FileType)>> {
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", entry.path().display()))?;
        paths.push((entry.path(), file_type));
    }
    Ok(paths)
}

/// Directory of the marker relative to `components_root`, `/`-separated.
pub fn slug_for(filepath: &Path, components_root: &Path) -> String {
    let relative = filepath.strip_prefix(components_root).unwrap_or(filepath);
    let dir = relative.parent().unwrap_or(Path::new(""));
    dir.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Pick a display name: subpackage, then the namespaced tail of the package,
/// then the slug.
pub fn display_name(headers: &ComponentHeaders, slug: &str) -> String {
    if !headers.subpackage.is_empty() {
        return title_case(&headers.subpackage);
    }
    if let Some((_, tail)) = headers.package.split_once('\\') {
        let name = title_case(tail);
        if !name.is_empty() {
            return name;
        }
    }
    slug.to_string()
}

/// `\my-widget` becomes `My Widget`.
pub fn title_case(raw: &str) -> String {
    raw.trim_start_matches('\\')
        .replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
