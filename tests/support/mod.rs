use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use theme_components::ThemeLayout;
use theme_components::layout::marker_path;

/// A throwaway site with a `themes/` root holding a parent and a child theme.
pub struct SiteFixture {
    pub dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("themes").join("base"))?;
        fs::create_dir_all(dir.path().join("themes").join("child"))?;
        Ok(Self { dir })
    }

    pub fn site_root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn theme(&self, name: &str) -> PathBuf {
        self.dir.path().join("themes").join(name)
    }

    /// Layout with `base` as template and `child` as override.
    pub fn layout(&self) -> ThemeLayout {
        self.layout_for("child")
    }

    pub fn layout_for(&self, stylesheet: &str) -> ThemeLayout {
        ThemeLayout {
            theme_root: self.dir.path().join("themes"),
            template_dir: self.theme("base"),
            stylesheet_dir: Some(self.theme(stylesheet)),
            site_root: self.site_root(),
            site_url: "https://example.com".to_string(),
            admin_url: "https://example.com/admin".to_string(),
        }
    }

    /// Write `theme-components/<slug>/component.php` with the given header lines.
    pub fn component(&self, theme: &str, slug: &str, header_lines: &[&str]) -> Result<PathBuf> {
        write_component(&self.theme(theme), slug, header_lines)
    }
}

pub fn write_component(root: &Path, slug: &str, header_lines: &[&str]) -> Result<PathBuf> {
    let path = marker_path(root, slug);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut body = String::from("<?php\n/**\n");
    for line in header_lines {
        body.push_str(" * ");
        body.push_str(line);
        body.push('\n');
    }
    body.push_str(" */\n\nadd_action( 'init', 'noop' );\n");
    fs::write(&path, body)?;
    Ok(path)
}
