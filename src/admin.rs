//! Read-only admin listing of discovered components.
//!
//! The listing is a single HTML table: one row per component with its name,
//! action links (edit, repository), description, and meta text (version,
//! author). Authorization and URL resolution belong to the host and reach the
//! renderer through [`SiteServices`].

use crate::MARKER_FILE;
use crate::discovery::{ComponentRecord, discover};
use crate::layout::{ThemeLayout, join_url};
use std::path::{Component, Path};
use tracing::warn;

const SEPARATOR: &str = " | ";
const PAGE_TITLE: &str = "Components";

/// Host collaborators the listing depends on.
pub trait SiteServices {
    /// Whether the current user may open components in the file editor.
    fn can_edit_files(&self) -> bool;
    /// Public base URL of the site.
    fn site_url(&self) -> String;
    /// URL of the admin file editor, without query arguments.
    fn editor_url(&self) -> String;
}

/// `SiteServices` backed by a fixed layout and a fixed edit permission.
#[derive(Clone, Debug)]
pub struct StaticSite<'a> {
    pub layout: &'a ThemeLayout,
    pub can_edit: bool,
}

impl SiteServices for StaticSite<'_> {
    fn can_edit_files(&self) -> bool {
        self.can_edit
    }

    fn site_url(&self) -> String {
        self.layout.site_url.clone()
    }

    fn editor_url(&self) -> String {
        self.layout.editor_url()
    }
}

/// One action or meta item; rendered as a link when it has a URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingEntry {
    pub label: String,
    pub url: Option<String>,
    pub new_tab: bool,
}

impl ListingEntry {
    fn text(label: String) -> Self {
        Self {
            label,
            url: None,
            new_tab: false,
        }
    }

    fn link(label: &str, url: String, new_tab: bool) -> Self {
        Self {
            label: label.to_string(),
            url: Some(url),
            new_tab,
        }
    }

    fn render(&self) -> String {
        match &self.url {
            Some(url) => format!(
                "<a href=\"{}\"{}>{}</a>",
                escape_attribute(url),
                if self.new_tab { " target=\"_blank\"" } else { "" },
                escape_html(&self.label)
            ),
            None => escape_html(&self.label),
        }
    }
}

/// File-editor coordinates of a marker: its path inside the owning theme and
/// that theme's directory name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EditTarget {
    pub file: String,
    pub theme: String,
}

impl EditTarget {
    /// Split `filepath` into `<theme>/<file>` below the theme root.
    ///
    /// Markers outside the theme root fall back to the template directory:
    /// the file is the path with the template prefix removed and the theme is
    /// the template directory's name.
    pub fn for_file(layout: &ThemeLayout, filepath: &Path) -> Self {
        if let Ok(relative) = filepath.strip_prefix(&layout.theme_root) {
            let mut parts = normal_parts(relative);
            if parts.len() > 1 {
                let theme = parts.remove(0);
                return Self {
                    file: parts.join("/"),
                    theme,
                };
            }
        }
        let file = match filepath.strip_prefix(&layout.template_dir) {
            Ok(relative) => normal_parts(relative).join("/"),
            Err(_) => filepath.to_string_lossy().into_owned(),
        };
        let theme = layout
            .template_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file, theme }
    }

    /// Append `file` and `theme` query arguments to the editor URL.
    pub fn url(&self, editor_url: &str) -> String {
        let joiner = if editor_url.contains('?') { '&' } else { '?' };
        format!(
            "{editor_url}{joiner}file={}&theme={}",
            urlencoding::encode(&self.file),
            urlencoding::encode(&self.theme)
        )
    }
}

/// Renders the component table for one host.
pub struct ComponentListing<'a, S: SiteServices> {
    layout: &'a ThemeLayout,
    site: &'a S,
}

impl<'a, S: SiteServices> ComponentListing<'a, S> {
    pub fn new(layout: &'a ThemeLayout, site: &'a S) -> Self {
        Self { layout, site }
    }

    /// Edit and repository links a record qualifies for.
    pub fn actions(&self, record: &ComponentRecord) -> Vec<ListingEntry> {
        let mut actions = Vec::new();
        if self.site.can_edit_files() {
            let target = EditTarget::for_file(self.layout, &record.filepath);
            actions.push(ListingEntry::link(
                "Edit",
                target.url(&self.site.editor_url()),
                false,
            ));
        }
        if !record.repository.is_empty() {
            actions.push(ListingEntry::link(
                "Repository",
                record.repository.clone(),
                true,
            ));
        }
        actions
    }

    /// Version and author text a record carries.
    pub fn meta(&self, record: &ComponentRecord) -> Vec<ListingEntry> {
        let mut meta = Vec::new();
        if !record.version.is_empty() {
            meta.push(ListingEntry::text(format!("Version {}", record.version)));
        }
        if !record.author.is_empty() {
            meta.push(ListingEntry::text(format!("by {}", record.author)));
        }
        meta
    }

    pub fn render_row(&self, record: &ComponentRecord) -> String {
        let mut title = format!("<strong>{}</strong>", escape_html(&record.name));
        title.push_str(&paragraph(&self.actions(record)));

        let mut details = String::new();
        if !record.description.is_empty() {
            details.push_str(&format!("<p>{}</p>", escape_html(&record.description)));
        }
        details.push_str(&paragraph(&self.meta(record)));

        format!(
            "<tr>\n<td class=\"component-title column-primary\">{title}</td>\n<td class=\"column-description desc\">{details}</td>\n</tr>\n"
        )
    }

    /// Full admin page markup for `records`.
    pub fn render(&self, records: &[ComponentRecord]) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"wrap\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(PAGE_TITLE)));
        html.push_str("<table class=\"wp-list-table widefat components\">\n");
        html.push_str("<thead>\n");
        html.push_str(&header_row(true));
        html.push_str("</thead>\n<tbody id=\"the-list\">\n");
        for record in records {
            html.push_str(&self.render_row(record));
        }
        html.push_str("</tbody>\n<tfoot>\n");
        html.push_str(&header_row(false));
        html.push_str("</tfoot>\n</table>\n</div>\n");
        html
    }

    /// Discover and render. A discovery failure is logged and the page shows
    /// an empty table.
    pub fn render_page(&self) -> String {
        let records = discover(self.layout).unwrap_or_else(|err| {
            warn!("component discovery failed, rendering empty listing: {err:#}");
            Vec::new()
        });
        self.render(&records)
    }

    pub fn asset_url(&self, filepath: &Path) -> String {
        component_asset_url(&self.layout.site_root, &self.site.site_url(), filepath)
    }
}

/// Public URL of a component's directory.
///
/// Strips `site_root`, any leading slash, and the trailing `component.php`
/// filename, then appends the rest to `site_url`. Only the exact filename is
/// removed; other trailing characters are kept.
pub fn component_asset_url(site_root: &Path, site_url: &str, filepath: &Path) -> String {
    let relative = match filepath.strip_prefix(site_root) {
        Ok(rel) => normal_parts(rel).join("/"),
        Err(_) => filepath.to_string_lossy().replace('\\', "/"),
    };
    let relative = relative.trim_start_matches('/');
    let relative = relative.strip_suffix(MARKER_FILE).unwrap_or(relative);
    join_url(site_url, relative)
}

fn header_row(with_ids: bool) -> String {
    let (name_id, desc_id) = if with_ids {
        (" id=\"name\"", " id=\"description\"")
    } else {
        ("", "")
    };
    format!(
        "<tr>\n<th scope=\"col\"{name_id} class=\"manage-column column-name column-primary\">Component</th>\n<th scope=\"col\"{desc_id} class=\"manage-column column-description\">Details</th>\n</tr>\n"
    )
}

fn paragraph(entries: &[ListingEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let inner = entries
        .iter()
        .map(ListingEntry::render)
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    format!("<p>{inner}</p>")
}

fn normal_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Escape text content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape an attribute value; control whitespace becomes numeric references.
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push_str(&escape_html(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out
}
