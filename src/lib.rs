//! Theme component discovery and registration.
//!
//! A theme ships self-contained components under `theme-components/`, each
//! identified by a `component.php` marker whose leading comment block carries
//! its metadata. This crate finds those markers in the parent (template) theme
//! and the child (override) theme, parses the header fields, hands every
//! component to the host through an explicit entry-point registry, and renders
//! the read-only admin listing. The host drives everything: it runs
//! [`Bootstrap::run`] during theme setup and asks [`ComponentListing`] for
//! markup when the admin page is opened.

pub mod admin;
pub mod bootstrap;
pub mod discovery;
pub mod header;
pub mod layout;
pub mod loader;
pub mod provision;

pub use admin::{
    ComponentListing, EditTarget, ListingEntry, SiteServices, StaticSite, component_asset_url,
};
pub use bootstrap::Bootstrap;
pub use discovery::{ComponentRecord, collect_markers, discover, discover_components};
pub use header::{ComponentHeaders, HEADER_READ_LIMIT, HeaderField};
pub use layout::ThemeLayout;
pub use loader::{ComponentEntry, ComponentRegistry, LoadReport, Loader};
pub use provision::ensure_components_directory;

/// Subdirectory of a theme that holds components.
pub const COMPONENTS_DIR: &str = "theme-components";
/// Marker filename identifying a component directory.
pub const MARKER_FILE: &str = "component.php";
