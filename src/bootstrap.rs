//! Theme-setup sequence: provision, discover, load.
//!
//! The host calls [`Bootstrap::run`] from its own initialization path before
//! anything that depends on component registrations. Provisioning problems
//! are logged and do not stop loading.

use crate::discovery::discover;
use crate::layout::ThemeLayout;
use crate::loader::{ComponentRegistry, LoadReport, Loader};
use crate::provision::ensure_components_directory;
use anyhow::Result;
use tracing::{error, info};

/// Owns the process-wide loader so repeated runs stay idempotent.
#[derive(Debug, Default)]
pub struct Bootstrap {
    loader: Loader,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the override directory, then load every discovered component.
    ///
    /// Discovery errors (an unreadable marker) are returned; a directory that
    /// cannot be created is only logged.
    pub fn run<H>(
        &mut self,
        layout: &ThemeLayout,
        registry: &ComponentRegistry<H>,
        host: &mut H,
    ) -> Result<LoadReport> {
        if let Err(err) = ensure_components_directory(layout.stylesheet_dir()) {
            error!("unable to provision components directory: {err:#}");
        }

        let records = discover(layout)?;
        let report = self.loader.load_all(&records, registry, host);
        info!(
            discovered = records.len(),
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "component bootstrap finished"
        );
        Ok(report)
    }
}
