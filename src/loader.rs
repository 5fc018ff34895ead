//! Loading discovered components into the host.
//!
//! Components do not run on inclusion. Each one contributes an entry point to
//! a [`ComponentRegistry`] keyed by its slug, and the [`Loader`] calls
//! `register` once per slug for the loader's lifetime. When the template and
//! override roots both ship a slug, the override record (discovered later)
//! shadows the template one and is the only one handed to the entry point.
//! The host keeps a single loader for the process, so a second bootstrap pass
//! skips everything that already ran.

use crate::discovery::ComponentRecord;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Entry point a component exposes to the host of type `H`.
pub trait ComponentEntry<H> {
    fn register(&self, host: &mut H, record: &ComponentRecord) -> Result<()>;
}

impl<H, F> ComponentEntry<H> for F
where
    F: Fn(&mut H, &ComponentRecord) -> Result<()>,
{
    fn register(&self, host: &mut H, record: &ComponentRecord) -> Result<()> {
        self(host, record)
    }
}

/// Entry points keyed by component slug.
pub struct ComponentRegistry<H> {
    entries: BTreeMap<String, Box<dyn ComponentEntry<H>>>,
}

impl<H> Default for ComponentRegistry<H> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<H> ComponentRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the entry point for `slug`, replacing any earlier one.
    pub fn register<E>(&mut self, slug: impl Into<String>, entry: E)
    where
        E: ComponentEntry<H> + 'static,
    {
        self.entries.insert(slug.into(), Box::new(entry));
    }

    pub fn get(&self, slug: &str) -> Option<&dyn ComponentEntry<H>> {
        self.entries.get(slug).map(|entry| entry.as_ref())
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
/// Outcome of one `load_all` pass, by marker path.
pub struct LoadReport {
    pub loaded: Vec<PathBuf>,
    pub already_loaded: Vec<PathBuf>,
    pub unregistered: Vec<PathBuf>,
    /// Template records whose slug is also provided by the override root.
    pub shadowed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

#[derive(Debug, Default)]
/// Tracks which slugs have already had their entry point invoked.
pub struct Loader {
    attempted: BTreeSet<String>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, record: &ComponentRecord) -> bool {
        self.attempted.contains(&record.slug)
    }

    /// Invoke each slug's entry point once.
    ///
    /// A record whose slug reappears later in `records` is shadowed and
    /// skipped. A slug is marked before its entry point runs, so a failed
    /// registration is reported but never retried. Failures do not stop the
    /// remaining components from loading.
    pub fn load_all<H>(
        &mut self,
        records: &[ComponentRecord],
        registry: &ComponentRegistry<H>,
        host: &mut H,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for (idx, record) in records.iter().enumerate() {
            if records[idx + 1..].iter().any(|later| later.slug == record.slug) {
                debug!(
                    component = %record.slug,
                    path = %record.filepath.display(),
                    "component shadowed by override"
                );
                report.shadowed.push(record.filepath.clone());
                continue;
            }
            if self.is_loaded(record) {
                debug!(component = %record.slug, "component already loaded");
                report.already_loaded.push(record.filepath.clone());
                continue;
            }
            let Some(entry) = registry.get(&record.slug) else {
                warn!(
                    component = %record.slug,
                    path = %record.filepath.display(),
                    "no entry point registered for component"
                );
                report.unregistered.push(record.filepath.clone());
                continue;
            };

            self.attempted.insert(record.slug.clone());
            match entry.register(host, record) {
                Ok(()) => {
                    info!(component = %record.slug, name = %record.name, "loaded component");
                    report.loaded.push(record.filepath.clone());
                }
                Err(err) => {
                    error!(component = %record.slug, "component registration failed: {err:#}");
                    report
                        .failed
                        .push((record.filepath.clone(), format!("{err:#}")));
                }
            }
        }
        report
    }
}
