//! Header metadata scraped from a component's marker file.
//!
//! Components describe themselves in the leading comment block of
//! `component.php` (`@version`, `@author`, a bare `* description` line, ...).
//! Only the first [`HEADER_READ_LIMIT`] bytes are inspected, and a field that
//! cannot be found is reported as an empty string rather than an error.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

/// Upper bound on how much of a marker file is read when scraping headers.
pub const HEADER_READ_LIMIT: u64 = 8 * 1024;

/// Header fields recognized in a marker file, in match order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderField {
    Author,
    Version,
    Package,
    Subpackage,
    Repository,
    Description,
}

impl HeaderField {
    pub const ALL: [HeaderField; 6] = [
        HeaderField::Author,
        HeaderField::Version,
        HeaderField::Package,
        HeaderField::Subpackage,
        HeaderField::Repository,
        HeaderField::Description,
    ];

    /// Label token that introduces the field on a header line.
    pub fn label(self) -> &'static str {
        match self {
            HeaderField::Author => "@author",
            HeaderField::Version => "@version",
            HeaderField::Package => "@package",
            HeaderField::Subpackage => "@subpackage",
            HeaderField::Repository => "@link",
            HeaderField::Description => "*",
        }
    }
}

static FIELD_PATTERNS: LazyLock<Vec<(HeaderField, Regex)>> = LazyLock::new(|| {
    HeaderField::ALL
        .iter()
        .map(|field| {
            let pattern = format!(r"(?mi)^[ \t/*#@]*{} (.*)$", regex::escape(field.label()));
            let re = Regex::new(&pattern).expect("header pattern is valid");
            (*field, re)
        })
        .collect()
});

static COMMENT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\*/|\?>).*").expect("comment tail pattern is valid"));

/// Metadata fields found in a marker header. Absent fields are empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ComponentHeaders {
    pub author: String,
    pub version: String,
    pub package: String,
    pub subpackage: String,
    pub repository: String,
    pub description: String,
}

impl ComponentHeaders {
    /// Read the bounded header prefix of `path` and extract every field.
    ///
    /// The handle is scoped to this call; an unreadable file is an error that
    /// names the path, while missing fields simply stay empty.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening component header {}", path.display()))?;
        let mut prefix = Vec::with_capacity(HEADER_READ_LIMIT as usize);
        file.take(HEADER_READ_LIMIT)
            .read_to_end(&mut prefix)
            .with_context(|| format!("reading component header {}", path.display()))?;
        Ok(Self::parse(&String::from_utf8_lossy(&prefix)))
    }

    /// Extract header fields from already-loaded text.
    ///
    /// Carriage returns are folded into newlines first so classic Mac and
    /// mixed line endings behave like LF.
    pub fn parse(text: &str) -> Self {
        let normalized = text.replace('\r', "\n");
        let mut headers = Self::default();
        for (field, re) in FIELD_PATTERNS.iter() {
            let value = re
                .captures(&normalized)
                .and_then(|caps| caps.get(1))
                .map(|m| cleanup_header_comment(m.as_str()))
                .unwrap_or_default();
            *headers.field_mut(*field) = value;
        }
        headers
    }

    fn field_mut(&mut self, field: HeaderField) -> &mut String {
        match field {
            HeaderField::Author => &mut self.author,
            HeaderField::Version => &mut self.version,
            HeaderField::Package => &mut self.package,
            HeaderField::Subpackage => &mut self.subpackage,
            HeaderField::Repository => &mut self.repository,
            HeaderField::Description => &mut self.description,
        }
    }
}

/// Drop a trailing comment closer (`*/` or `?>`) and surrounding whitespace.
pub fn cleanup_header_comment(raw: &str) -> String {
    COMMENT_TAIL.replace(raw, "").trim().to_string()
}
