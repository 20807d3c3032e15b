//! Asset catalog contract and an in-memory catalog.

use crate::mode::PanelKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pickable entry in a panel.
///
/// For the text panel `name` is the preset body and `url` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCandidate {
    pub name: String,
    pub url: String,
}

impl AssetCandidate {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Source of panel entries.
///
/// `search` returns a lazy, finite sequence; calling it again restarts the
/// search from the beginning.
pub trait AssetCatalog {
    fn search<'a>(
        &'a self,
        panel: PanelKind,
        query: Option<&str>,
    ) -> Box<dyn Iterator<Item = AssetCandidate> + 'a>;
}

/// In-memory catalog for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<PanelKind, Vec<AssetCandidate>>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with placeholder assets for every panel.
    pub fn with_placeholders() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            PanelKind::Background,
            AssetCandidate::new(
                "Sample Background",
                "https://via.placeholder.com/1920x1080/2c3e50",
            ),
        );
        catalog.insert(
            PanelKind::Character,
            AssetCandidate::new("Sample Character", "https://via.placeholder.com/200/e74c3c"),
        );
        for preset in ["Add a heading", "Add a subheading", "Add body text"] {
            catalog.insert(PanelKind::Text, AssetCandidate::new(preset, ""));
        }
        catalog
    }

    /// Add an entry to a panel.
    pub fn insert(&mut self, panel: PanelKind, candidate: AssetCandidate) {
        self.entries.entry(panel).or_default().push(candidate);
    }

    /// Number of entries in a panel.
    pub fn len(&self, panel: PanelKind) -> usize {
        self.entries.get(&panel).map_or(0, Vec::len)
    }
}

impl AssetCatalog for StaticCatalog {
    fn search<'a>(
        &'a self,
        panel: PanelKind,
        query: Option<&str>,
    ) -> Box<dyn Iterator<Item = AssetCandidate> + 'a> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let entries = self.entries.get(&panel).map(Vec::as_slice).unwrap_or(&[]);

        Box::new(
            entries
                .iter()
                .filter(move |candidate| match &needle {
                    Some(needle) => candidate.name.to_lowercase().contains(needle.as_str()),
                    None => true,
                })
                .cloned(),
        )
    }
}
