use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Base URL of a campground page on recreation.gov
pub const RECREATION_GOV_CAMPGROUND_URL: &str = "https://www.recreation.gov/camping/campgrounds";

/// A single campground known to the search form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Recreation.gov facility ID
    pub id: String,

    /// Name shown in the checklist and as a panel title fallback
    pub name: String,

    /// External link to the campground page
    pub link: String,

    /// Always display this campground as first-come, first-served
    #[serde(default)]
    pub first_come_first_served: bool,

    /// Display this campground as closed rather than reserved when nothing is available
    #[serde(default)]
    pub force_closed: bool,
}

impl CatalogEntry {
    /// Creates an entry linking to the campground's recreation.gov page
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            link: format!("{}/{}", RECREATION_GOV_CAMPGROUND_URL, id),
            first_come_first_served: false,
            force_closed: false,
        }
    }

    /// Marks the entry as first-come, first-served
    pub fn first_come_first_served(mut self) -> Self {
        self.first_come_first_served = true;
        self
    }

    /// Marks the entry as closed
    pub fn force_closed(mut self) -> Self {
        self.force_closed = true;
        self
    }
}

/// Errors raised while building a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An entry has an empty ID
    #[error("Catalog entry '{0}' has an empty ID")]
    EmptyId(String),

    /// Two entries share an ID
    #[error("Duplicate campground ID in catalog: {0}")]
    DuplicateId(String),

    /// The catalog file could not be read
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not a JSON array of entries
    #[error("Invalid catalog file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Immutable mapping from campground ID to its display data, in display order
#[derive(Debug, Clone)]
pub struct CampgroundCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl CampgroundCatalog {
    /// Builds a catalog, rejecting empty and duplicate IDs
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(entry.name.clone()));
            }
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Parses a catalog from a JSON array of entries
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Loads a catalog from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        log::info!(
            "📚 Loaded {} campgrounds from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Looks up an entry by ID
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Entries in display order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// IDs in display order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// Catalog name for the ID
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    /// External link for the ID
    pub fn link_for(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.link.as_str())
    }

    /// Whether the ID carries the first-come, first-served override
    pub fn is_first_come_first_served(&self, id: &str) -> bool {
        self.get(id).is_some_and(|entry| entry.first_come_first_served)
    }

    /// Whether the ID carries the forced-closed override
    pub fn is_force_closed(&self, id: &str) -> bool {
        self.get(id).is_some_and(|entry| entry.force_closed)
    }

    /// Number of campgrounds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no campgrounds
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookups_follow_entry_order() {
        let catalog = CampgroundCatalog::new(vec![
            CatalogEntry::new("2", "Second"),
            CatalogEntry::new("1", "First").force_closed(),
        ])
        .unwrap();

        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(catalog.display_name("1"), Some("First"));
        assert_eq!(
            catalog.link_for("2"),
            Some("https://www.recreation.gov/camping/campgrounds/2")
        );
        assert!(catalog.is_force_closed("1"));
        assert!(!catalog.is_force_closed("2"));
        assert!(!catalog.is_first_come_first_served("missing"));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_and_empty_ids_are_rejected() {
        let duplicate = CampgroundCatalog::new(vec![
            CatalogEntry::new("1", "A"),
            CatalogEntry::new("1", "B"),
        ]);
        assert!(matches!(duplicate, Err(CatalogError::DuplicateId(id)) if id == "1"));

        let empty = CampgroundCatalog::new(vec![CatalogEntry::new(" ", "Blank")]);
        assert!(matches!(empty, Err(CatalogError::EmptyId(_))));
    }

    #[test]
    fn test_from_path_reads_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "10", "name": "Ten", "link": "https://example.com/10", "first_come_first_served": true}},
                {{"id": "11", "name": "Eleven", "link": "https://example.com/11"}}
            ]"#
        )
        .unwrap();

        let catalog = CampgroundCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.is_first_come_first_served("10"));
        assert!(!catalog.is_force_closed("11"));
        assert_eq!(catalog.link_for("11"), Some("https://example.com/11"));
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        let result = CampgroundCatalog::from_json_str(r#"{"id": "1"}"#);
        assert!(matches!(result, Err(CatalogError::Format(_))));
    }
}
