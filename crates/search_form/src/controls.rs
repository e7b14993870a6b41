use campground_catalog::CampgroundCatalog;
use chrono::NaiveDate;

/// A date input with a lower bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateControl {
    /// Selected date, if any
    pub value: Option<NaiveDate>,
    /// Earliest selectable date
    pub min: NaiveDate,
}

impl DateControl {
    /// Creates a control with an optional value and a minimum
    pub fn new(value: Option<NaiveDate>, min: NaiveDate) -> Self {
        Self { value, min }
    }

    /// Whether `date` can be selected
    pub fn accepts(&self, date: NaiveDate) -> bool {
        date >= self.min
    }
}

/// One checkbox of the campground checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Campground facility ID
    pub id: String,
    /// Label shown next to the checkbox
    pub label: String,
    /// Whether the box is checked
    pub checked: bool,
}

/// Campground checkboxes in catalog order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Builds an all-unchecked checklist from the catalog
    pub fn from_catalog(catalog: &CampgroundCatalog) -> Self {
        let items = catalog
            .entries()
            .iter()
            .map(|entry| ChecklistItem {
                id: entry.id.clone(),
                label: entry.name.clone(),
                checked: false,
            })
            .collect();

        Self { items }
    }

    /// Items in display order
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Sets one box; returns false when no box has that ID
    pub fn set(&mut self, id: &str, checked: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Sets every box
    pub fn set_all(&mut self, checked: bool) {
        for item in &mut self.items {
            item.checked = checked;
        }
    }

    /// Whether a box with that ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// IDs of checked boxes in display order
    pub fn checked_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.id.clone())
            .collect()
    }
}
