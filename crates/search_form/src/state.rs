use availability_client::SearchForm;
use campground_catalog::CampgroundCatalog;
use chrono::NaiveDate;
use persistence::KeyValueStore;

use crate::controls::{Checklist, DateControl};

/// Store key of the selected start date
pub const START_DATE_KEY: &str = "yosemite_start_date";

/// Store key of the selected end date
pub const END_DATE_KEY: &str = "yosemite_end_date";

/// Store key of the JSON list of checked campground IDs
pub const CAMPGROUNDS_KEY: &str = "yosemite_campgrounds";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised by form edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The date falls before the control's minimum
    #[error("{date} is before the earliest allowed date {min}")]
    BeforeMinimum {
        /// Rejected date
        date: NaiveDate,
        /// Control minimum
        min: NaiveDate,
    },

    /// No checkbox carries the ID
    #[error("Unknown campground ID: {0}")]
    UnknownCampground(String),
}

/// Current date range and campground selection, mirrored to a store
#[derive(Debug)]
pub struct SelectionState<S: KeyValueStore> {
    store: S,
    ttl_days: u32,
    start: DateControl,
    end: DateControl,
    checklist: Checklist,
}

impl<S: KeyValueStore> SelectionState<S> {
    /// Builds the form controls and applies whatever the store still holds.
    ///
    /// The start control defaults to `today`; neither control accepts a date
    /// before today. A persisted start date raises the end minimum. A
    /// persisted campground list replaces the default checklist entirely.
    pub fn initialize(
        store: S,
        catalog: &CampgroundCatalog,
        today: NaiveDate,
        ttl_days: u32,
    ) -> Self {
        let mut state = Self {
            store,
            ttl_days,
            start: DateControl::new(Some(today), today),
            end: DateControl::new(None, today),
            checklist: Checklist::from_catalog(catalog),
        };

        state.restore_dates();
        state.restore_campgrounds();
        state
    }

    fn restore_dates(&mut self) {
        if let Some(start) = self.load_date(START_DATE_KEY) {
            if self.start.accepts(start) {
                self.start.value = Some(start);
                self.end.min = start;
            } else {
                log::info!(
                    "Ignoring saved start date {} before {}",
                    start,
                    self.start.min
                );
            }
        }

        if let Some(end) = self.load_date(END_DATE_KEY) {
            if self.end.accepts(end) {
                self.end.value = Some(end);
            } else {
                log::info!("Ignoring saved end date {} before {}", end, self.end.min);
            }
        }
    }

    fn load_date(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.store.load(key)?;
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                log::warn!("⚠️ Ignoring saved {} '{}': {}", key, raw, e);
                None
            }
        }
    }

    fn restore_campgrounds(&mut self) {
        let Some(raw) = self.store.load(CAMPGROUNDS_KEY) else {
            return;
        };

        let ids: Vec<String> = match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                log::error!("❌ Error parsing saved campgrounds: {}", e);
                return;
            }
        };

        self.checklist.set_all(false);
        for id in &ids {
            if !self.checklist.set(id, true) {
                log::debug!("Saved campground {} is not in the catalog", id);
            }
        }
    }

    /// Start date control
    pub fn start(&self) -> &DateControl {
        &self.start
    }

    /// End date control
    pub fn end(&self) -> &DateControl {
        &self.end
    }

    /// Campground checklist
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the state, returning the backing store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Selects a start date, persists it and raises the end minimum to it
    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<(), SelectionError> {
        if !self.start.accepts(date) {
            return Err(SelectionError::BeforeMinimum {
                date,
                min: self.start.min,
            });
        }

        self.start.value = Some(date);
        self.end.min = date;
        self.persist(START_DATE_KEY, &date.format(DATE_FORMAT).to_string());
        Ok(())
    }

    /// Selects an end date and persists it
    pub fn set_end_date(&mut self, date: NaiveDate) -> Result<(), SelectionError> {
        if !self.end.accepts(date) {
            return Err(SelectionError::BeforeMinimum {
                date,
                min: self.end.min,
            });
        }

        self.end.value = Some(date);
        self.persist(END_DATE_KEY, &date.format(DATE_FORMAT).to_string());
        Ok(())
    }

    /// Checks or unchecks one campground and persists the checked list
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<(), SelectionError> {
        if !self.checklist.set(id, checked) {
            return Err(SelectionError::UnknownCampground(id.to_string()));
        }

        self.persist_campgrounds();
        Ok(())
    }

    /// Checks or unchecks several campgrounds and persists the list once.
    ///
    /// Nothing changes when any ID is unknown.
    pub fn set_checked_many(
        &mut self,
        ids: &[String],
        checked: bool,
    ) -> Result<(), SelectionError> {
        if let Some(unknown) = ids.iter().find(|id| !self.checklist.contains(id)) {
            return Err(SelectionError::UnknownCampground(unknown.clone()));
        }

        for id in ids {
            self.checklist.set(id, checked);
        }
        self.persist_campgrounds();
        Ok(())
    }

    /// Checks every campground
    pub fn select_all(&mut self) {
        self.checklist.set_all(true);
        self.persist_campgrounds();
    }

    /// Unchecks every campground
    pub fn clear_all(&mut self) {
        self.checklist.set_all(false);
        self.persist_campgrounds();
    }

    /// Checked campground IDs in checklist order
    pub fn selected_campgrounds(&self) -> Vec<String> {
        self.checklist.checked_ids()
    }

    /// Raw control values for the search trigger
    pub fn form(&self) -> SearchForm {
        SearchForm {
            start_date: self.start.value,
            end_date: self.end.value,
            campgrounds: self.selected_campgrounds(),
        }
    }

    fn persist_campgrounds(&mut self) {
        match serde_json::to_string(&self.selected_campgrounds()) {
            Ok(json) => self.persist(CAMPGROUNDS_KEY, &json),
            Err(e) => log::warn!("⚠️ Failed to encode campground selection: {}", e),
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.save(key, value, self.ttl_days) {
            log::warn!("⚠️ Failed to save {}: {}", key, e);
        }
    }
}
