use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use availability_client::{
    AvailabilityEntry, AvailabilityMap, AvailabilityResult, CampgroundResult,
};
use campground_catalog::CampgroundCatalog;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::panel::{
    AvailabilityLine, DateBadge, LEGEND, LegendEntry, MonthGroup, PanelKind, RenderedPanel,
    date_label, month_label,
};

/// Notice shown when the search found nothing
pub const NO_AVAILABILITY_MESSAGE: &str =
    "No availability found for the selected date range and campgrounds.";

/// Everything the results area shows after one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// Single notice; no panels
    NoAvailability,
    /// Legend followed by one panel per campground
    Panels {
        /// Colour legend
        legend: Vec<LegendEntry>,
        /// Available campgrounds first, then the rest, each in response order
        panels: Vec<RenderedPanel>,
    },
}

impl ResultsView {
    /// Rendered panels; empty for the no-availability notice
    pub fn panels(&self) -> &[RenderedPanel] {
        match self {
            ResultsView::NoAvailability => &[],
            ResultsView::Panels { panels, .. } => panels,
        }
    }

    /// Mutable access to the panels, for toggling
    pub fn panels_mut(&mut self) -> &mut [RenderedPanel] {
        match self {
            ResultsView::NoAvailability => &mut [],
            ResultsView::Panels { panels, .. } => panels,
        }
    }
}

/// Turns search results into panels using the campground catalog
pub struct ResultRenderer {
    catalog: Arc<CampgroundCatalog>,
}

impl ResultRenderer {
    /// Creates a renderer over a catalog
    pub fn new(catalog: Arc<CampgroundCatalog>) -> Self {
        Self { catalog }
    }

    /// Builds a fresh view for one completed search
    pub fn render(&self, results: &AvailabilityResult, found_any: bool) -> ResultsView {
        if !found_any {
            return ResultsView::NoAvailability;
        }

        let (available, unavailable): (Vec<_>, Vec<_>) = results
            .iter()
            .partition(|(_, result)| result.has_availability());

        let mut panels: Vec<RenderedPanel> = available
            .into_iter()
            .map(|(id, result)| self.available_panel(id, result))
            .collect();
        panels.extend(
            unavailable
                .into_iter()
                .map(|(id, result)| self.unavailable_panel(id, result)),
        );

        debug!("Rendered {} campground panels", panels.len());

        ResultsView::Panels {
            legend: LEGEND.to_vec(),
            panels,
        }
    }

    fn available_panel(&self, id: &str, result: &CampgroundResult) -> RenderedPanel {
        let walk_up =
            self.catalog.is_first_come_first_served(id) || result.is_first_come_first_served;
        let kind = if walk_up {
            PanelKind::FirstComeFirstServed
        } else {
            PanelKind::Reservable
        };

        let mut panel = self.panel(id, result, kind);
        panel.months = month_groups(&result.availability);
        panel.lines = detail_lines(&result.availability);
        panel
    }

    fn unavailable_panel(&self, id: &str, result: &CampgroundResult) -> RenderedPanel {
        let kind = if self.catalog.is_force_closed(id) {
            PanelKind::Closed
        } else {
            PanelKind::Reserved
        };

        self.panel(id, result, kind)
    }

    fn panel(&self, id: &str, result: &CampgroundResult, kind: PanelKind) -> RenderedPanel {
        let mut panel = RenderedPanel::new(
            id,
            self.title(id, result),
            kind,
            self.catalog.link_for(id).map(str::to_string),
        );
        panel.note = result.error.clone();
        panel
    }

    fn title(&self, id: &str, result: &CampgroundResult) -> String {
        result
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.catalog.display_name(id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Campground {}", id))
    }
}

/// Parses a date key, ignoring any time suffix
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date_only = key.split('T').next().unwrap_or(key);
    NaiveDate::parse_from_str(date_only, "%Y-%m-%d").ok()
}

/// Groups date keys with a non-empty site list by month
fn month_groups(availability: &AvailabilityMap) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), BTreeSet<NaiveDate>> = BTreeMap::new();

    for (key, entry) in availability.iter() {
        let AvailabilityEntry::Sites(sites) = entry else {
            continue;
        };
        if sites.is_empty() {
            continue;
        }
        match parse_date_key(key) {
            Some(date) => {
                months
                    .entry((date.year(), date.month()))
                    .or_default()
                    .insert(date);
            }
            None => debug!("Availability key {} is not a date", key),
        }
    }

    months
        .into_values()
        .filter_map(|dates| {
            let first = *dates.first()?;
            Some(MonthGroup {
                label: month_label(first),
                dates: dates.into_iter().map(DateBadge::new).collect(),
            })
        })
        .collect()
}

/// One line per availability key, in response order
fn detail_lines(availability: &AvailabilityMap) -> Vec<AvailabilityLine> {
    availability
        .iter()
        .map(|(key, entry)| match entry {
            AvailabilityEntry::Sites(sites) => AvailabilityLine::Sites {
                label: parse_date_key(key)
                    .map(date_label)
                    .unwrap_or_else(|| key.to_string()),
                sites: sites.clone(),
            },
            AvailabilityEntry::Literal(value) => {
                AvailabilityLine::Literal(format!("{}: {}", key, value))
            }
        })
        .collect()
}
