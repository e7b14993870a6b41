use std::time::{Duration, Instant};

use chrono::NaiveDate;

/// Duration of the expand and collapse transition
pub const COLLAPSE_TRANSITION: Duration = Duration::from_millis(500);

/// Header colour of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelColor {
    /// Reservable online
    Green,
    /// First-come, first-served
    Blue,
    /// Mixed availability
    Purple,
    /// Fully reserved
    Red,
    /// Closed
    Gray,
}

/// Display classification of a campground panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Has availability that can be booked online
    Reservable,
    /// Has availability but only for walk-up campers
    FirstComeFirstServed,
    /// No availability and marked closed
    Closed,
    /// No availability
    Reserved,
}

impl PanelKind {
    /// Header colour
    pub fn color(self) -> PanelColor {
        match self {
            PanelKind::Reservable => PanelColor::Green,
            PanelKind::FirstComeFirstServed => PanelColor::Blue,
            PanelKind::Closed => PanelColor::Gray,
            PanelKind::Reserved => PanelColor::Red,
        }
    }

    /// Material icon name shown in the header
    pub fn icon(self) -> &'static str {
        if self.has_availability() {
            "forest"
        } else {
            "close"
        }
    }

    /// Status line shown at the top of the panel body
    pub fn status_text(self) -> &'static str {
        match self {
            PanelKind::Reservable => "Available for online reservation",
            PanelKind::FirstComeFirstServed => "First-come, first-served only",
            PanelKind::Closed => "Closed",
            PanelKind::Reserved => "Reserved",
        }
    }

    /// Whether panels of this kind list availability
    pub fn has_availability(self) -> bool {
        matches!(self, PanelKind::Reservable | PanelKind::FirstComeFirstServed)
    }
}

/// One row of the colour legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    /// Swatch colour
    pub color: PanelColor,
    /// Description
    pub label: &'static str,
}

/// Colour legend shown above the panels
pub const LEGEND: [LegendEntry; 5] = [
    LegendEntry {
        color: PanelColor::Green,
        label: "Available for online reservation",
    },
    LegendEntry {
        color: PanelColor::Blue,
        label: "First-come, first-served only",
    },
    LegendEntry {
        color: PanelColor::Purple,
        label: "Mixed availability",
    },
    LegendEntry {
        color: PanelColor::Red,
        label: "Reserved",
    },
    LegendEntry {
        color: PanelColor::Gray,
        label: "Closed",
    },
];

/// A date badge such as "Thu, Apr 10"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBadge {
    /// Calendar date
    pub date: NaiveDate,
    /// Short label
    pub label: String,
}

impl DateBadge {
    /// Creates a badge for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: date_label(date),
        }
    }
}

/// Available dates of one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    /// Month and year, e.g. "April 2025"
    pub label: String,
    /// Dates in ascending order, without duplicates
    pub dates: Vec<DateBadge>,
}

/// One detail line of an available campground
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityLine {
    /// A date (or site) followed by its list of sites (or dates)
    Sites {
        /// Formatted date, or the raw key when it is not a date
        label: String,
        /// Identifiers listed under the key
        sites: Vec<String>,
    },
    /// A scalar value shown inline as "key: value"
    Literal(String),
}

/// Expand/collapse state of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Hidden
    Collapsed,
    /// Fully shown
    Expanded,
    /// Closing; still displayed until `hide_at`
    Collapsing {
        /// When the body leaves the layout
        hide_at: Instant,
    },
}

/// One campground in the rendered results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanel {
    /// Campground facility ID
    pub campground_id: String,
    /// Header title
    pub title: String,
    /// Display classification
    pub kind: PanelKind,
    /// External campground page, when the catalog knows the ID
    pub link: Option<String>,
    /// Available dates grouped by month
    pub months: Vec<MonthGroup>,
    /// Per-key availability detail in response order
    pub lines: Vec<AvailabilityLine>,
    /// Error the server reported for this campground
    pub note: Option<String>,
    state: PanelState,
}

impl RenderedPanel {
    /// Creates a collapsed panel with no availability detail
    pub fn new(campground_id: &str, title: String, kind: PanelKind, link: Option<String>) -> Self {
        Self {
            campground_id: campground_id.to_string(),
            title,
            kind,
            link,
            months: Vec::new(),
            lines: Vec::new(),
            note: None,
            state: PanelState::Collapsed,
        }
    }

    /// Current expand/collapse state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Handles a click on the header
    pub fn toggle(&mut self, now: Instant) {
        self.state = match self.state {
            PanelState::Collapsed | PanelState::Collapsing { .. } => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsing {
                hide_at: now + COLLAPSE_TRANSITION,
            },
        };
    }

    /// Finishes a collapse whose transition has elapsed
    pub fn settle(&mut self, now: Instant) {
        if let PanelState::Collapsing { hide_at } = self.state {
            if now >= hide_at {
                self.state = PanelState::Collapsed;
            }
        }
    }

    /// Whether the panel is fully expanded
    pub fn is_expanded(&self) -> bool {
        self.state == PanelState::Expanded
    }

    /// Whether the body is part of the layout at `now`
    pub fn is_displayed(&self, now: Instant) -> bool {
        match self.state {
            PanelState::Collapsed => false,
            PanelState::Expanded => true,
            PanelState::Collapsing { hide_at } => now < hide_at,
        }
    }

    /// Arrow glyph shown in the header
    pub fn arrow(&self) -> &'static str {
        if self.is_expanded() {
            "expand_less"
        } else {
            "expand_more"
        }
    }
}

/// Short date label, e.g. "Thu, Apr 10"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Month label, e.g. "April 2025"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
