use std::cell::RefCell;
use std::time::{Duration, Instant};

use availability_client::SearchUi;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use persistence::KeyValueStore;
use result_view::{
    AvailabilityLine, LegendEntry, NO_AVAILABILITY_MESSAGE, PanelColor, RenderedPanel, ResultsView,
};
use search_form::SelectionState;

/// Loading indicator and alerts on the terminal
pub struct TerminalUi {
    spinner: RefCell<Option<ProgressBar>>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            spinner: RefCell::new(None),
        }
    }
}

impl SearchUi for TerminalUi {
    fn show_loading(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message("Checking availability...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn hide_loading(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

pub fn print_checklist<S: KeyValueStore>(state: &SelectionState<S>) {
    let mut table = new_table(vec!["", "ID", "Campground"]);

    for item in state.checklist().items() {
        let mark = if item.checked {
            Cell::new("[x]").fg(Color::Green)
        } else {
            Cell::new("[ ]")
        };
        table.add_row(vec![mark, Cell::new(&item.id), Cell::new(&item.label)]);
    }

    println!("{table}");
}

pub fn print_selection<S: KeyValueStore>(state: &SelectionState<S>) {
    let format_date = |value: Option<chrono::NaiveDate>| {
        value.map_or_else(|| "-".to_string(), |date| date.to_string())
    };

    println!(
        "Start date: {} (earliest {})",
        format_date(state.start().value),
        state.start().min
    );
    println!(
        "End date:   {} (earliest {})",
        format_date(state.end().value),
        state.end().min
    );

    let selected: Vec<&str> = state
        .checklist()
        .items()
        .iter()
        .filter(|item| item.checked)
        .map(|item| item.label.as_str())
        .collect();

    if selected.is_empty() {
        println!("Campgrounds: none selected");
    } else {
        println!("Campgrounds: {}", selected.join(", "));
    }
}

pub fn print_results(view: &ResultsView, now: Instant) {
    match view {
        ResultsView::NoAvailability => {
            println!("{}", NO_AVAILABILITY_MESSAGE);
        }
        ResultsView::Panels { legend, panels } => {
            println!("{}", legend_table(legend));
            println!("{}", panels_table(panels, now));
        }
    }
}

fn legend_table(legend: &[LegendEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(
        legend
            .iter()
            .map(|entry| Cell::new(format!("■ {}", entry.label)).fg(color(entry.color)))
            .collect::<Vec<_>>(),
    );
    table
}

fn panels_table(panels: &[RenderedPanel], now: Instant) -> Table {
    let mut table = new_table(vec!["", "Campground", "Status", "Availability", "Link"]);

    for panel in panels {
        let details = if panel.is_displayed(now) {
            panel_details(panel)
        } else {
            String::new()
        };

        table.add_row(vec![
            Cell::new(arrow_glyph(panel.arrow())),
            Cell::new(format!("{} {}", icon_glyph(panel.kind.icon()), panel.title))
                .fg(color(panel.kind.color()))
                .add_attribute(Attribute::Bold),
            Cell::new(panel.kind.status_text()),
            Cell::new(details),
            Cell::new(panel.link.as_deref().unwrap_or("-")),
        ]);
    }

    table
}

/// Body text of an open panel
fn panel_details(panel: &RenderedPanel) -> String {
    let mut out = Vec::new();

    for month in &panel.months {
        let dates: Vec<&str> = month.dates.iter().map(|badge| badge.label.as_str()).collect();
        out.push(format!("{}: {}", month.label, dates.join(" | ")));
    }

    if !panel.lines.is_empty() && !out.is_empty() {
        out.push(String::new());
    }

    for line in &panel.lines {
        match line {
            AvailabilityLine::Sites { label, sites } => {
                out.push(format!("• {}: {}", label, sites.join(", ")))
            }
            AvailabilityLine::Literal(text) => out.push(format!("• {}", text)),
        }
    }

    if let Some(note) = &panel.note {
        out.push(format!("Note: {}", note));
    }

    out.join("\n")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold)),
        );
    table
}

fn color(color: PanelColor) -> Color {
    match color {
        PanelColor::Green => Color::Green,
        PanelColor::Blue => Color::Blue,
        PanelColor::Purple => Color::Magenta,
        PanelColor::Red => Color::Red,
        PanelColor::Gray => Color::Grey,
    }
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "forest" => "🌲",
        _ => "✖",
    }
}

fn arrow_glyph(arrow: &str) -> &'static str {
    match arrow {
        "expand_less" => "▾",
        _ => "▸",
    }
}
