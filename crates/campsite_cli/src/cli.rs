//! Command-line arguments of the `campsite` binary.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "campsite",
    version,
    about = "Check campsite availability for Yosemite campgrounds",
    long_about = "Pick a date range and campgrounds, then check availability.\n\n\
                  The selection is remembered between runs for 30 days."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List campgrounds and whether each one is selected
    Campgrounds,

    /// Set the date range, or show it when no date is given
    Dates(DatesArgs),

    /// Select campgrounds by ID
    Select {
        /// Campground IDs
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// Deselect campgrounds by ID
    Deselect {
        /// Campground IDs
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// Select every campground
    SelectAll,

    /// Deselect every campground
    ClearAll,

    /// Show the current selection
    Show,

    /// Check availability for the current selection
    Search(SearchArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct DatesArgs {
    /// First night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct SearchArgs {
    /// Expand the panel of a campground
    #[arg(long = "expand", value_name = "ID")]
    pub expand: Vec<String>,

    /// Expand every panel
    #[arg(long = "expand-all")]
    pub expand_all: bool,
}

/// Default log filter for a `-v` count
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
