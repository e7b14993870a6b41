use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::client::AvailabilityBackend;
use crate::types::{ClientError, InputError, SearchForm, SearchOutcome};

/// Alert shown when a search is triggered while another one is pending
pub const SEARCH_IN_PROGRESS_MESSAGE: &str = "A search is already in progress";

/// Page surface the search trigger talks to
pub trait SearchUi {
    /// Show the loading indicator and hide stale results
    fn show_loading(&self);

    /// Hide the loading indicator
    fn hide_loading(&self);

    /// Show a blocking message to the user
    fn alert(&self, message: &str);
}

/// How a search attempt ended
#[derive(Debug)]
pub enum SearchStatus {
    /// The form failed validation; no request was sent
    Rejected(InputError),
    /// Another search was still pending; no request was sent
    Busy,
    /// The request failed; the user saw the generic message
    Failed(ClientError),
    /// The request succeeded
    Completed(SearchOutcome),
}

/// Search trigger: validates the form and runs at most one search at a time
pub struct SearchController {
    backend: Arc<dyn AvailabilityBackend>,

    /// Set while a request is pending
    in_flight: AtomicBool,
}

impl SearchController {
    /// Creates a controller over a backend
    pub fn new(backend: Arc<dyn AvailabilityBackend>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a search is pending
    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one search for the current form values.
    ///
    /// Validation failures and a pending search short-circuit with an alert
    /// before any request is made. Otherwise the loading indicator wraps the
    /// request on both the success and failure paths.
    pub async fn search(&self, form: SearchForm, ui: &dyn SearchUi) -> SearchStatus {
        let request = match form.into_request() {
            Ok(request) => request,
            Err(e) => {
                ui.alert(&e.to_string());
                return SearchStatus::Rejected(e);
            }
        };

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Search requested while another search is pending");
            ui.alert(SEARCH_IN_PROGRESS_MESSAGE);
            return SearchStatus::Busy;
        };

        ui.show_loading();
        let result = self.backend.check(&request).await;
        ui.hide_loading();

        match result {
            Ok(outcome) => {
                info!(
                    "Search finished: {} campgrounds, found any: {}",
                    outcome.results.len(),
                    outcome.found_any
                );
                SearchStatus::Completed(outcome)
            }
            Err(e) => {
                error!("Error checking availability: {}", e);
                ui.alert(e.user_message());
                SearchStatus::Failed(e)
            }
        }
    }
}

/// Clears the in-flight flag when the search ends
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
