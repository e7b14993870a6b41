use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use validator::Validate;

/// Message shown for every transport, status or parse failure
pub const GENERIC_FAILURE_MESSAGE: &str =
    "There was an error checking availability. Please try again later.";

/// Fallback when the server reports failure without a message
pub const DEFAULT_SERVER_ERROR: &str = "Failed to check availability";

/// Raw values of the search form controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// Selected start date, if any
    pub start_date: Option<NaiveDate>,
    /// Selected end date, if any
    pub end_date: Option<NaiveDate>,
    /// Checked campground IDs in checklist order
    pub campgrounds: Vec<String>,
}

impl SearchForm {
    /// Checks the form preconditions and builds the request body.
    ///
    /// Errors are reported in the order a user would fix them: start date,
    /// end date, date order, campground selection.
    pub fn into_request(self) -> Result<SearchRequest, InputError> {
        let start_date = self.start_date.ok_or(InputError::MissingStartDate)?;
        let end_date = self.end_date.ok_or(InputError::MissingEndDate)?;

        if start_date > end_date {
            return Err(InputError::EndBeforeStart);
        }

        let request = SearchRequest {
            start_date,
            end_date,
            campgrounds: self.campgrounds,
        };

        request
            .validate()
            .map_err(|_| InputError::NoCampgroundsSelected)?;

        Ok(request)
    }
}

/// Request body posted to the availability endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// First night, serialized as `YYYY-MM-DD`
    pub start_date: NaiveDate,

    /// Last night, serialized as `YYYY-MM-DD`
    pub end_date: NaiveDate,

    /// Campground facility IDs to check
    #[validate(length(min = 1, message = "Please select at least one campground"))]
    pub campgrounds: Vec<String>,
}

/// Search form problems reported to the user before any request is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No start date selected
    #[error("Please select a start date")]
    MissingStartDate,

    /// No end date selected
    #[error("Please select an end date")]
    MissingEndDate,

    /// The start date falls after the end date
    #[error("End date must be after start date")]
    EndBeforeStart,

    /// No campground is checked
    #[error("Please select at least one campground")]
    NoCampgroundsSelected,
}

/// Custom error type for availability requests
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be sent or its body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP error! status: {0}")]
    Http(u16),

    /// The response body is not the expected JSON
    #[error("Invalid response from server: {0}")]
    Parse(String),

    /// The endpoint reported failure
    #[error("Server error: {0}")]
    Server(String),
}

impl ClientError {
    /// Message shown to the user; the specific cause is only logged
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

/// Response structure from the availability endpoint
#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityResponse {
    /// Whether the search succeeded
    pub success: bool,

    /// Per-campground results keyed by facility ID
    #[serde(default)]
    pub results: Option<Value>,

    /// Whether any campground has availability
    #[serde(default, rename = "foundAny")]
    pub found_any: Option<bool>,

    /// Server-supplied failure message
    #[serde(default)]
    pub error: Option<String>,
}

impl CheckAvailabilityResponse {
    /// Converts the response into a search outcome or a server failure
    pub fn into_outcome(self) -> Result<SearchOutcome, ClientError> {
        if !self.success {
            let message = self
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
            return Err(ClientError::Server(message));
        }

        Ok(SearchOutcome {
            results: self.results.map(AvailabilityResult::from).unwrap_or_default(),
            found_any: self.found_any.unwrap_or(false),
        })
    }
}

/// Result of a completed search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Per-campground availability
    pub results: AvailabilityResult,
    /// Whether the server found availability anywhere
    pub found_any: bool,
}

/// Per-campground availability in the order the server returned it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityResult {
    campgrounds: Vec<(String, CampgroundResult)>,
}

impl AvailabilityResult {
    /// Iterates over campground IDs and their results
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CampgroundResult)> {
        self.campgrounds
            .iter()
            .map(|(id, result)| (id.as_str(), result))
    }

    /// Result for a campground
    pub fn get(&self, id: &str) -> Option<&CampgroundResult> {
        self.iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, result)| result)
    }

    /// Number of campgrounds in the result
    pub fn len(&self) -> usize {
        self.campgrounds.len()
    }

    /// Whether the result lists no campgrounds
    pub fn is_empty(&self) -> bool {
        self.campgrounds.is_empty()
    }
}

impl FromIterator<(String, CampgroundResult)> for AvailabilityResult {
    fn from_iter<I: IntoIterator<Item = (String, CampgroundResult)>>(iter: I) -> Self {
        Self {
            campgrounds: iter.into_iter().collect(),
        }
    }
}

impl From<Map<String, Value>> for AvailabilityResult {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .filter_map(
                |(id, value)| match serde_json::from_value::<CampgroundResult>(value) {
                    Ok(result) => Some((id, result)),
                    Err(e) => {
                        warn!("Skipping malformed result for campground {}: {}", id, e);
                        None
                    }
                },
            )
            .collect()
    }
}

impl From<Value> for AvailabilityResult {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map),
            Value::Null => Self::default(),
            other => {
                warn!("Ignoring results payload that is not an object: {}", other);
                Self::default()
            }
        }
    }
}

/// Availability reported for one campground
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CampgroundResult {
    /// Server-supplied display name
    #[serde(default)]
    pub name: Option<String>,

    /// Open sites keyed by date (or dates keyed by site)
    #[serde(default, deserialize_with = "null_as_default")]
    pub availability: AvailabilityMap,

    /// Whether the server flagged the campground as first-come, first-served
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_first_come_first_served: bool,

    /// Error the server hit while checking this campground
    #[serde(default)]
    pub error: Option<String>,
}

impl CampgroundResult {
    /// Whether any availability entry was reported
    pub fn has_availability(&self) -> bool {
        !self.availability.is_empty()
    }
}

/// Availability mapping preserving the server's key order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct AvailabilityMap {
    entries: Vec<(String, AvailabilityEntry)>,
}

impl AvailabilityMap {
    /// Iterates over keys and their entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AvailabilityEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys were reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for AvailabilityMap {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, AvailabilityEntry::from(value)))
            .collect()
    }
}

impl FromIterator<(String, AvailabilityEntry)> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = (String, AvailabilityEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Value of one availability key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityEntry {
    /// List of site (or date) identifiers
    Sites(Vec<String>),
    /// Any non-list value, kept as text
    Literal(String),
}

impl From<Value> for AvailabilityEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sites(items.into_iter().map(value_text).collect()),
            other => Self::Literal(value_text(other)),
        }
    }
}

/// Plain text of a JSON value; strings lose their quotes
fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
