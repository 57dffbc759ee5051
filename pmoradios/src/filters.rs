//! Client side filtering of search results
//!
//! The host exposes its filter widgets through a [`FilterScope`]. Three axes
//! are read from it:
//!
//! - `decade`: a multi-range filter, reduced to an inclusive `[first, last]`
//!   year range
//! - `genre` and `country`: check-option filters, reduced to the set of
//!   active option ids
//!
//! An axis with nothing selected is absent from [`ActiveFilters`].

use crate::station::Station;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const DECADE_FILTER: &str = "decade";
pub const GENRE_FILTER: &str = "genre";
pub const COUNTRY_FILTER: &str = "country";

/// Options of the decade filter (`id`, `label`), oldest first
pub const DECADE_OPTIONS: &[(&str, &str)] = &[
    ("0", "Old"),
    ("1960", "60s"),
    ("1970", "70s"),
    ("1980", "80s"),
    ("1990", "90s"),
    ("2000", "00s"),
    ("2010", "10s"),
];

/// One selectable option of a host filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            active: false,
        }
    }
}

/// Widget kind of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Contiguous selection over ordered options
    MultiRange,
    /// Independent check boxes
    CheckOption,
}

/// Filter published to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub id: String,
    pub label: String,
    pub kind: FilterKind,
    pub options: Vec<FilterOption>,
}

impl FilterDefinition {
    /// The decade multi-range filter
    pub fn decades() -> Self {
        Self {
            id: DECADE_FILTER.to_string(),
            label: "Decade".to_string(),
            kind: FilterKind::MultiRange,
            options: DECADE_OPTIONS
                .iter()
                .map(|(id, label)| FilterOption::new(*id, *label))
                .collect(),
        }
    }

    /// A check-option filter whose options are both id and label
    pub fn check_options(id: &str, label: &str, values: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FilterKind::CheckOption,
            options: values
                .into_iter()
                .map(|value| FilterOption::new(value.clone(), value))
                .collect(),
        }
    }

    pub fn option(&self, id: &str) -> Option<&FilterOption> {
        self.options.iter().find(|option| option.id == id)
    }
}

/// Read access to the host filter state
pub trait FilterScope {
    /// Options of the named filter, in display order
    ///
    /// Unknown filters have no options.
    fn options(&self, filter: &str) -> Vec<FilterOption>;

    /// Id of the first active option of a range filter
    fn first_active(&self, filter: &str) -> Option<String> {
        self.options(filter)
            .into_iter()
            .find(|option| option.active)
            .map(|option| option.id)
    }

    /// Id of the last active option of a range filter
    fn last_active(&self, filter: &str) -> Option<String> {
        self.options(filter)
            .into_iter()
            .rev()
            .find(|option| option.active)
            .map(|option| option.id)
    }
}

/// In-memory filter scope, built from filter definitions
///
/// Stands in for the host widgets in tools and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFilterScope {
    filters: Vec<FilterDefinition>,
}

impl StaticFilterScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(filters: Vec<FilterDefinition>) -> Self {
        Self { filters }
    }

    pub fn definitions(&self) -> &[FilterDefinition] {
        &self.filters
    }

    /// Mark an option active
    ///
    /// Returns false when the filter or the option does not exist.
    pub fn activate(&mut self, filter: &str, option: &str) -> bool {
        self.set_active(filter, option, true)
    }

    pub fn deactivate(&mut self, filter: &str, option: &str) -> bool {
        self.set_active(filter, option, false)
    }

    /// Deactivate every option of every filter
    pub fn clear(&mut self) {
        for option in self.filters.iter_mut().flat_map(|f| f.options.iter_mut()) {
            option.active = false;
        }
    }

    fn set_active(&mut self, filter: &str, option: &str, active: bool) -> bool {
        let target = self
            .filters
            .iter_mut()
            .filter(|f| f.id == filter)
            .flat_map(|f| f.options.iter_mut())
            .find(|o| o.id == option);

        match target {
            Some(target) => {
                target.active = active;
                true
            }
            None => false,
        }
    }
}

impl FilterScope for StaticFilterScope {
    fn options(&self, filter: &str) -> Vec<FilterOption> {
        self.filters
            .iter()
            .find(|f| f.id == filter)
            .map(|f| f.options.clone())
            .unwrap_or_default()
    }
}

/// Filters currently selected by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    /// Inclusive year range
    pub decade: Option<(i32, i32)>,
    pub genre: Option<HashSet<String>>,
    pub country: Option<HashSet<String>>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decade(mut self, first: i32, last: i32) -> Self {
        self.decade = Some((first, last));
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Check if no axis is filtered
    pub fn is_empty(&self) -> bool {
        self.decade.is_none() && self.genre.is_none() && self.country.is_none()
    }

    /// Check whether `station` passes every active axis
    pub fn matches(&self, station: &Station) -> bool {
        is_radio_fulfill_filters(station, self)
    }
}

/// Read the active filters of a host scope
pub fn extract_active_filters(scope: &dyn FilterScope) -> ActiveFilters {
    let first = scope
        .first_active(DECADE_FILTER)
        .and_then(|id| id.parse::<i32>().ok());
    let last = scope
        .last_active(DECADE_FILTER)
        .and_then(|id| id.parse::<i32>().ok());

    ActiveFilters {
        decade: first.zip(last),
        genre: active_option_ids(scope, GENRE_FILTER),
        country: active_option_ids(scope, COUNTRY_FILTER),
    }
}

fn active_option_ids(scope: &dyn FilterScope, filter: &str) -> Option<HashSet<String>> {
    let ids: HashSet<String> = scope
        .options(filter)
        .into_iter()
        .filter(|option| option.active)
        .map(|option| option.id)
        .collect();

    (!ids.is_empty()).then_some(ids)
}

/// Check one station against the filters
///
/// Axes are checked in order decade, genre, country, stopping at the first
/// failure. Stations without decades (or without genres) pass that axis.
pub fn is_radio_fulfill_filters(station: &Station, filters: &ActiveFilters) -> bool {
    if let Some((first, last)) = filters.decade {
        let decades = station.decades();
        if !decades.is_empty() && !decades.iter().any(|d| (first..=last).contains(d)) {
            return false;
        }
    }

    if let Some(genres) = &filters.genre {
        if !station.genres().iter().all(|genre| genres.contains(genre)) {
            return false;
        }
    }

    if let Some(countries) = &filters.country {
        if !countries.contains(station.country()) {
            return false;
        }
    }

    true
}

/// Keep the stations passing `filters`, in their original order
pub fn filter_radios<I, S>(stations: I, filters: Arc<ActiveFilters>) -> impl Iterator<Item = S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Station>,
{
    stations
        .into_iter()
        .filter(move |station| filters.matches(station.as_ref()))
}
