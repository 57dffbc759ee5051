//! Search coordinator
//!
//! [`RadioHandler`] turns a search string and the host filter state into
//! result rows. The unfiltered results of the last search are cached, so
//! changing filters never hits the network; only a new search string does.

use crate::client::{OnlineRadioInfo, DEFAULT_MOST_WANTED_SIZE, DEFAULT_SEARCH_MAX_RESULTS};
use crate::error::Result;
use crate::filters::{
    extract_active_filters, filter_radios, FilterDefinition, FilterScope, COUNTRY_FILTER,
    GENRE_FILTER,
};
use crate::models::{CategoryType, ResultCategory};
use crate::station::Station;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// MIME type of every result row
pub const RESULT_MIME_TYPE: &str = "text/html";

/// Renderer of every result category
pub const CATEGORY_RENDERER: &str = "tile-horizontal";

/// One row of the host result model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    /// Station id
    pub uri: String,
    /// Picture URL (or placeholder)
    pub icon_hint: String,
    pub category: u32,
    pub mime_type: String,
    /// Station name
    pub title: String,
    /// Current track
    pub comment: String,
    pub dnd_uri: String,
}

impl ResultRow {
    pub fn for_station(station: &Station, category: ResultCategory) -> Self {
        Self {
            uri: station.id().to_string(),
            icon_hint: station.picture_url().to_string(),
            category: category.tag(),
            mime_type: RESULT_MIME_TYPE.to_string(),
            title: station.name().to_string(),
            comment: station.current_track(),
            dnd_uri: String::new(),
        }
    }

    /// Fields in host model column order
    pub fn into_tuple(self) -> (String, String, u32, String, String, String, String) {
        (
            self.uri,
            self.icon_hint,
            self.category,
            self.mime_type,
            self.title,
            self.comment,
            self.dnd_uri,
        )
    }
}

/// Result category published to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDefinition {
    pub category: ResultCategory,
    pub name: &'static str,
    pub icon: &'static str,
    pub renderer: &'static str,
}

impl CategoryDefinition {
    pub fn tag(&self) -> u32 {
        self.category.tag()
    }
}

/// Cached search results, grouped by category
pub type CachedResults = BTreeMap<ResultCategory, Vec<Arc<Station>>>;

/// Search coordinator holding the last unfiltered results
#[derive(Debug)]
pub struct RadioHandler {
    client: OnlineRadioInfo,
    most_wanted_size: usize,
    search_max_results: usize,
    last_search: Option<String>,
    last_results: CachedResults,
}

impl RadioHandler {
    pub fn new(client: OnlineRadioInfo) -> Self {
        Self::with_limits(client, DEFAULT_MOST_WANTED_SIZE, DEFAULT_SEARCH_MAX_RESULTS)
    }

    /// Create a handler with explicit list sizes
    ///
    /// `most_wanted_size` caps each default list, `search_max_results` caps
    /// text searches.
    pub fn with_limits(
        client: OnlineRadioInfo,
        most_wanted_size: usize,
        search_max_results: usize,
    ) -> Self {
        Self {
            client,
            most_wanted_size,
            search_max_results,
            last_search: None,
            last_results: BTreeMap::new(),
        }
    }

    pub fn client(&self) -> &OnlineRadioInfo {
        &self.client
    }

    /// Search string of the cached results, `None` before the first search
    pub fn last_search(&self) -> Option<&str> {
        self.last_search.as_deref()
    }

    pub fn cached_results(&self) -> &CachedResults {
        &self.last_results
    }

    /// Forget the cached results; the next search fetches again
    pub fn clear_cache(&mut self) {
        self.last_search = None;
        self.last_results.clear();
    }

    /// Stations and result rows for `search_terms`, filtered by the scope
    ///
    /// An empty search shows the most-wanted lists. The network is only hit
    /// when `search_terms` differs from the previous call. A failed fetch
    /// leaves the previous cache untouched.
    pub fn get_model_data_from_content_search<'a>(
        &'a mut self,
        search_terms: &str,
        scope: &dyn FilterScope,
    ) -> Result<impl Iterator<Item = (Arc<Station>, ResultRow)> + 'a> {
        if self.last_search.as_deref() != Some(search_terms) {
            let results = self.fetch(search_terms)?;
            self.last_results = results;
            self.last_search = Some(search_terms.to_string());
        } else {
            debug!(search = search_terms, "Using cached results");
        }

        let filters = Arc::new(extract_active_filters(scope));
        debug!(?filters, "Active filters");

        Ok(self
            .last_results
            .iter()
            .flat_map(move |(category, stations)| {
                let category = *category;
                filter_radios(stations.iter(), Arc::clone(&filters)).map(move |station| {
                    let row = ResultRow::for_station(station, category);
                    (Arc::clone(station), row)
                })
            }))
    }

    fn fetch(&self, search_terms: &str) -> Result<CachedResults> {
        let results: CachedResults = if search_terms.is_empty() {
            self.client
                .get_most_wanted_stations(self.most_wanted_size)?
                .into_iter()
                .map(|(category, stations)| (category, stations.map(Arc::new).collect()))
                .collect()
        } else {
            let stations = self
                .client
                .get_stations_by_searchstring(search_terms, self.search_max_results)?
                .map(Arc::new)
                .collect();
            BTreeMap::from([(ResultCategory::Search, stations)])
        };

        info!(
            search = search_terms,
            stations = results.values().map(Vec::len).sum::<usize>(),
            "Fetched radio results"
        );
        Ok(results)
    }

    /// Decade, genre and country filters for the host
    ///
    /// Genre and country options come from the directory (two requests).
    pub fn filter_definitions(&self) -> Result<Vec<FilterDefinition>> {
        let genres = self
            .client
            .get_categories_by_category_type(CategoryType::Genre)?;
        let countries = self
            .client
            .get_categories_by_category_type(CategoryType::Country)?;

        Ok(vec![
            FilterDefinition::decades(),
            FilterDefinition::check_options(GENRE_FILTER, "Genre", genres),
            FilterDefinition::check_options(COUNTRY_FILTER, "Country", countries),
        ])
    }

    /// Result categories for the host, in tag order
    pub fn category_definitions() -> Vec<CategoryDefinition> {
        ResultCategory::ALL
            .into_iter()
            .map(|category| {
                let (name, icon) = match category {
                    ResultCategory::Recommended => ("Recommended", "emblem-favorite"),
                    ResultCategory::Top => ("Top", "go-top"),
                    ResultCategory::Local => ("Local", "go-home"),
                    ResultCategory::Search => ("Search results", "edit-find"),
                };
                CategoryDefinition {
                    category,
                    name,
                    icon,
                    renderer: CATEGORY_RENDERER,
                }
            })
            .collect()
    }
}
