//! HTTP client for the online radios directory (rad.io and its localized sites)
//!
//! This module translates directory operations into GET requests against a
//! single base URL, chosen once when the client is built.
//!
//! # Example
//!
//! ```no_run
//! use pmoradios::OnlineRadioInfo;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OnlineRadioInfo::builder().language("fr").build();
//!
//!     for station in client.get_recommended_stations()? {
//!         println!("{} - {}", station.name(), station.current_track());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{
    CategoryType, DetailsRecord, MostWantedLists, ResultCategory, StationDetails, StationRecord,
};
use crate::playlist::PlaylistFormat;
use crate::station::Station;
use crate::transport::{Transport, UreqTransport};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

/// Directory base URL per supported language
pub const MAIN_URLS: &[(&str, &str)] = &[
    ("at", "http://www.radio.at/"),
    ("de", "http://radio.de/info"),
    ("en", "http://rad.io/info"),
    ("fr", "http://radio.fr/info"),
];

/// Language used when none is given or detected
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOMusic/0.3.10 (pmoradios)";

/// Default number of rows requested by a text search
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 1000;

/// Default size of each most-wanted list
pub const DEFAULT_MOST_WANTED_SIZE: usize = 25;

const RECOMMENDED_PATH: &str = "broadcast/editorialreccomendationsembedded";
const CATEGORY_STATIONS_PATH: &str = "menu/broadcastsofcategory";
const MOST_WANTED_PATH: &str = "account/getmostwantedbroadcastlists";
const SEARCH_PATH: &str = "index/searchembeddedbroadcast";
const DETAILS_PATH: &str = "broadcast/getbroadcastembedded";
const CATEGORY_VALUES_PATH: &str = "menu/valuesofcategory";

/// Reserved category value listing the top stations
const TOP_CATEGORY: &str = "_top";

/// Environment variables consulted, in order, to detect the locale
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Base URL for a language code, falling back to the default language
pub fn base_url_for_language(language: &str) -> &'static str {
    lookup_base_url(language)
        .or_else(|| lookup_base_url(DEFAULT_LANGUAGE))
        .unwrap_or("http://rad.io/info")
}

fn lookup_base_url(language: &str) -> Option<&'static str> {
    MAIN_URLS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, url)| *url)
}

/// Extract the language part of a locale string ("fr_FR.UTF-8" → "fr")
pub fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale
        .split(['_', '.', '@'])
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if language.is_empty() {
        None
    } else {
        Some(language)
    }
}

/// Detect the process language from the locale environment
///
/// Only supported languages are returned.
pub fn detect_language() -> Option<String> {
    detect_language_with(|name| env::var(name).ok())
}

fn detect_language_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let locale = LOCALE_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())?;

    language_from_locale(&locale).filter(|language| lookup_base_url(language).is_some())
}

pub(crate) struct ClientInner {
    language: String,
    base_url: String,
    transport: Box<dyn Transport>,
}

/// Online radios directory client
///
/// Cheap to clone: clones share the same transport. Stations produced by the
/// client keep a weak handle on it to load their details lazily.
#[derive(Clone)]
pub struct OnlineRadioInfo {
    inner: Arc<ClientInner>,
}

impl OnlineRadioInfo {
    /// Create a client for the language detected from the process locale
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client for an explicit language code
    ///
    /// Unknown codes are kept as the client language but use the default URL.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self::builder().language(language).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ClientInner> {
        Arc::downgrade(&self.inner)
    }

    /// Language code the client was built with
    pub fn language(&self) -> &str {
        &self.inner.language
    }

    /// Base URL of every request
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Category types accepted by [`get_categories_by_category_type`](Self::get_categories_by_category_type)
    pub fn get_category_types(&self) -> &'static [CategoryType] {
        &CategoryType::ALL
    }

    // ========================================================================
    // Station lists
    // ========================================================================

    /// Editorial recommendations
    pub fn get_recommended_stations(&self) -> Result<Stations> {
        let records: Vec<StationRecord> = self.get_json(RECOMMENDED_PATH, &[])?;
        Ok(self.stations(records))
    }

    /// Top stations (the reserved `top` category)
    pub fn get_top_stations(&self) -> Result<Stations> {
        self.stations_of_category(TOP_CATEGORY, "")
    }

    /// Recommended, top and local stations in a single request
    ///
    /// Each list holds at most `limit` stations.
    pub fn get_most_wanted_stations(
        &self,
        limit: usize,
    ) -> Result<BTreeMap<ResultCategory, Stations>> {
        let limit = limit.to_string();
        let lists: MostWantedLists =
            self.get_json(MOST_WANTED_PATH, &[("sizeoflists", limit.as_str())])?;

        let mut result = BTreeMap::new();
        result.insert(
            ResultCategory::Recommended,
            self.stations(lists.recommended_broadcasts),
        );
        result.insert(ResultCategory::Top, self.stations(lists.top_broadcasts));
        result.insert(ResultCategory::Local, self.stations(lists.local_broadcasts));
        Ok(result)
    }

    /// Free text search, limited to `max_results` rows
    pub fn get_stations_by_searchstring(&self, query: &str, max_results: usize) -> Result<Stations> {
        let rows = max_results.to_string();
        let records: Vec<StationRecord> = self.get_json(
            SEARCH_PATH,
            &[("q", query), ("start", "0"), ("rows", rows.as_str())],
        )?;
        Ok(self.stations(records))
    }

    /// Valid values of one category axis (e.g. every genre)
    pub fn get_categories_by_category_type(&self, category_type: CategoryType) -> Result<Vec<String>> {
        let category = category_type.query_value();
        self.get_json(CATEGORY_VALUES_PATH, &[("category", category.as_str())])
    }

    /// Stations matching one category value
    pub fn get_stations_by_category(
        &self,
        category_type: CategoryType,
        value: &str,
    ) -> Result<Stations> {
        self.stations_of_category(&category_type.query_value(), value)
    }

    fn stations_of_category(&self, category: &str, value: &str) -> Result<Stations> {
        let records: Vec<StationRecord> = self.get_json(
            CATEGORY_STATIONS_PATH,
            &[("category", category), ("value", value)],
        )?;
        Ok(self.stations(records))
    }

    fn stations(&self, records: Vec<StationRecord>) -> Stations {
        Stations {
            records: records.into_iter(),
            client: self.downgrade(),
        }
    }

    // ========================================================================
    // Station details
    // ========================================================================

    /// Extended attributes of one station
    ///
    /// Returns empty details when the station is not broadcasting (no
    /// `streamURL` in the response). Playlist stream URLs are resolved.
    pub fn get_details_by_station_id(&self, id: u64) -> Result<StationDetails> {
        let id = id.to_string();
        let record: DetailsRecord = self.get_json(DETAILS_PATH, &[("broadcast", id.as_str())])?;

        let Some(stream_url) = record.stream_url else {
            debug!(station = %id, "No stream URL, station not broadcasting");
            return Ok(StationDetails::default());
        };

        Ok(StationDetails {
            city: record.city,
            current_track: record.current_track,
            description: record.description,
            stream_urls: self.resolve_playlist(&stream_url),
            web_link: record.link,
        })
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Expand a `.m3u`/`.pls` URL into the stream URLs it lists
    ///
    /// Never fails: any other URL, an unreachable playlist or an empty one
    /// yields `[url]`. Non-playlist URLs are not fetched.
    pub fn resolve_playlist(&self, url: &str) -> Vec<String> {
        let Some(format) = PlaylistFormat::from_url(url) else {
            return vec![url.to_string()];
        };

        match self.inner.transport.get(url) {
            Ok(content) => {
                let entries = format.parse(&content);
                if entries.is_empty() {
                    warn!(url, ?format, "Playlist has no entries, keeping its URL");
                    vec![url.to_string()]
                } else {
                    debug!(url, count = entries.len(), "Resolved playlist");
                    entries
                }
            }
            Err(e) => {
                warn!(url, error = %e, "Cannot fetch playlist, keeping its URL");
                vec![url.to_string()]
            }
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Full URL of `path` with GET-encoded `params` (in the given order)
    pub fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.inner.base_url.trim_end_matches('/'), path);
        if !params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// GET `path` and return the decoded body
    pub fn url_request(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = self.build_url(path, params);
        debug!(url = %url, "Directory request");
        self.inner
            .transport
            .get(&url)
            .map_err(|e| Error::connection(url, e))
    }

    /// GET `path` and parse the body as JSON
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let body = self.url_request(path, params)?;
        serde_json::from_str(&body).map_err(|e| Error::connection(self.build_url(path, params), e))
    }
}

impl Default for OnlineRadioInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OnlineRadioInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnlineRadioInfo, using lang: {}", self.inner.language)
    }
}

impl fmt::Debug for OnlineRadioInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnlineRadioInfo")
            .field("language", &self.inner.language)
            .field("base_url", &self.inner.base_url)
            .finish()
    }
}

/// Single-pass sequence of stations decoded from one response
///
/// Records are turned into [`Station`]s as the iterator advances.
pub struct Stations {
    records: std::vec::IntoIter<StationRecord>,
    client: Weak<ClientInner>,
}

impl Iterator for Stations {
    type Item = Station;

    fn next(&mut self) -> Option<Station> {
        self.records
            .next()
            .map(|record| Station::with_source(record, self.client.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Stations {}

impl fmt::Debug for Stations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stations")
            .field("remaining", &self.records.len())
            .finish()
    }
}

/// Builder for configuring an [`OnlineRadioInfo`]
pub struct ClientBuilder {
    language: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    user_agent: String,
    transport: Option<Box<dyn Transport>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            language: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit language code (overrides locale detection)
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Use another base URL (mirror, test server) whatever the language
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a custom transport instead of the ureq one
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Build the client
    pub fn build(self) -> OnlineRadioInfo {
        let language = self
            .language
            .filter(|l| !l.is_empty())
            .or_else(detect_language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let base_url = self
            .base_url
            .unwrap_or_else(|| base_url_for_language(&language).to_string());

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(UreqTransport::new(self.timeout, self.user_agent)),
        };

        debug!(language = %language, base_url = %base_url, "Radio directory client ready");

        OnlineRadioInfo {
            inner: Arc::new(ClientInner {
                language,
                base_url,
                transport,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectionCause;
    use crate::transport::MemoryTransport;

    fn client(transport: MemoryTransport) -> OnlineRadioInfo {
        OnlineRadioInfo::builder()
            .language("en")
            .transport(transport)
            .build()
    }

    // ========================================================================
    // Language selection
    // ========================================================================

    #[test]
    fn test_manual_language() {
        let client = client(MemoryTransport::new());
        assert_eq!(client.language(), "en");
        assert_eq!(client.base_url(), "http://rad.io/info");

        let fr = OnlineRadioInfo::builder()
            .language("fr")
            .transport(MemoryTransport::new())
            .build();
        assert_eq!(fr.base_url(), "http://radio.fr/info");
    }

    #[test]
    fn test_manual_unsupported_language() {
        let client = OnlineRadioInfo::builder()
            .language("klingon")
            .transport(MemoryTransport::new())
            .build();
        assert_eq!(client.language(), "klingon");
        assert_eq!(client.base_url(), base_url_for_language("en"));
        assert_eq!(client.to_string(), "OnlineRadioInfo, using lang: klingon");
    }

    #[test]
    fn test_language_from_locale() {
        assert_eq!(language_from_locale("fr_FR.UTF-8"), Some("fr".to_string()));
        assert_eq!(language_from_locale("de_DE@euro"), Some("de".to_string()));
        assert_eq!(language_from_locale("en"), Some("en".to_string()));
        assert_eq!(language_from_locale(""), None);
    }

    #[test]
    fn test_detect_language_order() {
        let detected = detect_language_with(|name| match name {
            "LC_ALL" => Some(String::new()),
            "LC_MESSAGES" => Some("de_AT.UTF-8".to_string()),
            "LANG" => Some("fr_FR.UTF-8".to_string()),
            _ => None,
        });
        assert_eq!(detected, Some("de".to_string()));

        let detected = detect_language_with(|name| match name {
            "LANG" => Some("fr_FR.UTF-8".to_string()),
            _ => None,
        });
        assert_eq!(detected, Some("fr".to_string()));
    }

    #[test]
    fn test_detect_invalid_locale() {
        assert_eq!(
            detect_language_with(|name| (name == "LANG").then(|| "D".to_string())),
            None
        );
        assert_eq!(
            detect_language_with(|name| (name == "LANG").then(|| "C".to_string())),
            None
        );
        assert_eq!(detect_language_with(|_| None), None);
    }

    #[test]
    fn test_base_url_for_language() {
        assert_eq!(base_url_for_language("at"), "http://www.radio.at/");
        assert_eq!(base_url_for_language("de"), "http://radio.de/info");
        assert_eq!(base_url_for_language("xx"), "http://rad.io/info");
    }

    // ========================================================================
    // Requests
    // ========================================================================

    #[test]
    fn test_url_without_parameters() {
        let client = client(MemoryTransport::new());
        assert_eq!(client.build_url("foo/bar", &[]), "http://rad.io/info/foo/bar");
    }

    #[test]
    fn test_url_parameters_keep_order_and_are_encoded() {
        let client = client(MemoryTransport::new());
        assert_eq!(
            client.build_url("foo/bar", &[("bill", "de"), ("baz", "france")]),
            "http://rad.io/info/foo/bar?bill=de&baz=france"
        );
        assert_eq!(
            client.build_url("foo", &[("q", "rock & roll"), ("value", "")]),
            "http://rad.io/info/foo?q=rock+%26+roll&value="
        );
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let client = OnlineRadioInfo::builder()
            .language("at")
            .transport(MemoryTransport::new())
            .build();
        assert_eq!(client.build_url("foo", &[]), "http://www.radio.at/foo");
    }

    #[test]
    fn test_getting_json_results() {
        let transport = MemoryTransport::new().route(
            "http://rad.io/info/foo/bar?bill=de&baz=france",
            r#"{"foo": [{"bar":"baz"}]}"#,
        );
        let log = transport.requests();
        let client = client(transport);

        let value: serde_json::Value = client
            .get_json("foo/bar", &[("bill", "de"), ("baz", "france")])
            .unwrap();
        assert_eq!(value, serde_json::json!({"foo": [{"bar": "baz"}]}));
        assert_eq!(log.count(), 1);
    }

    #[test]
    fn test_http_error_is_connection_error() {
        let client = client(MemoryTransport::new());
        let err = client.url_request("foo/bar", &[("baz", "france")]).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection {
                source: ConnectionCause::Status(404),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_json_is_connection_error() {
        let transport = MemoryTransport::new().route(
            "http://rad.io/info/foo/bar",
            r#"{"foo": [{"bar":"baz"}] extraword}"#,
        );
        let client = client(transport);
        let err = client
            .get_json::<serde_json::Value>("foo/bar", &[])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Connection {
                source: ConnectionCause::Json(_),
                ..
            }
        ));
    }

    #[test]
    fn test_category_types() {
        let client = client(MemoryTransport::new());
        let names: Vec<&str> = client
            .get_category_types()
            .iter()
            .map(CategoryType::as_str)
            .collect();
        assert_eq!(names, vec!["genre", "topic", "country", "city", "language"]);
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    #[test]
    fn test_no_request_for_nonplaylist() {
        let transport = MemoryTransport::new();
        let log = transport.requests();
        let client = client(transport);

        assert_eq!(client.resolve_playlist("http://foo.net"), vec!["http://foo.net"]);
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_unreachable_playlist_is_kept() {
        let transport = MemoryTransport::new();
        let log = transport.requests();
        let client = client(transport);

        assert_eq!(
            client.resolve_playlist("http://foo.net/radio.pls"),
            vec!["http://foo.net/radio.pls"]
        );
        assert_eq!(log.count(), 1);
    }

    // ========================================================================
    // Integration Tests (real API calls)
    //
    // Run with: cargo test -p pmoradios -- --ignored
    // ========================================================================

    #[test]
    #[ignore = "Integration test - calls real rad.io API"]
    fn test_live_recommended_stations() {
        let client = OnlineRadioInfo::with_language("en");
        let stations: Vec<Station> = client
            .get_recommended_stations()
            .expect("Failed to get recommended stations")
            .collect();
        assert!(!stations.is_empty(), "Expected recommended stations");
        for station in &stations {
            println!("{} - {}", station.id(), station.name());
        }
    }

    #[test]
    #[ignore = "Integration test - calls real rad.io API"]
    fn test_live_genres() {
        let client = OnlineRadioInfo::with_language("en");
        let genres = client
            .get_categories_by_category_type(CategoryType::Genre)
            .expect("Failed to get genres");
        assert!(!genres.is_empty());
    }
}
