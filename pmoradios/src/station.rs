//! Station entity
//!
//! A [`Station`] is built from one directory record. Its taxonomy (genres and
//! decades) is parsed once at construction. Detail fields (city, description,
//! stream URLs, web link) need another request: they are loaded on the first
//! call to one of their accessors and kept for the lifetime of the station.

use crate::client::{ClientInner, OnlineRadioInfo};
use crate::error::{Error, Result};
use crate::models::{StationDetails, StationRecord};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

/// Picture hint used when the directory has no picture for a station
pub const PLACEHOLDER_PICTURE: &str = "audio-x-generic";

/// Attribute names accepted by [`Station::attribute`]
pub const ATTRIBUTE_NAMES: &[&str] = &[
    "id",
    "name",
    "picture_url",
    "genres",
    "decades",
    "current_track",
    "country",
    "rating",
    "city",
    "description",
    "stream_urls",
    "web_link",
];

/// Localized decade tokens: "Years 80s", "Années 90", "Jahre 70", "80er Jahre"
static DECADE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:years?|ann[ée]es?|jahre)\s+([0-9]{1,4})\s*(?:s|er)?|([0-9]{1,4})\s*(?:s|er)(?:\s+jahre)?)$",
    )
    .expect("decade pattern is a valid regex")
});

/// Full year of a decade token
///
/// Two digit tokens are read as 19xx from 20 upwards and 20xx below. Longer
/// tokens are already full years. Anything but ASCII digits is rejected.
pub fn normalize_decade(token: &str) -> Option<i32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = token.parse().ok()?;
    if token.len() > 2 {
        Some(value)
    } else if value < 20 {
        Some(2000 + value)
    } else {
        Some(1900 + value)
    }
}

/// Decade of a "genres and topics" token, if it is one
pub fn parse_decade(token: &str) -> Option<i32> {
    let captures = DECADE_RE.captures(token.trim())?;
    let digits = captures.get(1).or_else(|| captures.get(2))?;
    normalize_decade(digits.as_str())
}

/// Split a comma separated "genres and topics" field into genres and decades
///
/// Both lists keep the source order.
pub fn split_genres_and_decades(field: &str) -> (Vec<String>, Vec<i32>) {
    let mut genres = Vec::new();
    let mut decades = Vec::new();

    for token in field.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_decade(token) {
            Some(decade) => decades.push(decade),
            None => genres.push(token.to_string()),
        }
    }

    (genres, decades)
}

/// One radio station of the directory
pub struct Station {
    id: u64,
    name: String,
    picture_url: String,
    genres: Vec<String>,
    decades: Vec<i32>,
    current_track: String,
    country: String,
    rating: Option<f64>,
    details: Mutex<Option<StationDetails>>,
    client: Weak<ClientInner>,
}

impl Station {
    /// Build a station from a raw directory record
    ///
    /// Without a client, detail accessors fail with
    /// [`Error::DetailsUnavailable`].
    pub fn from_record(record: StationRecord, client: Option<&OnlineRadioInfo>) -> Self {
        let source = client.map(OnlineRadioInfo::downgrade).unwrap_or_default();
        Self::with_source(record, source)
    }

    pub(crate) fn with_source(record: StationRecord, client: Weak<ClientInner>) -> Self {
        let picture_url = match (record.picture_base_url, record.picture1_name) {
            (base, Some(file)) if !file.is_empty() => {
                format!("{}{}", base.unwrap_or_default(), file)
            }
            _ => PLACEHOLDER_PICTURE.to_string(),
        };

        let (genres, decades) =
            split_genres_and_decades(record.genres_and_topics.as_deref().unwrap_or(""));

        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            picture_url,
            genres,
            decades,
            current_track: record.current_track.unwrap_or_default(),
            country: record.country.unwrap_or_default(),
            rating: record.rating,
            details: Mutex::new(None),
            client,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Picture URL, or [`PLACEHOLDER_PICTURE`]
    pub fn picture_url(&self) -> &str {
        &self.picture_url
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Full years, in source order
    pub fn decades(&self) -> &[i32] {
        &self.decades
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Currently playing track
    ///
    /// Never triggers a request. Once details are loaded, their track (when
    /// present) replaces the one of the list record.
    pub fn current_track(&self) -> String {
        self.lock_details()
            .as_ref()
            .and_then(|details| details.current_track.clone())
            .unwrap_or_else(|| self.current_track.clone())
    }

    // ========================================================================
    // Lazy details
    // ========================================================================

    pub fn city(&self) -> Result<Option<String>> {
        self.with_details(|d| d.city.clone())
    }

    pub fn description(&self) -> Result<Option<String>> {
        self.with_details(|d| d.description.clone())
    }

    /// Playable stream URLs, empty when the station is not broadcasting
    pub fn stream_urls(&self) -> Result<Vec<String>> {
        self.with_details(|d| d.stream_urls.clone())
    }

    pub fn web_link(&self) -> Result<Option<String>> {
        self.with_details(|d| d.web_link.clone())
    }

    /// All detail fields at once
    pub fn details(&self) -> Result<StationDetails> {
        self.with_details(StationDetails::clone)
    }

    /// Check whether details were already fetched
    pub fn details_loaded(&self) -> bool {
        self.lock_details().is_some()
    }

    /// Fetch details again and replace every detail field
    pub fn refresh_details_attributes(&self) -> Result<()> {
        let mut slot = self.lock_details();
        let details = self.fetch_details()?;
        *slot = Some(details);
        Ok(())
    }

    /// Read an attribute by name
    ///
    /// Detail attributes go through the lazy loading accessors.
    pub fn attribute(&self, name: &str) -> Result<Value> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "picture_url" => Value::from(self.picture_url.as_str()),
            "genres" => Value::from(self.genres.clone()),
            "decades" => Value::from(self.decades.clone()),
            "current_track" => Value::from(self.current_track()),
            "country" => Value::from(self.country.as_str()),
            "rating" => self.rating.map(Value::from).unwrap_or(Value::Null),
            "city" => Value::from(self.city()?),
            "description" => Value::from(self.description()?),
            "stream_urls" => Value::from(self.stream_urls()?),
            "web_link" => Value::from(self.web_link()?),
            other => return Err(Error::attribute_not_found(other)),
        };
        Ok(value)
    }

    /// Run `f` on the details, fetching them first if needed
    ///
    /// The lock is held during the fetch so concurrent first reads share one
    /// request.
    fn with_details<T>(&self, f: impl FnOnce(&StationDetails) -> T) -> Result<T> {
        let mut slot = self.lock_details();
        let details = match slot.take() {
            Some(details) => slot.insert(details),
            None => slot.insert(self.fetch_details()?),
        };
        Ok(f(details))
    }

    fn fetch_details(&self) -> Result<StationDetails> {
        let client = self
            .client
            .upgrade()
            .map(OnlineRadioInfo::from_inner)
            .ok_or(Error::DetailsUnavailable(self.id))?;

        debug!(station = self.id, name = %self.name, "Loading station details");
        client.get_details_by_station_id(self.id)
    }

    fn lock_details(&self) -> MutexGuard<'_, Option<StationDetails>> {
        self.details.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Station")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("genres", &self.genres)
            .field("decades", &self.decades)
            .field("country", &self.country)
            .field("details_loaded", &self.details_loaded())
            .finish()
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
