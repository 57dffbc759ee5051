//! Data models for the radio directory API responses
//!
//! This module contains the raw structures deserialized from the directory
//! (one JSON object per station, the most-wanted lists, station details)
//! and the small enums shared by the client and the result handler.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Raw API records
// ============================================================================

/// One station record as returned by the list endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Numeric station id
    pub id: u64,
    pub name: Option<String>,
    /// Base URL of the station pictures
    #[serde(rename = "pictureBaseURL")]
    pub picture_base_url: Option<String>,
    /// Picture file name, appended to `picture_base_url`
    #[serde(rename = "picture1Name")]
    pub picture1_name: Option<String>,
    /// Comma separated genres, topics and decades ("Rock, Years 80s")
    pub genres_and_topics: Option<String>,
    pub current_track: Option<String>,
    pub country: Option<String>,
    pub rating: Option<f64>,
}

/// Response of `account/getmostwantedbroadcastlists`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostWantedLists {
    #[serde(default)]
    pub recommended_broadcasts: Vec<StationRecord>,
    #[serde(default)]
    pub top_broadcasts: Vec<StationRecord>,
    #[serde(default)]
    pub local_broadcasts: Vec<StationRecord>,
}

/// Response of `broadcast/getbroadcastembedded`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRecord {
    /// Missing when the station is not currently broadcasting
    #[serde(rename = "streamURL")]
    pub stream_url: Option<String>,
    pub city: Option<String>,
    pub current_track: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

// ============================================================================
// Station details
// ============================================================================

/// Extended station attributes, loaded by a separate request
///
/// `StationDetails::default()` means "no current broadcast data".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationDetails {
    pub city: Option<String>,
    pub current_track: Option<String>,
    pub description: Option<String>,
    /// Playable stream URLs (playlists already resolved)
    pub stream_urls: Vec<String>,
    pub web_link: Option<String>,
}

impl StationDetails {
    /// Check if the directory returned no broadcast data
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// Category axes
// ============================================================================

/// Category axes the directory can enumerate and filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Genre,
    Topic,
    Country,
    City,
    Language,
}

impl CategoryType {
    /// Every valid category type, in API order
    pub const ALL: [CategoryType; 5] = [
        CategoryType::Genre,
        CategoryType::Topic,
        CategoryType::Country,
        CategoryType::City,
        CategoryType::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Genre => "genre",
            CategoryType::Topic => "topic",
            CategoryType::Country => "country",
            CategoryType::City => "city",
            CategoryType::Language => "language",
        }
    }

    /// Value of the `category` query parameter ("_genre", ...)
    pub fn query_value(&self) -> String {
        format!("_{}", self.as_str())
    }

    /// Parse a category type name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Result categories
// ============================================================================

/// Result groups shown by the lens
///
/// The discriminant is the numeric category tag expected by the host model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCategory {
    Recommended = 0,
    Top = 1,
    Local = 2,
    Search = 3,
}

impl ResultCategory {
    pub const ALL: [ResultCategory; 4] = [
        ResultCategory::Recommended,
        ResultCategory::Top,
        ResultCategory::Local,
        ResultCategory::Search,
    ];

    /// Category name as used in result mappings
    pub fn name(&self) -> &'static str {
        match self {
            ResultCategory::Recommended => "recommended",
            ResultCategory::Top => "top",
            ResultCategory::Local => "local",
            ResultCategory::Search => "search",
        }
    }

    /// Numeric tag of the host category
    pub fn tag(&self) -> u32 {
        *self as u32
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
