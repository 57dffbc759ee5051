//! Extension integrating the radios directory into pmoconfig
//!
//! This module provides the `RadiosConfigExt` trait, adding the settings of
//! the directory client and the search handler to `pmoconfig::Config`:
//!
//! - Directory language and base URL override
//! - Request timeout
//! - Size of the most-wanted lists and of text searches
//!
//! # Example
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoradios::{OnlineRadioInfo, RadioHandler, RadiosConfigExt};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! config.set_radios_language(Some("fr"))?;
//!
//! let client = OnlineRadioInfo::from_config(&config)?;
//! let handler = RadioHandler::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

use crate::client::{
    OnlineRadioInfo, DEFAULT_MOST_WANTED_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SEARCH_MAX_RESULTS,
};
use crate::handler::RadioHandler;
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::{Number, Value};
use std::time::Duration;

const LANGUAGE_PATH: &[&str] = &["sources", "radios", "language"];
const BASE_URL_PATH: &[&str] = &["sources", "radios", "base_url"];
const TIMEOUT_PATH: &[&str] = &["sources", "radios", "timeout_secs"];
const MOST_WANTED_SIZE_PATH: &[&str] = &["sources", "radios", "most_wanted_size"];
const SEARCH_MAX_RESULTS_PATH: &[&str] = &["sources", "radios", "search_max_results"];

/// Extension trait for the radios settings of `pmoconfig::Config`
///
/// Numeric getters persist their default value when the setting is missing.
pub trait RadiosConfigExt {
    /// Directory language (`None` = detect from the locale)
    fn get_radios_language(&self) -> Option<String>;

    fn set_radios_language(&self, language: Option<&str>) -> Result<()>;

    /// Base URL override (`None` = URL of the language)
    fn get_radios_base_url(&self) -> Option<String>;

    fn set_radios_base_url(&self, url: Option<&str>) -> Result<()>;

    /// HTTP timeout in seconds (default: 30)
    fn get_radios_timeout_secs(&self) -> Result<u64>;

    fn set_radios_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Size of each most-wanted list (default: 25)
    fn get_radios_most_wanted_size(&self) -> Result<usize>;

    fn set_radios_most_wanted_size(&self, size: usize) -> Result<()>;

    /// Maximum rows of a text search (default: 1000)
    fn get_radios_search_max_results(&self) -> Result<usize>;

    fn set_radios_search_max_results(&self, rows: usize) -> Result<()>;
}

impl RadiosConfigExt for Config {
    fn get_radios_language(&self) -> Option<String> {
        self.get_string(LANGUAGE_PATH)
    }

    fn set_radios_language(&self, language: Option<&str>) -> Result<()> {
        self.set_value(LANGUAGE_PATH, optional_string(language))
    }

    fn get_radios_base_url(&self) -> Option<String> {
        self.get_string(BASE_URL_PATH)
    }

    fn set_radios_base_url(&self, url: Option<&str>) -> Result<()> {
        self.set_value(BASE_URL_PATH, optional_string(url))
    }

    fn get_radios_timeout_secs(&self) -> Result<u64> {
        get_or_persist(self, TIMEOUT_PATH, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn set_radios_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_u64(TIMEOUT_PATH, secs)
    }

    fn get_radios_most_wanted_size(&self) -> Result<usize> {
        let size = get_or_persist(self, MOST_WANTED_SIZE_PATH, DEFAULT_MOST_WANTED_SIZE as u64)?;
        Ok(size as usize)
    }

    fn set_radios_most_wanted_size(&self, size: usize) -> Result<()> {
        self.set_u64(MOST_WANTED_SIZE_PATH, size as u64)
    }

    fn get_radios_search_max_results(&self) -> Result<usize> {
        let rows = get_or_persist(
            self,
            SEARCH_MAX_RESULTS_PATH,
            DEFAULT_SEARCH_MAX_RESULTS as u64,
        )?;
        Ok(rows as usize)
    }

    fn set_radios_search_max_results(&self, rows: usize) -> Result<()> {
        self.set_u64(SEARCH_MAX_RESULTS_PATH, rows as u64)
    }
}

fn optional_string(value: Option<&str>) -> Value {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| Value::String(v.trim().to_string()))
        .unwrap_or(Value::Null)
}

fn get_or_persist(config: &Config, path: &[&str], default: u64) -> Result<u64> {
    if let Ok(Value::Number(n)) = config.get_value(path) {
        if let Some(value) = n.as_u64() {
            return Ok(value);
        }
    }
    config.set_value(path, Value::Number(Number::from(default)))?;
    Ok(default)
}

impl OnlineRadioInfo {
    /// Create a client from the `sources.radios` settings
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let mut builder = OnlineRadioInfo::builder()
            .timeout(Duration::from_secs(config.get_radios_timeout_secs()?));

        if let Some(language) = config.get_radios_language() {
            builder = builder.language(language);
        }
        if let Some(url) = config.get_radios_base_url() {
            builder = builder.base_url(url);
        }

        Ok(builder.build())
    }
}

impl RadioHandler {
    /// Create a handler, and its client, from the `sources.radios` settings
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let client = OnlineRadioInfo::from_config(config)?;
        Ok(RadioHandler::with_limits(
            client,
            config.get_radios_most_wanted_size()?,
            config.get_radios_search_max_results()?,
        ))
    }
}
