//! Online radios directory client for PMOMusic
//!
//! This crate queries the rad.io family of radio directories (rad.io,
//! radio.de, radio.fr, radio.at) and turns the answers into search results
//! with client side filtering by decade, genre and country.
//!
//! # Features
//!
//! - **Directory Client**: recommended, top, local and most-wanted stations,
//!   text search, category browsing and station details
//! - **Lazy Details**: city, description, stream URLs and web link are
//!   fetched once, on first access
//! - **Playlist Resolution**: `.m3u`/`.pls` stream URLs are expanded to the
//!   streams they list
//! - **Search Handler**: caches the last unfiltered result set and applies
//!   the host filters on every call
//! - **Configuration Extension**: language, timeout and list sizes from
//!   pmoconfig
//!
//! # Example
//!
//! ```no_run
//! use pmoradios::{OnlineRadioInfo, RadioHandler, StaticFilterScope};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OnlineRadioInfo::with_language("fr");
//!     let mut handler = RadioHandler::new(client);
//!
//!     let scope = StaticFilterScope::new();
//!     for (station, row) in handler.get_model_data_from_content_search("jazz", &scope)? {
//!         println!("[{}] {} - {}", row.category, row.title, row.comment);
//!         println!("    streams: {:?}", station.stream_urls()?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration Extension
//!
//! When the `pmoconfig` feature is enabled (default), clients and handlers can
//! be built from the `sources.radios` settings:
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoradios::{RadioHandler, RadiosConfigExt};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! config.set_radios_most_wanted_size(10)?;
//!
//! let handler = RadioHandler::from_config(&config)?;
//! println!("{}", handler.client());
//! # Ok(())
//! # }
//! ```
//!
//! # Blocking I/O
//!
//! Every remote call is a single blocking GET with the client timeout, with
//! no retry. Callers wanting a responsive UI run searches on a worker thread.

pub mod client;
pub mod error;
pub mod filters;
pub mod handler;
pub mod models;
pub mod playlist;
pub mod station;
pub mod transport;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

// Re-exports
pub use client::{detect_language, ClientBuilder, OnlineRadioInfo, Stations};
pub use error::{ConnectionCause, Error, Result};
pub use filters::{
    extract_active_filters, filter_radios, is_radio_fulfill_filters, ActiveFilters,
    FilterDefinition, FilterKind, FilterOption, FilterScope, StaticFilterScope,
};
pub use handler::{CategoryDefinition, RadioHandler, ResultRow};
pub use models::{CategoryType, ResultCategory, StationDetails, StationRecord};
pub use playlist::PlaylistFormat;
pub use station::{Station, PLACEHOLDER_PICTURE};
pub use transport::{MemoryTransport, RequestLog, Transport, UreqTransport};

#[cfg(feature = "pmoconfig")]
pub use config_ext::RadiosConfigExt;
