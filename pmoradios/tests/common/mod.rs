//! Shared fixtures for the integration tests

#![allow(dead_code)]

use pmoradios::{MemoryTransport, OnlineRadioInfo, RequestLog};
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

pub const BASE_URL: &str = "http://rad.io/info";

/// Content of `tests/data/<name>`
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {}", path.display(), e))
}

/// Full directory URL of `path_and_query`
pub fn url(path_and_query: &str) -> String {
    format!("{}/{}", BASE_URL, path_and_query)
}

/// Transport serving every fixture at its directory URL
pub fn directory_transport() -> MemoryTransport {
    MemoryTransport::new()
        .route(
            url("broadcast/editorialreccomendationsembedded"),
            fixture("recommended_stations.json"),
        )
        .route(
            url("menu/broadcastsofcategory?category=_top&value="),
            fixture("top_stations.json"),
        )
        .route(
            url("account/getmostwantedbroadcastlists?sizeoflists=2"),
            fixture("mostwanted_stations.json"),
        )
        .route(
            url("account/getmostwantedbroadcastlists?sizeoflists=25"),
            fixture("mostwanted_stations.json"),
        )
        .route(
            url("index/searchembeddedbroadcast?q=jazz&start=0&rows=1000"),
            fixture("radios_by_search.json"),
        )
        .route(
            url("index/searchembeddedbroadcast?q=jazz&start=0&rows=42"),
            fixture("radios_by_search.json"),
        )
        .route(
            url("menu/broadcastsofcategory?category=_genre&value=Blues"),
            fixture("radios_filtered_blues.json"),
        )
        .route(
            url("menu/valuesofcategory?category=_genre"),
            fixture("availablecategory_per_genre.json"),
        )
        .route(
            url("menu/valuesofcategory?category=_country"),
            fixture("availablecategory_per_country.json"),
        )
        .route(
            url("broadcast/getbroadcastembedded?broadcast=2511"),
            fixture("radio_by_id2511.json"),
        )
        .route(
            url("broadcast/getbroadcastembedded?broadcast=1417"),
            fixture("radio_by_id1417.json"),
        )
        .route(
            url("broadcast/getbroadcastembedded?broadcast=3803"),
            fixture("radio_by_id3803.json"),
        )
        .route("http://awesome.net/oldies.pls", fixture("valid.pls"))
        .route("http://awesome.net/radio.m3u", fixture("valid.m3u"))
        .route("http://awesome.net/radio.pls", fixture("valid.pls"))
        .route("http://awesome.net/invalid.m3u", fixture("invalid.m3u"))
        .route("http://awesome.net/invalid.pls", fixture("invalid.pls"))
}

/// English client over the fixture transport, and its request log
pub fn directory() -> (OnlineRadioInfo, RequestLog) {
    let transport = directory_transport();
    let log = transport.requests();
    let client = OnlineRadioInfo::builder()
        .language("en")
        .transport(transport)
        .build();
    (client, log)
}

/// Answer a single HTTP request on a local port with `content_type` and `body`
///
/// Returns the server base URL.
pub fn serve_once(status: &str, content_type: &str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
    });

    format!("http://{}", address)
}
