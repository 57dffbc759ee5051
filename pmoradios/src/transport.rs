//! HTTP transport used by the directory client
//!
//! The client only needs one thing from the network: "GET this URL and hand me
//! the decoded body". [`Transport`] is that seam. [`UreqTransport`] is the
//! blocking implementation used in production, [`MemoryTransport`] serves
//! canned bodies and records every requested URL (offline mode and tests).

use crate::error::ConnectionCause;
use encoding_rs::{Encoding, UTF_8};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Blocking "GET and decode" primitive
pub trait Transport: Send + Sync {
    /// Fetch `url` and return its body decoded to text
    fn get(&self, url: &str) -> Result<String, ConnectionCause>;
}

/// Transport backed by a [`ureq::Agent`]
pub struct UreqTransport {
    agent: Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<String, ConnectionCause> {
        // non-2xx statuses come back as ureq::Error::StatusCode
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;

        let charset = response.body().charset().map(str::to_string);
        debug!(
            url,
            status = response.status().as_u16(),
            charset = charset.as_deref().unwrap_or("utf-8"),
            "Directory response received"
        );

        let bytes = response.body_mut().read_to_vec()?;
        decode_body(&bytes, charset.as_deref())
    }
}

/// Decode `bytes` with the charset advertised by the server, UTF-8 when absent
/// or unknown
pub fn decode_body(bytes: &[u8], charset: Option<&str>) -> Result<String, ConnectionCause> {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConnectionCause::Decode(encoding.name()));
    }
    Ok(text.into_owned())
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Shared, append-only list of requested URLs
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    fn push(&self, url: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }

    /// All URLs requested so far, in order
    pub fn urls(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of requests issued so far
    pub fn count(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of requests whose URL starts with `prefix`
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }
}

/// In-memory transport answering from a fixed URL → body table
///
/// Unknown URLs answer with a 404 status.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: HashMap<String, String>,
    log: RequestLog,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn route(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.insert(url.into(), body.into());
        self
    }

    /// Handle on the request log, usable after the transport is moved into a client
    pub fn requests(&self) -> RequestLog {
        self.log.clone()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<String, ConnectionCause> {
        self.log.push(url);
        self.routes
            .get(url)
            .cloned()
            .ok_or(ConnectionCause::Status(404))
    }
}
