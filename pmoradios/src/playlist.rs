//! Playlist (PLS/M3U) parsing
//!
//! Stations often advertise a playlist instead of a direct stream. The
//! directory client fetches those playlists and expands them to the stream
//! URLs they list; see `OnlineRadioInfo::resolve_playlist`.

/// Playlist formats recognised from a URL extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    M3u,
    Pls,
}

impl PlaylistFormat {
    /// Detect the playlist format of `url` from its extension
    ///
    /// The check is case-insensitive and ignores a trailing query string.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split_once('?').map(|(path, _)| path).unwrap_or(url);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".m3u") {
            Some(PlaylistFormat::M3u)
        } else if lower.ends_with(".pls") {
            Some(PlaylistFormat::Pls)
        } else {
            None
        }
    }

    /// Extract every entry of a playlist body
    pub fn parse(&self, content: &str) -> Vec<String> {
        match self {
            PlaylistFormat::M3u => parse_m3u(content),
            PlaylistFormat::Pls => parse_pls(content),
        }
    }
}

/// Every non-empty, non-comment line of an M3U playlist
pub fn parse_m3u(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Values of the `FileN=` entries of a PLS playlist
pub fn parse_pls(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("File"))
        .filter_map(|line| line.split_once('='))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
