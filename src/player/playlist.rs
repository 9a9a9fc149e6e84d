//! Playlist document loading and normalization.
//!
//! Shape: `{ "tracks": [ { id?, title?, artist?, file, duration? }, .. ] }`.
//! Missing fields get positional defaults so a sparse document still renders.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::profile::DataError;

use super::types::{Track, TrackSource};

#[derive(Debug, Deserialize)]
struct PlaylistDoc {
    #[serde(default)]
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: Option<String>,
    title: Option<String>,
    artist: Option<String>,
    file: String,
    /// Kept as a raw value: non-numeric durations collapse to 0 instead of
    /// failing the whole document.
    #[serde(default)]
    duration: serde_json::Value,
}

/// Read and normalize the playlist document at `path`.
pub fn load_playlist(path: &Path, music_dir: &Path) -> Result<Vec<Track>, DataError> {
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_playlist(&raw, music_dir).map_err(|source| match source {
        ParseFailure::Json(source) => DataError::Parse {
            path: path.display().to_string(),
            source,
        },
        ParseFailure::Empty => DataError::EmptyPlaylist,
    })
}

pub(crate) enum ParseFailure {
    Json(serde_json::Error),
    Empty,
}

/// Parse a playlist document from memory. Split out so the normalization
/// rules are testable without touching the filesystem.
pub(crate) fn parse_playlist(raw: &str, music_dir: &Path) -> Result<Vec<Track>, ParseFailure> {
    let doc: PlaylistDoc = serde_json::from_str(raw).map_err(ParseFailure::Json)?;

    if doc.tracks.is_empty() {
        return Err(ParseFailure::Empty);
    }

    Ok(doc
        .tracks
        .into_iter()
        .enumerate()
        .map(|(i, raw)| normalize(raw, i, music_dir))
        .collect())
}

fn normalize(raw: RawTrack, index: usize, music_dir: &Path) -> Track {
    let n = index + 1;

    let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let duration_secs = raw.duration.as_f64().filter(|d| d.is_finite() && *d >= 0.0);

    Track {
        id: non_empty(raw.id).unwrap_or_else(|| format!("track-{n}")),
        title: non_empty(raw.title).unwrap_or_else(|| format!("Track {n}")),
        artist: non_empty(raw.artist).unwrap_or_else(|| "Unknown Artist".to_string()),
        source: TrackSource::resolve(&raw.file, music_dir),
        duration: Duration::from_secs_f64(duration_secs.unwrap_or(0.0)),
    }
}
