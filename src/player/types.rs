//! Player-facing small types: tracks, playback state and device events.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// One playlist entry. Immutable once the playlist is loaded; the list is
/// fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub source: TrackSource,
    /// Advisory length from the playlist document; the device's probed
    /// duration wins once the source is loaded.
    pub duration: Duration,
}

/// Where a track's audio comes from. Bare filenames in the playlist resolve
/// against the static music directory; absolute URLs are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    Local(PathBuf),
    Remote(String),
}

impl TrackSource {
    /// Resolve the raw `file` field of a playlist entry.
    ///
    /// `http(s)://`, `data:` and `blob:` prefixes mark a remote source used
    /// verbatim; anything else joins `music_dir`.
    pub fn resolve(file: &str, music_dir: &Path) -> Self {
        let lower = file.trim().to_ascii_lowercase();
        let remote = ["http://", "https://", "data:", "blob:"]
            .iter()
            .any(|p| lower.starts_with(p));

        if remote {
            TrackSource::Remote(file.trim().to_string())
        } else {
            TrackSource::Local(music_dir.join(file.trim()))
        }
    }
}

/// Snapshot of everything the UI needs to render the player.
///
/// Invariants: `current_index` stays within the track list whenever the list
/// is non-empty; a rejected play request never flips `is_playing` (only a
/// `Playing` device event does); `loading` and `is_playing` are reconciled
/// by the next device event after a source swap.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub muted: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 0.7,
            muted: false,
            loading: false,
            error: None,
        }
    }
}

/// Asynchronous notification from the audio device. The generation is the
/// value passed with the `load`/`play` request that caused it; the
/// controller drops events from superseded loads.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub generation: u64,
    pub kind: DeviceEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEventKind {
    /// A new source started loading.
    LoadStarted,
    /// The source is ready; `duration` is the probed (or advisory) length.
    MetadataLoaded { duration: Duration },
    /// Audio is audibly playing.
    Playing,
    /// Playback was paused.
    Paused,
    /// Periodic progress report while playing.
    PositionChanged(Duration),
    /// The current source played to its natural end.
    Ended,
    /// Loading or playback failed. Terminal for the current track.
    Error(String),
}

/// What to do when a track plays to its natural end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EndOfTrackPolicy {
    /// Seek back to zero and resume the same track.
    #[default]
    RestartCurrent,
    /// Move the cursor forward, wrapping only when playlist looping is on.
    AdvanceNext,
}

/// Controller construction options, mapped from `[player]` settings.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub loop_playlist: bool,
    pub end_of_track: EndOfTrackPolicy,
    pub volume: f32,
    pub autoplay: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            loop_playlist: true,
            end_of_track: EndOfTrackPolicy::RestartCurrent,
            volume: 0.7,
            autoplay: false,
        }
    }
}
