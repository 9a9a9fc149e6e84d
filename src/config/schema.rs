use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/linkfolio/config.toml` or
/// `~/.config/linkfolio/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LINKFOLIO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub analytics: AnalyticsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
            player: PlayerSettings::default(),
            ui: UiSettings::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Path to the profile document (profile, links, social media, settings).
    pub profile_path: PathBuf,
    /// Path to the playlist document consumed by the music player.
    pub playlist_path: PathBuf,
    /// Base directory for bare track filenames. Absolute URLs bypass it.
    pub music_dir: PathBuf,
    /// Directory for the persisted analytics blob.
    /// Defaults to the XDG data dir (`~/.local/share/linkfolio`).
    pub storage_dir: Option<PathBuf>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            profile_path: PathBuf::from("data.json"),
            playlist_path: PathBuf::from("music/playlist.json"),
            music_dir: PathBuf::from("music"),
            storage_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Whether `next` past the last track wraps to the first one.
    /// When false, playback stops at the end of the playlist.
    pub loop_playlist: bool,
    /// What happens when a track plays to its natural end.
    pub end_of_track: EndOfTrackSetting,
    /// Initial volume, in `[0, 1]`.
    pub volume: f32,
    /// Whether switching tracks starts playback without an explicit play.
    pub autoplay: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            loop_playlist: true,
            end_of_track: EndOfTrackSetting::RestartCurrent,
            volume: 0.7,
            autoplay: false,
        }
    }
}

/// End-of-track behavior. `restart-current` replays the finished track from
/// the start; `advance-next` moves the cursor forward (wrapping only when
/// `loop_playlist` is on).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndOfTrackSetting {
    #[serde(alias = "restart", alias = "restart_current", alias = "repeat-one")]
    RestartCurrent,
    #[serde(alias = "advance", alias = "advance_next", alias = "next")]
    AdvanceNext,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Color theme used by the TUI.
    pub theme: ThemeSetting,
    /// Interface language.
    pub language: LanguageSetting,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSetting::Dark,
            language: LanguageSetting::En,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeSetting {
    Light,
    Dark,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageSetting {
    En,
    Vi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Whether link activations are recorded. When disabled the store is
    /// kept in memory only and nothing is persisted.
    pub enabled: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
