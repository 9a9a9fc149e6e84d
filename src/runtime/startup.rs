use tracing::warn;

use crate::analytics::{AnalyticsStore, FileStorage, MemoryStorage, Storage};
use crate::app::{App, Theme};
use crate::config::{EndOfTrackSetting, LanguageSetting, Settings, ThemeSetting};
use crate::i18n::Lang;
use crate::player::{
    EndOfTrackPolicy, PlayerController, PlayerOptions, RodioDevice, load_playlist,
};
use crate::profile::load_profile;

pub fn theme(settings: &Settings) -> Theme {
    match settings.ui.theme {
        ThemeSetting::Light => Theme::Light,
        ThemeSetting::Dark => Theme::Dark,
    }
}

pub fn lang(settings: &Settings) -> Lang {
    match settings.ui.language {
        LanguageSetting::En => Lang::En,
        LanguageSetting::Vi => Lang::Vi,
    }
}

/// Load the profile document into the app. Failures become a retryable
/// error on screen, never an exit.
pub fn load_profile_into(app: &mut App, settings: &Settings) {
    match load_profile(&settings.data.profile_path) {
        Ok(data) => app.set_profile(data),
        Err(e) => {
            warn!("failed to load profile: {e}");
            app.data_error = Some(e.to_string());
        }
    }
}

/// The analytics store: file-backed when enabled, memory-only otherwise so
/// a disabled store still satisfies the same API without persisting.
pub fn build_analytics(settings: &Settings) -> AnalyticsStore<Box<dyn Storage>> {
    let storage: Box<dyn Storage> = if settings.analytics.enabled {
        Box::new(FileStorage::new(settings.storage_dir()))
    } else {
        Box::new(MemoryStorage::new())
    };
    AnalyticsStore::new(storage)
}

fn player_options(settings: &Settings) -> PlayerOptions {
    PlayerOptions {
        loop_playlist: settings.player.loop_playlist,
        end_of_track: match settings.player.end_of_track {
            EndOfTrackSetting::RestartCurrent => EndOfTrackPolicy::RestartCurrent,
            EndOfTrackSetting::AdvanceNext => EndOfTrackPolicy::AdvanceNext,
        },
        volume: settings.player.volume,
        autoplay: settings.player.autoplay,
    }
}

/// Load the playlist and build the player. A broken playlist leaves an
/// empty, inert controller and a message in the player bar.
pub fn build_controller(app: &mut App, settings: &Settings) -> PlayerController<RodioDevice> {
    let tracks = match load_playlist(&settings.data.playlist_path, &settings.data.music_dir) {
        Ok(tracks) => {
            app.playlist_error = None;
            tracks
        }
        Err(e) => {
            warn!("failed to load playlist: {e}");
            app.playlist_error = Some(e.to_string());
            Vec::new()
        }
    };

    PlayerController::new(tracks, RodioDevice::new(), player_options(settings))
}
