use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::controller::{AudioDevice, PlayerController};
use super::playlist::{ParseFailure, parse_playlist};
use super::state;
use super::types::{
    DeviceEvent, DeviceEventKind, EndOfTrackPolicy, PlaybackState, PlayerOptions, Track,
    TrackSource,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load { source: TrackSource, generation: u64 },
    Play { generation: u64 },
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetMuted(bool),
    Stop,
}

/// Records every request and replays queued events on `poll_events`. Tests
/// keep clones of the shared handles while the controller owns the device.
#[derive(Default, Clone)]
struct MockDevice {
    calls: Arc<Mutex<Vec<Call>>>,
    pending: Arc<Mutex<VecDeque<DeviceEvent>>>,
}

impl MockDevice {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn push_event(&self, generation: u64, kind: DeviceEventKind) {
        self.pending
            .lock()
            .unwrap()
            .push_back(DeviceEvent { generation, kind });
    }
}

impl AudioDevice for MockDevice {
    fn load(&mut self, source: &TrackSource, _fallback_duration: Duration, generation: u64) {
        self.calls.lock().unwrap().push(Call::Load {
            source: source.clone(),
            generation,
        });
    }

    fn play(&mut self, generation: u64) {
        self.calls.lock().unwrap().push(Call::Play { generation });
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.lock().unwrap().push(Call::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.lock().unwrap().push(Call::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.lock().unwrap().push(Call::SetMuted(muted));
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push(Call::Stop);
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        self.pending.lock().unwrap().drain(..).collect()
    }
}

fn track(n: usize) -> Track {
    Track {
        id: format!("track-{n}"),
        title: format!("Track {n}"),
        artist: "Unknown Artist".to_string(),
        source: TrackSource::Local(format!("/music/{n}.mp3").into()),
        duration: Duration::from_secs(180),
    }
}

fn controller_with(
    count: usize,
    options: PlayerOptions,
) -> (PlayerController<MockDevice>, MockDevice) {
    let device = MockDevice::default();
    let handle = device.clone();
    let tracks = (1..=count).map(track).collect();
    (PlayerController::new(tracks, device, options), handle)
}

mod reducer {
    use super::*;

    #[test]
    fn load_started_marks_loading() {
        let mut s = PlaybackState::default();
        state::apply(&mut s, &DeviceEventKind::LoadStarted);
        assert!(s.loading);
    }

    #[test]
    fn metadata_sets_duration_and_clears_error() {
        let mut s = PlaybackState {
            loading: true,
            error: Some("boom".to_string()),
            ..PlaybackState::default()
        };
        state::apply(&mut s, &DeviceEventKind::MetadataLoaded {
            duration: Duration::from_secs(240),
        });
        assert_eq!(s.duration, Duration::from_secs(240));
        assert!(!s.loading);
        assert_eq!(s.error, None);
    }

    #[test]
    fn playing_and_paused_flip_is_playing() {
        let mut s = PlaybackState::default();
        state::apply(&mut s, &DeviceEventKind::Playing);
        assert!(s.is_playing);
        state::apply(&mut s, &DeviceEventKind::Paused);
        assert!(!s.is_playing);
    }

    #[test]
    fn position_changed_moves_position() {
        let mut s = PlaybackState::default();
        state::apply(&mut s, &DeviceEventKind::PositionChanged(Duration::from_secs(42)));
        assert_eq!(s.position, Duration::from_secs(42));
    }

    #[test]
    fn ended_parks_position_at_duration() {
        let mut s = PlaybackState {
            is_playing: true,
            duration: Duration::from_secs(180),
            position: Duration::from_secs(179),
            ..PlaybackState::default()
        };
        state::apply(&mut s, &DeviceEventKind::Ended);
        assert!(!s.is_playing);
        assert_eq!(s.position, Duration::from_secs(180));
    }

    #[test]
    fn error_stops_playback_and_records_message() {
        let mut s = PlaybackState {
            is_playing: true,
            loading: true,
            ..PlaybackState::default()
        };
        state::apply(&mut s, &DeviceEventKind::Error("decode failed".to_string()));
        assert!(!s.is_playing);
        assert!(!s.loading);
        assert_eq!(s.error.as_deref(), Some("decode failed"));
    }
}

#[test]
fn new_loads_first_track_without_playing() {
    let (c, device) = controller_with(3, PlayerOptions::default());

    assert_eq!(c.current_index(), 0);
    assert!(!c.state().is_playing);
    let calls = device.calls();
    assert!(calls.iter().any(|call| matches!(call, Call::Load { .. })));
    assert!(!calls.iter().any(|call| matches!(call, Call::Play { .. })));
}

#[test]
fn autoplay_requests_playback_on_construction() {
    let (_c, device) = controller_with(3, PlayerOptions {
        autoplay: true,
        ..PlayerOptions::default()
    });
    assert!(
        device
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Play { .. }))
    );
}

#[test]
fn play_does_not_flip_state_until_device_confirms() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());

    c.play();
    assert!(!c.state().is_playing);

    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();
    assert!(c.state().is_playing);
}

#[test]
fn rejected_play_surfaces_as_error_not_playing() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());

    c.play();
    device.push_event(1, DeviceEventKind::Error("no audio output device".to_string()));
    c.pump_events();

    assert!(!c.state().is_playing);
    assert_eq!(c.state().error.as_deref(), Some("no audio output device"));
}

#[test]
fn pause_is_synchronous() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();

    c.pause();
    assert!(!c.state().is_playing);
    assert!(device.calls().contains(&Call::Pause));
}

#[test]
fn set_track_moves_cursor_and_resets_position() {
    let (mut c, device) = controller_with(3, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::PositionChanged(Duration::from_secs(30)));
    c.pump_events();

    c.set_track(2);
    assert_eq!(c.current_index(), 2);
    assert_eq!(c.state().position, Duration::ZERO);
    assert_eq!(c.current_track().unwrap().id, "track-3");
}

#[test]
fn set_track_out_of_bounds_is_a_noop() {
    let (mut c, _device) = controller_with(3, PlayerOptions::default());
    c.set_track(7);
    assert_eq!(c.current_index(), 0);
}

#[test]
fn next_wraps_when_looping() {
    let (mut c, _device) = controller_with(3, PlayerOptions {
        loop_playlist: true,
        ..PlayerOptions::default()
    });
    c.set_track(2);
    c.next();
    assert_eq!(c.current_index(), 0);
}

#[test]
fn next_at_end_without_loop_stops_in_place() {
    let (mut c, device) = controller_with(3, PlayerOptions {
        loop_playlist: false,
        ..PlayerOptions::default()
    });
    c.set_track(2);
    // set_track is the second load, so confirmations carry generation 2.
    device.push_event(2, DeviceEventKind::Playing);
    c.pump_events();
    device.clear_calls();

    c.next();
    assert_eq!(c.current_index(), 2);
    assert!(!c.state().is_playing);
    // No new source was loaded.
    assert!(
        !device
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Load { .. }))
    );
}

#[test]
fn prev_always_wraps_from_first_track() {
    let (mut c, _device) = controller_with(3, PlayerOptions {
        loop_playlist: false,
        ..PlayerOptions::default()
    });
    c.prev();
    assert_eq!(c.current_index(), 2);
}

#[test]
fn cursor_change_resumes_when_playing() {
    let (mut c, device) = controller_with(3, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();
    device.clear_calls();

    c.next();
    // The new load is followed by a play request carrying its generation.
    let calls = device.calls();
    let load_gen = calls.iter().find_map(|call| match call {
        Call::Load { generation, .. } => Some(*generation),
        _ => None,
    });
    assert!(calls.contains(&Call::Play {
        generation: load_gen.unwrap()
    }));
}

#[test]
fn cursor_change_stays_paused_when_paused() {
    let (mut c, device) = controller_with(3, PlayerOptions::default());
    device.clear_calls();

    c.next();
    assert!(
        !device
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Play { .. }))
    );
}

#[test]
fn seek_clamps_to_duration() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::MetadataLoaded {
        duration: Duration::from_secs(180),
    });
    c.pump_events();
    device.clear_calls();

    c.seek(Duration::from_secs(500));
    assert_eq!(c.state().position, Duration::from_secs(180));
    assert!(device.calls().contains(&Call::Seek(Duration::from_secs(180))));
}

#[test]
fn seek_by_saturates_at_zero() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::MetadataLoaded {
        duration: Duration::from_secs(180),
    });
    device.push_event(1, DeviceEventKind::PositionChanged(Duration::from_secs(3)));
    c.pump_events();

    c.seek_by(-10);
    assert_eq!(c.state().position, Duration::ZERO);
}

#[test]
fn volume_changes_clamp_to_unit_range() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());

    c.change_volume(1.7);
    assert_eq!(c.state().volume, 1.0);
    c.change_volume_by(-2.5);
    assert_eq!(c.state().volume, 0.0);
    assert!(device.calls().contains(&Call::SetVolume(1.0)));
    assert!(device.calls().contains(&Call::SetVolume(0.0)));
}

#[test]
fn toggle_mute_keeps_volume() {
    let (mut c, device) = controller_with(1, PlayerOptions {
        volume: 0.5,
        ..PlayerOptions::default()
    });

    c.toggle_mute();
    assert!(c.state().muted);
    assert_eq!(c.state().volume, 0.5);
    assert!(device.calls().contains(&Call::SetMuted(true)));

    c.toggle_mute();
    assert!(!c.state().muted);
}

#[test]
fn events_from_superseded_loads_are_dropped() {
    let (mut c, device) = controller_with(3, PlayerOptions::default());

    c.play();
    // Switch tracks before the old play confirmation lands.
    c.next();
    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();

    // The stale confirmation belongs to generation 1; the controller is on 2.
    assert!(!c.state().is_playing);
    assert_eq!(c.current_index(), 1);
}

#[test]
fn ended_restarts_current_track_by_default() {
    let (mut c, device) = controller_with(3, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();
    device.clear_calls();

    device.push_event(1, DeviceEventKind::Ended);
    c.pump_events();

    assert_eq!(c.current_index(), 0);
    assert_eq!(c.state().position, Duration::ZERO);
    let calls = device.calls();
    assert!(calls.contains(&Call::Seek(Duration::ZERO)));
    assert!(calls.contains(&Call::Play { generation: 1 }));
}

#[test]
fn ended_advances_under_advance_policy() {
    let (mut c, device) = controller_with(3, PlayerOptions {
        end_of_track: EndOfTrackPolicy::AdvanceNext,
        ..PlayerOptions::default()
    });

    device.push_event(1, DeviceEventKind::Ended);
    c.pump_events();

    assert_eq!(c.current_index(), 1);
    // The next track was loaded and asked to play.
    let calls = device.calls();
    let load_gen = calls.iter().rev().find_map(|call| match call {
        Call::Load { generation, .. } => Some(*generation),
        _ => None,
    });
    assert!(calls.contains(&Call::Play {
        generation: load_gen.unwrap()
    }));
}

#[test]
fn ended_on_last_track_without_loop_stops() {
    let (mut c, device) = controller_with(3, PlayerOptions {
        end_of_track: EndOfTrackPolicy::AdvanceNext,
        loop_playlist: false,
        ..PlayerOptions::default()
    });
    c.set_track(2);
    device.clear_calls();

    device.push_event(2, DeviceEventKind::Ended);
    c.pump_events();

    assert_eq!(c.current_index(), 2);
    assert!(!c.state().is_playing);
    assert!(
        !device
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Load { .. }))
    );
}

#[test]
fn ended_on_last_track_with_loop_wraps() {
    let (mut c, device) = controller_with(3, PlayerOptions {
        end_of_track: EndOfTrackPolicy::AdvanceNext,
        loop_playlist: true,
        ..PlayerOptions::default()
    });
    c.set_track(2);

    device.push_event(2, DeviceEventKind::Ended);
    c.pump_events();
    assert_eq!(c.current_index(), 0);
}

#[test]
fn empty_playlist_controller_is_inert() {
    let device = MockDevice::default();
    let handle = device.clone();
    let mut c = PlayerController::new(Vec::new(), device, PlayerOptions::default());

    c.play();
    c.next();
    c.prev();
    c.seek(Duration::from_secs(10));

    assert!(c.current_track().is_none());
    assert!(
        !handle
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Load { .. } | Call::Play { .. }))
    );
}

#[test]
fn shutdown_stops_the_device() {
    let (mut c, device) = controller_with(1, PlayerOptions::default());
    device.push_event(1, DeviceEventKind::Playing);
    c.pump_events();

    c.shutdown();
    assert!(!c.state().is_playing);
    assert!(device.calls().contains(&Call::Stop));
}

mod playlist_parsing {
    use super::*;

    fn parse(raw: &str) -> Vec<Track> {
        parse_playlist(raw, Path::new("/music")).ok().unwrap()
    }

    #[test]
    fn sparse_entries_get_positional_defaults() {
        let tracks = parse(r#"{"tracks": [{"file": "a.mp3"}, {"file": "b.mp3"}]}"#);

        assert_eq!(tracks[0].id, "track-1");
        assert_eq!(tracks[0].title, "Track 1");
        assert_eq!(tracks[0].artist, "Unknown Artist");
        assert_eq!(tracks[1].id, "track-2");
        assert_eq!(tracks[1].title, "Track 2");
    }

    #[test]
    fn explicit_fields_are_kept() {
        let tracks = parse(
            r#"{"tracks": [{"id": "lofi", "title": "Lofi Study", "artist": "Kyoto", "file": "lofi.mp3", "duration": 213.4}]}"#,
        );
        assert_eq!(tracks[0].id, "lofi");
        assert_eq!(tracks[0].title, "Lofi Study");
        assert_eq!(tracks[0].artist, "Kyoto");
        assert_eq!(tracks[0].duration, Duration::from_secs_f64(213.4));
    }

    #[test]
    fn blank_fields_fall_back_like_missing_ones() {
        let tracks = parse(r#"{"tracks": [{"title": "  ", "artist": "", "file": "a.mp3"}]}"#);
        assert_eq!(tracks[0].title, "Track 1");
        assert_eq!(tracks[0].artist, "Unknown Artist");
    }

    #[test]
    fn non_numeric_duration_collapses_to_zero() {
        let tracks =
            parse(r#"{"tracks": [{"file": "a.mp3", "duration": "three minutes"}]}"#);
        assert_eq!(tracks[0].duration, Duration::ZERO);

        let tracks = parse(r#"{"tracks": [{"file": "a.mp3", "duration": -5}]}"#);
        assert_eq!(tracks[0].duration, Duration::ZERO);
    }

    #[test]
    fn empty_track_list_is_rejected() {
        assert!(matches!(
            parse_playlist(r#"{"tracks": []}"#, Path::new("/music")),
            Err(ParseFailure::Empty)
        ));
        assert!(matches!(
            parse_playlist(r#"{}"#, Path::new("/music")),
            Err(ParseFailure::Empty)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        assert!(matches!(
            parse_playlist("not json", Path::new("/music")),
            Err(ParseFailure::Json(_))
        ));
    }

    #[test]
    fn local_files_resolve_against_music_dir() {
        assert_eq!(
            TrackSource::resolve("song.mp3", Path::new("/music")),
            TrackSource::Local("/music/song.mp3".into())
        );
    }

    #[test]
    fn urls_are_kept_verbatim() {
        assert_eq!(
            TrackSource::resolve("https://cdn.example.com/a.mp3", Path::new("/music")),
            TrackSource::Remote("https://cdn.example.com/a.mp3".to_string())
        );
        assert_eq!(
            TrackSource::resolve("  HTTP://host/a.mp3  ", Path::new("/music")),
            TrackSource::Remote("HTTP://host/a.mp3".to_string())
        );
        assert!(matches!(
            TrackSource::resolve("data:audio/mp3;base64,AAAA", Path::new("/music")),
            TrackSource::Remote(_)
        ));
    }
}
