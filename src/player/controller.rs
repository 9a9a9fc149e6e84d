//! Transport-control API over one audio output device.

use std::time::Duration;

use super::state;
use super::types::{
    DeviceEvent, EndOfTrackPolicy, PlaybackState, PlayerOptions, Track, TrackSource,
};

/// Seam between the controller and the audio backend.
///
/// Requests are fire-and-forget; outcomes come back as [`DeviceEvent`]s from
/// `poll_events`. `load` and `play` carry the generation that tags the
/// resulting events so superseded requests can be recognized.
pub trait AudioDevice {
    fn load(&mut self, source: &TrackSource, fallback_duration: Duration, generation: u64);
    fn play(&mut self, generation: u64);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn stop(&mut self);
    fn poll_events(&mut self) -> Vec<DeviceEvent>;
}

/// Owns the track cursor and one audio device. Exactly one controller may be
/// attached to a device at a time.
pub struct PlayerController<D: AudioDevice> {
    tracks: Vec<Track>,
    device: D,
    state: PlaybackState,
    /// Bumped on every source swap; device events from older generations are
    /// ignored so an in-flight play on the previous track cannot resurrect
    /// stale state.
    generation: u64,
    loop_playlist: bool,
    end_of_track: EndOfTrackPolicy,
    autoplay: bool,
}

impl<D: AudioDevice> PlayerController<D> {
    pub fn new(tracks: Vec<Track>, mut device: D, options: PlayerOptions) -> Self {
        let volume = options.volume.clamp(0.0, 1.0);
        device.set_volume(volume);

        let mut controller = Self {
            tracks,
            device,
            state: PlaybackState {
                volume,
                ..PlaybackState::default()
            },
            generation: 0,
            loop_playlist: options.loop_playlist,
            end_of_track: options.end_of_track,
            autoplay: options.autoplay,
        };

        if !controller.tracks.is_empty() {
            controller.load_current(options.autoplay);
        }

        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.state.current_index)
    }

    /// Request playback of the current track. Asynchronous: `is_playing`
    /// flips only once the device reports `Playing`; a rejected request
    /// surfaces as an `Error` event instead.
    pub fn play(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.device.play(self.generation);
    }

    /// Pause. Synchronous from the caller's perspective; the mirrored
    /// `Paused` event is a no-op by then.
    pub fn pause(&mut self) {
        self.device.pause();
        self.state.is_playing = false;
    }

    pub fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance the cursor. Wraps at the end when playlist looping is on;
    /// otherwise playback stops and the cursor stays on the last track.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        if self.state.current_index + 1 >= self.tracks.len() {
            if self.loop_playlist {
                self.state.current_index = 0;
            } else {
                self.pause();
                return;
            }
        } else {
            self.state.current_index += 1;
        }

        let resume = self.state.is_playing;
        self.load_current(resume);
    }

    /// Retreat the cursor, always wrapping from 0 to the last track.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        self.state.current_index = if self.state.current_index == 0 {
            self.tracks.len() - 1
        } else {
            self.state.current_index - 1
        };

        let resume = self.state.is_playing;
        self.load_current(resume);
    }

    /// Jump the cursor directly. Out-of-bounds indices are a no-op.
    pub fn set_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        self.state.current_index = index;
        let resume = self.state.is_playing;
        self.load_current(resume);
    }

    /// Relocate playback. Clamps to `[0, duration]` and updates `position`
    /// optimistically without waiting for a device round trip.
    pub fn seek(&mut self, position: Duration) {
        if self.tracks.is_empty() {
            return;
        }
        let clamped = position.min(self.state.duration);
        self.state.position = clamped;
        self.device.seek(clamped);
    }

    /// Seek relative to the current position; negative offsets saturate at 0.
    pub fn seek_by(&mut self, offset_secs: i64) {
        let current = self.state.position.as_secs() as i64;
        let target = (current + offset_secs).max(0) as u64;
        self.seek(Duration::from_secs(target));
    }

    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.device.set_muted(self.state.muted);
    }

    /// Set the volume, clamped to `[0, 1]`, applied to the device at once.
    pub fn change_volume(&mut self, volume: f32) {
        let clamped = volume.clamp(0.0, 1.0);
        self.state.volume = clamped;
        self.device.set_volume(clamped);
    }

    pub fn change_volume_by(&mut self, delta: f32) {
        self.change_volume(self.state.volume + delta);
    }

    /// Drain the device and fold current-generation events into the state.
    /// Called once per event-loop iteration.
    pub fn pump_events(&mut self) {
        for event in self.device.poll_events() {
            if event.generation != self.generation {
                continue;
            }
            match event.kind {
                super::types::DeviceEventKind::Ended => self.on_ended(),
                kind => state::apply(&mut self.state, &kind),
            }
        }
    }

    /// Stop and release the device. The controller is inert afterwards.
    pub fn shutdown(&mut self) {
        self.device.stop();
        self.state.is_playing = false;
        self.state.loading = false;
    }

    fn on_ended(&mut self) {
        match self.end_of_track {
            EndOfTrackPolicy::RestartCurrent => {
                self.state.position = Duration::ZERO;
                self.device.seek(Duration::ZERO);
                self.device.play(self.generation);
            }
            EndOfTrackPolicy::AdvanceNext => {
                if self.state.current_index + 1 >= self.tracks.len() && !self.loop_playlist {
                    state::apply(&mut self.state, &super::types::DeviceEventKind::Ended);
                    return;
                }
                self.state.current_index = (self.state.current_index + 1) % self.tracks.len();
                self.load_current(true);
            }
        }
    }

    /// The single expensive side effect: swap the device source. Resets the
    /// position, clears any prior error and supersedes in-flight events.
    fn load_current(&mut self, resume: bool) {
        self.generation += 1;
        self.state.position = Duration::ZERO;
        self.state.error = None;
        self.state.is_playing = false;
        self.state.loading = true;

        let (source, duration) = {
            let track = &self.tracks[self.state.current_index];
            (track.source.clone(), track.duration)
        };
        self.state.duration = duration;
        self.device.load(&source, duration, self.generation);

        if resume || self.autoplay {
            self.device.play(self.generation);
        }
    }
}
