//! Pure reducer from device events onto [`PlaybackState`].
//!
//! Keeping this a plain function of `(state, event)` makes the controller's
//! reaction to every device notification testable with synthetic events,
//! with no audio backend in the loop.

use super::types::{DeviceEventKind, PlaybackState};

pub fn apply(state: &mut PlaybackState, event: &DeviceEventKind) {
    match event {
        DeviceEventKind::LoadStarted => {
            state.loading = true;
        }
        DeviceEventKind::MetadataLoaded { duration } => {
            state.duration = *duration;
            state.loading = false;
            state.error = None;
        }
        DeviceEventKind::Playing => {
            state.loading = false;
            state.is_playing = true;
        }
        DeviceEventKind::Paused => {
            state.is_playing = false;
        }
        DeviceEventKind::PositionChanged(position) => {
            state.position = *position;
        }
        DeviceEventKind::Ended => {
            state.is_playing = false;
            state.position = state.duration;
        }
        DeviceEventKind::Error(message) => {
            state.loading = false;
            state.is_playing = false;
            state.error = Some(message.clone());
        }
    }
}
