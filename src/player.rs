//! Embedded music player.
//!
//! The controller owns a cursor over a fixed track list and drives a single
//! audio output device. All UI-visible state lives in [`PlaybackState`] and
//! is derived from device notifications through the pure reducer in
//! [`state`]; the device itself stays the source of truth for whether audio
//! is actually playing.

mod controller;
mod device;
mod playlist;
mod state;
mod types;

pub use controller::{AudioDevice, PlayerController};
pub use device::RodioDevice;
pub use playlist::load_playlist;
pub use types::*;

#[cfg(test)]
mod tests;
