//! Playback of local catalog tracks.
//!
//! A dedicated thread owns the `rodio` output stream and obeys `AudioCmd`s;
//! the UI observes progress through a shared `PlaybackHandle`.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
