//! Audio-related small types and handles.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::catalog::TrackId;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("{0} is not a local file")]
    NotLocal(String),

    #[error("audio thread is gone")]
    Disconnected,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace whatever is playing with the file at `path`.
    Play {
        id: TrackId,
        title: String,
        path: PathBuf,
    },
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback immediately.
    Stop,
    /// Quit the audio thread.
    Quit,
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    pub track_id: Option<TrackId>,
    pub title: Option<String>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Last playback failure, cleared by the next successful play.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
