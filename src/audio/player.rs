use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::catalog::Track;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let join = spawn_audio_thread(rx, playback.clone());

        Self {
            tx,
            playback,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }

    /// Start playing `track`. Only local files can be played; anything else
    /// is rejected before it reaches the audio thread.
    pub fn play(&self, track: &Track) -> Result<(), AudioError> {
        if !track.is_local_file() {
            return Err(AudioError::NotLocal(track.source.clone()));
        }
        self.send(AudioCmd::Play {
            id: track.id.clone(),
            title: track.title.clone(),
            path: PathBuf::from(&track.source),
        })
    }

    /// Ask the audio thread to quit and wait for it.
    pub fn quit(&self) {
        let _ = self.send(AudioCmd::Quit);

        let mut join = self.join.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(h) = join.take() {
            let _ = h.join();
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}
