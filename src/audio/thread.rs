use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use super::sink::create_sink;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackInfo};

const TICK: Duration = Duration::from_millis(250);

fn update(playback: &PlaybackHandle, f: impl FnOnce(&mut PlaybackInfo)) {
    let mut info = playback.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut info);
}

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let err = AudioError::NoDevice(e.to_string());
                tracing::error!("{err}");
                update(&playback, |info| info.error = Some(err.to_string()));
                // Keep draining so senders never block on a dead channel.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Play { id, title, path }) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    match create_sink(&stream, &path) {
                        Ok(s) => {
                            tracing::info!("playing {}", path.display());
                            sink = Some(s);
                            update(&playback, |info| {
                                *info = PlaybackInfo {
                                    track_id: Some(id),
                                    title: Some(title),
                                    elapsed: Duration::ZERO,
                                    playing: true,
                                    error: None,
                                };
                            });
                        }
                        Err(e) => {
                            tracing::warn!("{e}");
                            update(&playback, |info| {
                                *info = PlaybackInfo {
                                    error: Some(e.to_string()),
                                    ..PlaybackInfo::default()
                                };
                            });
                        }
                    }
                }
                Ok(AudioCmd::TogglePause) => {
                    if let Some(s) = &sink {
                        if s.is_paused() {
                            s.play();
                        } else {
                            s.pause();
                        }
                        let playing = !s.is_paused();
                        update(&playback, |info| info.playing = playing);
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    update(&playback, |info| *info = PlaybackInfo::default());
                }
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            if let Some(s) = &sink {
                let finished = s.empty();
                let elapsed = s.get_pos();
                update(&playback, |info| {
                    info.elapsed = elapsed;
                    if finished {
                        info.playing = false;
                    }
                });
                if finished {
                    sink = None;
                }
            }
        }

        if let Some(s) = sink.take() {
            s.stop();
        }
    })
}
