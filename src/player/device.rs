//! `rodio`-backed audio device.
//!
//! One dedicated thread owns the output stream and the current sink and is
//! fed over an `mpsc` command channel. Outcomes and progress go back to the
//! controller as [`DeviceEvent`]s tagged with the request generation.
//! Seeking rebuilds the sink with `Source::skip_duration`, which works for
//! the common formats.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::warn;

use super::controller::AudioDevice;
use super::types::{DeviceEvent, DeviceEventKind, TrackSource};

#[derive(Debug)]
enum DeviceCmd {
    Load {
        source: TrackSource,
        fallback_duration: Duration,
        generation: u64,
    },
    Play {
        generation: u64,
    },
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetMuted(bool),
    Stop,
    Shutdown,
}

/// The audio output device used by the runtime. Exactly one controller may
/// own an instance; dropping it stops the thread and releases the stream.
pub struct RodioDevice {
    tx: Sender<DeviceCmd>,
    events: Receiver<DeviceEvent>,
    join: Option<JoinHandle<()>>,
}

impl RodioDevice {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let (event_tx, event_rx) = mpsc::channel::<DeviceEvent>();

        let join = spawn_device_thread(rx, event_tx);

        Self {
            tx,
            events: event_rx,
            join: Some(join),
        }
    }
}

impl Default for RodioDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDevice for RodioDevice {
    fn load(&mut self, source: &TrackSource, fallback_duration: Duration, generation: u64) {
        let _ = self.tx.send(DeviceCmd::Load {
            source: source.clone(),
            fallback_duration,
            generation,
        });
    }

    fn play(&mut self, generation: u64) {
        let _ = self.tx.send(DeviceCmd::Play { generation });
    }

    fn pause(&mut self) {
        let _ = self.tx.send(DeviceCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        let _ = self.tx.send(DeviceCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.tx.send(DeviceCmd::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        let _ = self.tx.send(DeviceCmd::SetMuted(muted));
    }

    fn stop(&mut self) {
        let _ = self.tx.send(DeviceCmd::Stop);
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        let _ = self.tx.send(DeviceCmd::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// The loaded source is cached so seeking can rebuild the sink.
enum LoadedSource {
    File(PathBuf),
    Bytes(Arc<[u8]>),
}

fn spawn_device_thread(rx: Receiver<DeviceCmd>, events: Sender<DeviceEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                warn!("no audio output device: {e}");
                degraded_loop(rx, events, e.to_string());
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let emit = |generation: u64, kind: DeviceEventKind| {
            let _ = events.send(DeviceEvent { generation, kind });
        };

        let mut sink: Option<Sink> = None;
        let mut loaded: Option<LoadedSource> = None;
        let mut generation: u64 = 0;
        let mut duration = Duration::ZERO;
        let mut paused = true;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let mut volume: f32 = 1.0;
        let mut muted = false;
        let effective = |volume: f32, muted: bool| if muted { 0.0 } else { volume };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    DeviceCmd::Load {
                        source,
                        fallback_duration,
                        generation: cmd_gen,
                    } => {
                        generation = cmd_gen;
                        emit(generation, DeviceEventKind::LoadStarted);

                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        loaded = None;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;

                        match fetch_source(&source) {
                            Ok(src) => {
                                duration = probe_duration(&src).unwrap_or(fallback_duration);
                                match create_sink(&stream, &src, Duration::ZERO) {
                                    Ok(new_sink) => {
                                        new_sink.set_volume(effective(volume, muted));
                                        sink = Some(new_sink);
                                        loaded = Some(src);
                                        emit(generation, DeviceEventKind::MetadataLoaded {
                                            duration,
                                        });
                                    }
                                    Err(msg) => {
                                        warn!("failed to prepare source: {msg}");
                                        emit(generation, DeviceEventKind::Error(msg));
                                    }
                                }
                            }
                            Err(msg) => {
                                warn!("failed to fetch source: {msg}");
                                emit(generation, DeviceEventKind::Error(msg));
                            }
                        }
                    }

                    DeviceCmd::Play { generation: cmd_gen } => {
                        // A play racing a newer load is stale; drop it.
                        if cmd_gen != generation {
                            continue;
                        }
                        match sink.as_ref() {
                            Some(s) => {
                                s.play();
                                paused = false;
                                started_at = Some(Instant::now());
                                emit(generation, DeviceEventKind::Playing);
                            }
                            None => {
                                emit(
                                    generation,
                                    DeviceEventKind::Error(
                                        "no audio source is loaded".to_string(),
                                    ),
                                );
                            }
                        }
                    }

                    DeviceCmd::Pause => {
                        if let Some(s) = sink.as_ref() {
                            s.pause();
                        }
                        if let Some(st) = started_at.take() {
                            accumulated += st.elapsed();
                        }
                        paused = true;
                        emit(generation, DeviceEventKind::Paused);
                    }

                    DeviceCmd::Seek(position) => {
                        let Some(src) = loaded.as_ref() else {
                            continue;
                        };

                        if let Some(s) = sink.take() {
                            s.stop();
                        }

                        match create_sink(&stream, src, position) {
                            Ok(new_sink) => {
                                new_sink.set_volume(effective(volume, muted));
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                accumulated = position;
                                sink = Some(new_sink);
                                emit(generation, DeviceEventKind::PositionChanged(position));
                            }
                            Err(msg) => {
                                paused = true;
                                started_at = None;
                                emit(generation, DeviceEventKind::Error(msg));
                            }
                        }
                    }

                    DeviceCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(effective(volume, muted));
                        }
                    }

                    DeviceCmd::SetMuted(m) => {
                        muted = m;
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(effective(volume, muted));
                        }
                    }

                    DeviceCmd::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        loaded = None;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                    }

                    DeviceCmd::Shutdown => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic tick: progress report and end-of-stream check.
                    let Some(s) = sink.as_ref() else {
                        continue;
                    };
                    if paused {
                        continue;
                    }

                    if s.empty() {
                        paused = true;
                        started_at = None;
                        accumulated = duration;
                        emit(generation, DeviceEventKind::Ended);
                    } else {
                        let mut elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        if duration > Duration::ZERO && elapsed > duration {
                            elapsed = duration;
                        }
                        emit(generation, DeviceEventKind::PositionChanged(elapsed));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Fallback loop when no output stream could be opened: every load or play
/// request is answered with an error event so the UI can say why.
fn degraded_loop(rx: Receiver<DeviceCmd>, events: Sender<DeviceEvent>, reason: String) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            DeviceCmd::Load { generation, .. } | DeviceCmd::Play { generation } => {
                let _ = events.send(DeviceEvent {
                    generation,
                    kind: DeviceEventKind::Error(format!("no audio output device: {reason}")),
                });
            }
            DeviceCmd::Shutdown => break,
            _ => {}
        }
    }
}

/// Materialize a track source: local files stay on disk, remote `http(s)`
/// sources are fetched whole into memory. Other remote schemes are refused.
fn fetch_source(source: &TrackSource) -> Result<LoadedSource, String> {
    match source {
        TrackSource::Local(path) => {
            if !path.is_file() {
                return Err(format!("file does not exist: {}", path.display()));
            }
            Ok(LoadedSource::File(path.clone()))
        }
        TrackSource::Remote(url) if url.starts_with("http://") || url.starts_with("https://") => {
            let response = reqwest::blocking::get(url)
                .and_then(|r| r.error_for_status())
                .map_err(|e| format!("failed to fetch {url}: {e}"))?;
            let bytes = response
                .bytes()
                .map_err(|e| format!("failed to read {url}: {e}"))?;
            Ok(LoadedSource::Bytes(Arc::from(bytes.as_ref())))
        }
        TrackSource::Remote(url) => Err(format!("unsupported source scheme: {url}")),
    }
}

/// Probe the real duration of a local file with `lofty`. Remote sources keep
/// the playlist's advisory duration.
fn probe_duration(source: &LoadedSource) -> Option<Duration> {
    match source {
        LoadedSource::File(path) => lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration()),
        LoadedSource::Bytes(_) => None,
    }
}

/// Create a paused `Sink` for the loaded source starting at `start_at`.
fn create_sink(
    stream: &OutputStream,
    source: &LoadedSource,
    start_at: Duration,
) -> Result<Sink, String> {
    let sink = Sink::connect_new(stream.mixer());

    match source {
        LoadedSource::File(path) => {
            let file = File::open(path)
                .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
            let decoded = Decoder::new(BufReader::new(file))
                .map_err(|e| format!("failed to decode {}: {e}", path.display()))?
                // `skip_duration` is our seeking primitive; Duration::ZERO is fine.
                .skip_duration(start_at);
            sink.append(decoded);
        }
        LoadedSource::Bytes(bytes) => {
            let decoded = Decoder::new(Cursor::new(Arc::clone(bytes)))
                .map_err(|e| format!("failed to decode fetched audio: {e}"))?
                .skip_duration(start_at);
            sink.append(decoded);
        }
    }

    sink.pause();
    Ok(sink)
}
