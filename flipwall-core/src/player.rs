use std::{
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender, TryRecvError},
    },
    time::{Duration, Instant},
};

use flipwall_state::VideoId;

use crate::{ff, tokio_thread::TokioHandle, wall::WallEvent};

/// A playback failure reported by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The playback service is gone. The session cannot continue.
    Disconnected(String),
    /// The current video cannot be played; the wall moves on to the next one.
    Video(String),
}
impl PlayerError {
    /// Fatal errors tear the whole session down instead of skipping a video.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlayerError::Disconnected(_))
    }
}
impl std::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerError::Disconnected(message) => {
                write!(f, "playback service disconnected: {message}")
            }
            PlayerError::Video(message) => write!(f, "video error: {message}"),
        }
    }
}
impl std::error::Error for PlayerError {}

/// Point-in-time view of the player, for rendering the video surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub video_id: VideoId,
    pub title: String,
    pub duration: Duration,
    pub position: Duration,
    pub paused: bool,
}

/// Plays one cued video at a time on the wall's video surface.
///
/// All methods are non-blocking; outcomes arrive as
/// [`WallEvent::PlayerLoaded`], [`WallEvent::PlayerEnded`] and
/// [`WallEvent::PlayerError`].
pub trait VideoPlayer {
    /// Prepare a video for playback without starting it.
    fn cue(&mut self, video_id: VideoId);
    /// Start or resume playback of the cued video.
    fn play(&mut self);
    /// Pause playback, keeping the position.
    fn pause(&mut self);
    /// Tear the player down. No further events are delivered.
    fn release(&mut self);
    /// Current playback state, if a video is loaded.
    fn snapshot(&self) -> Option<PlaybackSnapshot>;
}

enum ClockCommand {
    Load(PlaybackSnapshot),
    Play,
    Pause,
    Clear,
    Shutdown,
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Background thread that advances the playback position and reports the end
/// of the video. Owns the snapshot; the UI reads it through the lock.
struct PlayerClock {
    command_tx: Sender<ClockCommand>,
    snapshot: Arc<RwLock<Option<PlaybackSnapshot>>>,
    _clock_thread_handle: std::thread::JoinHandle<()>,
}

impl PlayerClock {
    fn new(event_tx: Sender<WallEvent>) -> Self {
        let (command_tx, command_rx) = std::sync::mpsc::channel();
        let snapshot = Arc::new(RwLock::new(None));
        let thread_snapshot = snapshot.clone();

        let clock_thread_handle = std::thread::Builder::new()
            .name("flipwall-player-clock".to_string())
            .spawn(move || Self::run(command_rx, event_tx, thread_snapshot))
            .expect("failed to spawn player clock thread");

        Self {
            command_tx,
            snapshot,
            _clock_thread_handle: clock_thread_handle,
        }
    }

    fn run(
        command_rx: Receiver<ClockCommand>,
        event_tx: Sender<WallEvent>,
        snapshot: Arc<RwLock<Option<PlaybackSnapshot>>>,
    ) {
        let mut last_tick = Instant::now();
        loop {
            // Process all available commands without blocking.
            loop {
                match command_rx.try_recv() {
                    Ok(ClockCommand::Load(loaded)) => {
                        *snapshot.write().unwrap() = Some(loaded);
                        last_tick = Instant::now();
                    }
                    Ok(ClockCommand::Play) => {
                        if let Some(state) = snapshot.write().unwrap().as_mut() {
                            state.paused = false;
                        }
                        last_tick = Instant::now();
                    }
                    Ok(ClockCommand::Pause) => {
                        if let Some(state) = snapshot.write().unwrap().as_mut() {
                            state.paused = true;
                        }
                    }
                    Ok(ClockCommand::Clear) => {
                        *snapshot.write().unwrap() = None;
                    }
                    Ok(ClockCommand::Shutdown) | Err(TryRecvError::Disconnected) => return,
                    Err(TryRecvError::Empty) => break,
                }
            }

            let elapsed = last_tick.elapsed();
            last_tick = Instant::now();

            let ended = {
                let mut guard = snapshot.write().unwrap();
                match guard.as_mut() {
                    Some(state) if !state.paused => {
                        state.position += elapsed;
                        if state.position >= state.duration {
                            *guard = None;
                            true
                        } else {
                            false
                        }
                    }
                    _ => false,
                }
            };
            if ended && event_tx.send(WallEvent::PlayerEnded).is_err() {
                return;
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn send(&self, command: ClockCommand) {
        if self.command_tx.send(command).is_err() {
            tracing::warn!("player clock thread is gone");
        }
    }

    fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.snapshot.read().unwrap().clone()
    }
}

/// [`VideoPlayer`] that fetches video metadata from an Invidious-compatible
/// server and simulates playback against the video's reported duration.
pub struct HttpVideoPlayer {
    client: Arc<ff::Client>,
    tokio: TokioHandle,
    event_tx: Sender<WallEvent>,
    clock: PlayerClock,
    released: Arc<AtomicBool>,
}

impl HttpVideoPlayer {
    pub fn new(client: Arc<ff::Client>, tokio: TokioHandle, event_tx: Sender<WallEvent>) -> Self {
        let clock = PlayerClock::new(event_tx.clone());
        Self {
            client,
            tokio,
            event_tx,
            clock,
            released: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl VideoPlayer for HttpVideoPlayer {
    fn cue(&mut self, video_id: VideoId) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let command_tx = self.clock.command_tx.clone();
        let released = self.released.clone();

        self.tokio.spawn(async move {
            let result = load_video(&client, &video_id).await;
            if released.load(Ordering::Relaxed) {
                tracing::debug!("dropping cue result after release");
                return;
            }
            match result {
                Ok(loaded) => {
                    let _ = command_tx.send(ClockCommand::Load(loaded));
                    let _ = event_tx.send(WallEvent::PlayerLoaded(Some(video_id)));
                }
                Err(error) => {
                    let _ = event_tx.send(WallEvent::PlayerError(error));
                }
            }
        });
    }

    fn play(&mut self) {
        self.clock.send(ClockCommand::Play);
    }

    fn pause(&mut self) {
        self.clock.send(ClockCommand::Pause);
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::Relaxed);
        self.clock.send(ClockCommand::Clear);
        self.clock.send(ClockCommand::Shutdown);
        tracing::debug!("video player released");
    }

    fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.clock.snapshot()
    }
}

async fn load_video(
    client: &ff::Client,
    video_id: &VideoId,
) -> Result<PlaybackSnapshot, PlayerError> {
    let details = client.get_video(&video_id.0).await.map_err(|e| {
        if e.is_connection_error() {
            PlayerError::Disconnected(e.to_string())
        } else {
            PlayerError::Video(format!("failed to load video {video_id}: {e}"))
        }
    })?;

    if details.live_now {
        return Err(PlayerError::Video(format!(
            "video {video_id} is a live stream"
        )));
    }

    Ok(PlaybackSnapshot {
        video_id: video_id.clone(),
        title: details.title,
        duration: Duration::from_secs(details.length_seconds.max(0) as u64),
        position: Duration::ZERO,
        paused: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_snapshot(duration_ms: u64) -> PlaybackSnapshot {
        PlaybackSnapshot {
            video_id: VideoId::new("abc123def45"),
            title: "A video".to_string(),
            duration: Duration::from_millis(duration_ms),
            position: Duration::ZERO,
            paused: true,
        }
    }

    #[test]
    fn clock_reports_the_end_of_playback() {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let clock = PlayerClock::new(event_tx);

        clock.send(ClockCommand::Load(short_snapshot(50)));
        clock.send(ClockCommand::Play);

        let event = event_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("expected an end event");
        assert!(matches!(event, WallEvent::PlayerEnded));
        assert!(clock.snapshot().is_none());
    }

    #[test]
    fn cued_video_does_not_advance_until_played() {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let clock = PlayerClock::new(event_tx);

        clock.send(ClockCommand::Load(short_snapshot(50)));
        std::thread::sleep(Duration::from_millis(150));

        assert!(event_rx.try_recv().is_err(), "no end while cued");
        let snapshot = clock.snapshot().expect("still loaded");
        assert_eq!(snapshot.position, Duration::ZERO);
    }

    #[test]
    fn pause_freezes_the_position() {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let clock = PlayerClock::new(event_tx);

        clock.send(ClockCommand::Load(short_snapshot(10_000)));
        clock.send(ClockCommand::Play);
        std::thread::sleep(Duration::from_millis(100));
        clock.send(ClockCommand::Pause);
        std::thread::sleep(Duration::from_millis(50));

        let first = clock.snapshot().expect("still loaded").position;
        assert!(first > Duration::ZERO);
        std::thread::sleep(Duration::from_millis(100));
        let second = clock.snapshot().expect("still loaded").position;
        assert_eq!(first, second);
        assert!(event_rx.try_recv().is_err());
    }

    #[test]
    fn fatality_is_only_for_disconnection() {
        assert!(PlayerError::Disconnected("gone".to_string()).is_fatal());
        assert!(!PlayerError::Video("bad stream".to_string()).is_fatal());
    }
}
