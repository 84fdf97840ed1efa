use std::{
    sync::{
        Arc,
        mpsc::{Receiver, Sender},
    },
    time::{Duration, Instant},
};

use crate::{config::Config, fc, ui};
use fc::{
    feed::HttpThumbnailSource,
    flipwall_state::PlaylistId,
    grid::DisplayMetrics,
    player::HttpVideoPlayer,
    tokio_thread::TokioThread,
};

pub struct App {
    pub config: Config,
    pub wall: Option<fc::Wall>,
    pub ui_state: ui::UiState,
    client: Arc<fc::ff::Client>,
    tokio_thread: TokioThread,
    event_tx: Sender<fc::WallEvent>,
    event_rx: Receiver<fc::WallEvent>,
    /// Metrics the current wall was configured for; a mismatch on a later
    /// frame means the display changed and the wall must be rebuilt.
    wall_metrics: Option<DisplayMetrics>,
    was_focused: bool,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let ui_state = ui::initialize(cc, &config);
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let client = Arc::new(fc::ff::Client::new(config.server.base_url.clone()));

        Self {
            config,
            wall: None,
            ui_state,
            client,
            tokio_thread: TokioThread::new(),
            event_tx,
            event_rx,
            wall_metrics: None,
            was_focused: true,
        }
    }

    /// Build (or rebuild) the wall for the current display, and resume the
    /// last session's playlist if there is one.
    fn ensure_wall(&mut self, ctx: &egui::Context) {
        let density = ctx.pixels_per_point();
        let rect = ctx.screen_rect();
        let metrics = DisplayMetrics {
            width_px: (rect.width() * density) as u32,
            height_px: (rect.height() * density) as u32,
            density,
        };
        if metrics.width_px == 0 || metrics.height_px == 0 {
            return;
        }

        let unchanged = self.wall_metrics.is_some_and(|m| {
            m.width_px == metrics.width_px
                && m.height_px == metrics.height_px
                && m.density == metrics.density
        });
        if self.wall.is_some() && unchanged {
            return;
        }

        tracing::info!(
            width = metrics.width_px,
            height = metrics.height_px,
            density = metrics.density,
            "building wall"
        );
        if let Some(wall) = &mut self.wall {
            wall.reset();
        }
        self.wall = Some(fc::Wall::new(
            metrics,
            &self.config.wall,
            self.event_tx.clone(),
        ));
        self.wall_metrics = Some(metrics);
        self.ui_state.textures.clear(ctx);

        if let Some(playlist_id) = self.config.session.last_playlist_id.clone() {
            self.start_session(playlist_id);
        }
    }

    /// Start a fresh session on the given playlist, tearing down any running
    /// one first.
    pub fn start_session(&mut self, playlist_id: PlaylistId) {
        // The channel outlives sessions; events the old collaborators
        // enqueued before their release must not reach the new session.
        drain_stale_events(&self.event_rx);

        let Some(wall) = &mut self.wall else {
            return;
        };

        let feed = HttpThumbnailSource::new(
            self.client.clone(),
            playlist_id.clone(),
            self.tokio_thread.handle(),
            self.event_tx.clone(),
        );
        let player = HttpVideoPlayer::new(
            self.client.clone(),
            self.tokio_thread.handle(),
            self.event_tx.clone(),
        );

        tracing::info!(%playlist_id, "starting session");
        wall.start_session(Box::new(feed), Box::new(player));
    }

    /// Persist the playlist choice and restart on it. Called by the picker.
    pub fn select_playlist(&mut self, playlist_id: PlaylistId) {
        self.config.session.last_playlist_id = Some(playlist_id.clone());
        self.config.session.first_run = false;
        self.config.save();
        self.start_session(playlist_id);
    }

    fn handle_focus(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.focused);
        if focused == self.was_focused {
            return;
        }
        self.was_focused = focused;

        let Some(wall) = &mut self.wall else {
            return;
        };
        if focused {
            tracing::debug!("focus regained; resuming playback");
            wall.resume_playback();
        } else {
            tracing::debug!("focus lost; pausing playback");
            wall.pause_playback();
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::P)) {
            self.ui_state.picker.open = !self.ui_state.picker.open;
            if self.config.session.first_run {
                self.config.session.first_run = false;
                self.config.save();
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            if let Some(wall) = &mut self.wall {
                match wall.playback_snapshot() {
                    Some(snapshot) if snapshot.paused => wall.resume_playback(),
                    Some(_) => wall.pause_playback(),
                    None => {}
                }
            }
        }
    }
}

fn drain_stale_events(event_rx: &Receiver<fc::WallEvent>) {
    let drained = event_rx.try_iter().count();
    if drained > 0 {
        tracing::debug!(drained, "dropped events from the previous session");
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_wall(ctx);

        if let Some(wall) = &mut self.wall {
            for event in self.event_rx.try_iter() {
                wall.handle_event(event);
            }
            wall.pump(Instant::now());
        }

        self.handle_focus(ctx);
        self.handle_keys(ctx);

        self.render(ctx);

        // Smooth repaints while a transition runs; a lazy cadence otherwise,
        // enough to pick up ticker and network events promptly.
        let animating = self
            .wall
            .as_ref()
            .is_some_and(|wall| wall.animation().is_running());
        if animating {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_secs_f32(
                self.config.general.repaint_secs.max(0.05),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc::flipwall_state::{Thumbnail, VideoId};

    #[test]
    fn stale_events_are_dropped_before_a_new_session() {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        // Events a superseded feed and player left behind in the channel.
        event_tx
            .send(fc::WallEvent::ThumbnailReady(Thumbnail::new(
                VideoId::new("oldvid01"),
                &b"jpeg"[..],
            )))
            .unwrap();
        event_tx
            .send(fc::WallEvent::PlayerLoaded(Some(VideoId::new("oldvid01"))))
            .unwrap();

        drain_stale_events(&event_rx);

        assert!(event_rx.try_recv().is_err());
    }
}
