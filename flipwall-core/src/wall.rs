use std::{
    sync::mpsc::Sender,
    time::Instant,
};

use flipwall_state::{Thumbnail, VideoId};

use crate::{
    animation::TileAnimation,
    config::{FLIP_DURATION, FLIP_PERIOD, INITIAL_FLIP_DURATION, WallConfig},
    feed::ThumbnailSource,
    grid::{DisplayMetrics, WallGrid},
    player::{PlayerError, PlaybackSnapshot, VideoPlayer},
    ticker::FlipTicker,
};

/// Consecutive thumbnail failures tolerated before the feed is left alone.
/// An empty or fully broken playlist would otherwise retry forever.
const MAX_FEED_ERROR_STREAK: u32 = 8;

/// Where the wall is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPhase {
    /// No session. The initial state, and the state forced by a fatal
    /// playback failure or a playlist change.
    Uninitialized,
    /// The first round of flip-ins, populating every tile.
    LoadingThumbnails,
    /// Idle between videos; the next thumbnail to arrive picks the video.
    VideoFlippedOut,
    /// A video is mid-cue. No tile may flip until it loads or fails.
    VideoLoading,
    /// The video is ready; the next tick flips its thumbnail onto a fully
    /// visible tile and starts playback.
    VideoCued,
    /// The video surface is live. Background tiles keep refreshing.
    VideoPlaying,
    /// Playback finished; the next tick returns the video's tile to
    /// thumbnail display.
    VideoEnded,
    /// The flip restoring the video's tile is running.
    VideoBeingFlippedOut,
}

/// Every input the coordinator reacts to. Collaborators deliver their
/// completions as events on a single channel, so the coordinator never sees
/// concurrent mutation.
#[derive(Debug, Clone)]
pub enum WallEvent {
    /// Periodic advance request from the ticker.
    Tick,
    /// The feed produced a thumbnail.
    ThumbnailReady(Thumbnail),
    /// The feed failed to produce one.
    ThumbnailError(String),
    /// The running tile transition finished.
    AnimationCompleted,
    /// The player finished cueing a video.
    PlayerLoaded(Option<VideoId>),
    /// Playback ran to completion.
    PlayerEnded,
    /// Playback failed.
    PlayerError(PlayerError),
}

/// The wall coordinator: owns the grid, the animation controller, and the
/// session state, and drives the feed and player through their traits.
///
/// All mutation happens in [`Wall::handle_event`]; the frontend drains the
/// event channel each frame and feeds the events through, then calls
/// [`Wall::pump`] so the animation clock can report completion.
pub struct Wall {
    phase: WallPhase,
    grid: WallGrid,
    animation: TileAnimation,
    feed: Option<Box<dyn ThumbnailSource>>,
    player: Option<Box<dyn VideoPlayer>>,
    ticker: Option<FlipTicker>,
    pending_thumbnail: Option<Thumbnail>,
    /// Tile the animation is currently flipping.
    flipping_tile: Option<(u32, u32)>,
    /// Tile hosting (or most recently hosting) the video surface.
    video_tile: Option<(u32, u32)>,
    current_video: Option<VideoId>,
    video_surface_visible: bool,
    feed_error_streak: u32,
    event_tx: Sender<WallEvent>,
}

impl Wall {
    pub fn new(metrics: DisplayMetrics, config: &WallConfig, event_tx: Sender<WallEvent>) -> Self {
        let grid = WallGrid::configure(metrics, config.row_preference(), config.padding_dp());
        let (tile_width, tile_height) = grid.tile_size();
        let animation = TileAnimation::new(
            config.transition_style(),
            INITIAL_FLIP_DURATION,
            tile_width,
            tile_height,
        );

        Self {
            phase: WallPhase::Uninitialized,
            grid,
            animation,
            feed: None,
            player: None,
            ticker: None,
            pending_thumbnail: None,
            flipping_tile: None,
            video_tile: None,
            current_video: None,
            video_surface_visible: false,
            feed_error_streak: 0,
            event_tx,
        }
    }

    /// Begin a session with the given collaborators: request the first
    /// thumbnail and start the periodic ticker. Any previous session is torn
    /// down first.
    pub fn start_session(&mut self, feed: Box<dyn ThumbnailSource>, player: Box<dyn VideoPlayer>) {
        self.reset();

        self.feed = Some(feed);
        self.player = Some(player);
        self.phase = WallPhase::LoadingThumbnails;
        self.animation.set_duration(INITIAL_FLIP_DURATION);
        self.ticker = Some(FlipTicker::new(FLIP_PERIOD, self.event_tx.clone()));

        tracing::info!("wall session started");
        if let Some(feed) = &mut self.feed {
            feed.first();
        }
    }

    /// Tear the session down: stop the ticker, release the collaborators,
    /// and return to [`WallPhase::Uninitialized`]. Called on playlist change
    /// and UI teardown; stale completions from the released collaborators
    /// must no longer be delivered.
    pub fn reset(&mut self) {
        self.ticker = None;
        if let Some(mut feed) = self.feed.take() {
            feed.release();
        }
        if let Some(mut player) = self.player.take() {
            player.release();
        }
        self.animation.reset();
        // A tile left hidden by a mid-flip or a live video surface, or the
        // loaded flags from the old playlist, must not leak into the next
        // session.
        self.grid.clear();
        self.pending_thumbnail = None;
        self.flipping_tile = None;
        self.video_tile = None;
        self.current_video = None;
        self.video_surface_visible = false;
        self.feed_error_streak = 0;
        self.phase = WallPhase::Uninitialized;
    }

    pub fn phase(&self) -> WallPhase {
        self.phase
    }

    pub fn grid(&self) -> &WallGrid {
        &self.grid
    }

    pub fn animation(&self) -> &TileAnimation {
        &self.animation
    }

    /// The tile hosting the video surface, while it is visible.
    pub fn video_surface_tile(&self) -> Option<(u32, u32)> {
        self.video_surface_visible.then_some(self.video_tile).flatten()
    }

    /// The video currently cued or playing.
    pub fn current_video(&self) -> Option<&VideoId> {
        self.current_video.as_ref()
    }

    pub fn playback_snapshot(&self) -> Option<PlaybackSnapshot> {
        self.player.as_ref().and_then(|player| player.snapshot())
    }

    pub fn pause_playback(&mut self) {
        if self.phase == WallPhase::VideoPlaying {
            if let Some(player) = &mut self.player {
                player.pause();
            }
        }
    }

    pub fn resume_playback(&mut self) {
        if self.phase == WallPhase::VideoPlaying {
            if let Some(player) = &mut self.player {
                player.play();
            }
        }
    }

    /// Advance the animation clock, turning its completion into an event.
    pub fn pump(&mut self, now: Instant) {
        if self.animation.tick(now).is_some() {
            self.handle_event(WallEvent::AnimationCompleted);
        }
    }

    /// The single transition function. Every external happening funnels
    /// through here on the frontend thread.
    pub fn handle_event(&mut self, event: WallEvent) {
        match event {
            WallEvent::Tick => self.flip_next(),
            WallEvent::ThumbnailReady(thumbnail) => self.on_thumbnail_ready(thumbnail),
            WallEvent::ThumbnailError(reason) => self.on_thumbnail_error(reason),
            WallEvent::AnimationCompleted => self.on_animation_completed(),
            WallEvent::PlayerLoaded(video_id) => self.on_player_loaded(video_id),
            WallEvent::PlayerEnded => self.on_playback_finished(),
            WallEvent::PlayerError(error) => self.on_player_error(error),
        }
    }

    /// The tile-advance routine. A no-op when no thumbnail is pending, when
    /// a video is mid-cue, when a transition is still running, or when no
    /// tile is eligible; the ticker fires again regardless.
    fn flip_next(&mut self) {
        match self.phase {
            WallPhase::Uninitialized | WallPhase::VideoLoading => return,
            _ => {}
        }
        if self.pending_thumbnail.is_none() || self.animation.is_running() {
            return;
        }

        let target = if self.phase == WallPhase::VideoEnded {
            // Return the video's tile to thumbnail display. A cue failure
            // leaves no video tile; fall back to a normal target so the
            // cycle still resumes.
            self.video_tile.or_else(|| self.grid.next_load_target(false))
        } else {
            self.grid.next_load_target(self.phase == WallPhase::VideoCued)
        };
        let Some((col, row)) = target else {
            return;
        };
        let Some(thumbnail) = self.pending_thumbnail.take() else {
            return;
        };

        let (x, y) = self.grid.position(col, row);
        self.animation.set_position(x, y);
        self.animation.set_outgoing_image(self.grid.image(col, row));
        self.animation.set_incoming_image(thumbnail.image.clone());
        self.grid.set_image(col, row, thumbnail.image);
        self.grid.hide_image(col, row);
        self.flipping_tile = Some((col, row));

        if self.phase == WallPhase::VideoEnded {
            self.phase = WallPhase::VideoBeingFlippedOut;
        }

        tracing::debug!(col, row, phase = ?self.phase, "flipping tile");
        self.animation.start(Instant::now());
    }

    fn on_thumbnail_ready(&mut self, thumbnail: Thumbnail) {
        self.feed_error_streak = 0;
        let video_id = thumbnail.video_id.clone();
        self.pending_thumbnail = Some(thumbnail);

        match self.phase {
            // The first round of flip-ins is driven by arrival, not by the
            // ticker.
            WallPhase::LoadingThumbnails => self.flip_next(),
            WallPhase::VideoFlippedOut => {
                tracing::debug!(%video_id, "cueing next video");
                self.phase = WallPhase::VideoLoading;
                self.current_video = Some(video_id.clone());
                if let Some(player) = &mut self.player {
                    player.cue(video_id);
                }
            }
            _ => {}
        }
    }

    fn on_thumbnail_error(&mut self, reason: String) {
        self.feed_error_streak += 1;
        if self.feed_error_streak >= MAX_FEED_ERROR_STREAK {
            tracing::error!(
                reason,
                streak = self.feed_error_streak,
                "thumbnail feed keeps failing; giving up on it"
            );
            return;
        }
        tracing::warn!(reason, "thumbnail retrieval failed; trying the next entry");
        self.request_next_thumbnail();
    }

    fn on_animation_completed(&mut self) {
        let Some((col, row)) = self.flipping_tile.take() else {
            return;
        };
        self.grid.show_image(col, row);
        self.animation.reset();
        self.request_next_thumbnail();

        match self.phase {
            WallPhase::VideoBeingFlippedOut => {
                self.video_tile = None;
                self.phase = WallPhase::VideoFlippedOut;
            }
            WallPhase::VideoCued => {
                self.video_tile = Some((col, row));
                self.grid.hide_image(col, row);
                self.video_surface_visible = true;
                if let Some(player) = &mut self.player {
                    player.play();
                }
                tracing::info!(col, row, "video playing");
                self.phase = WallPhase::VideoPlaying;
            }
            WallPhase::LoadingThumbnails if self.grid.all_images_loaded() => {
                tracing::info!("wall populated");
                self.phase = WallPhase::VideoFlippedOut;
                self.animation.set_duration(FLIP_DURATION);
                self.flip_next();
            }
            _ => {}
        }
    }

    fn on_player_loaded(&mut self, video_id: Option<VideoId>) {
        if video_id.is_some() && self.phase == WallPhase::VideoLoading {
            self.phase = WallPhase::VideoCued;
        }
    }

    fn on_playback_finished(&mut self) {
        self.current_video = None;
        self.video_surface_visible = false;
        if let Some((col, row)) = self.video_tile {
            self.grid.show_image(col, row);
        }
        self.phase = WallPhase::VideoEnded;
    }

    fn on_player_error(&mut self, error: PlayerError) {
        if error.is_fatal() {
            tracing::error!(%error, "fatal playback error; tearing the session down");
            self.reset();
        } else {
            tracing::warn!(%error, "video failed; resuming the cycle");
            self.on_playback_finished();
        }
    }

    /// Advance the feed, wrapping back to the start when it runs out.
    fn request_next_thumbnail(&mut self) {
        let Some(feed) = &mut self.feed else {
            return;
        };
        if feed.has_next() {
            feed.next();
        } else {
            feed.first();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, mpsc::Receiver};

    use super::*;

    #[derive(Default)]
    struct FeedCalls {
        next: usize,
        first: usize,
        released: bool,
        has_next: bool,
    }
    struct MockFeed(Arc<Mutex<FeedCalls>>);
    impl ThumbnailSource for MockFeed {
        fn has_next(&self) -> bool {
            self.0.lock().unwrap().has_next
        }
        fn next(&mut self) {
            self.0.lock().unwrap().next += 1;
        }
        fn first(&mut self) {
            self.0.lock().unwrap().first += 1;
        }
        fn release(&mut self) {
            self.0.lock().unwrap().released = true;
        }
    }

    #[derive(Default)]
    struct PlayerCalls {
        cued: Vec<VideoId>,
        play: usize,
        pause: usize,
        released: bool,
    }
    struct MockPlayer(Arc<Mutex<PlayerCalls>>);
    impl VideoPlayer for MockPlayer {
        fn cue(&mut self, video_id: VideoId) {
            self.0.lock().unwrap().cued.push(video_id);
        }
        fn play(&mut self) {
            self.0.lock().unwrap().play += 1;
        }
        fn pause(&mut self) {
            self.0.lock().unwrap().pause += 1;
        }
        fn release(&mut self) {
            self.0.lock().unwrap().released = true;
        }
        fn snapshot(&self) -> Option<PlaybackSnapshot> {
            None
        }
    }

    struct Fixture {
        wall: Wall,
        feed: Arc<Mutex<FeedCalls>>,
        player: Arc<Mutex<PlayerCalls>>,
        _event_rx: Receiver<WallEvent>,
    }

    fn fixture() -> Fixture {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        // 800x450 at density 1: 2 rows of 220px tiles, 3 columns, with the
        // last column overhanging the right edge.
        let metrics = DisplayMetrics {
            width_px: 800,
            height_px: 450,
            density: 1.0,
        };
        let config = WallConfig {
            rows: "2".to_string(),
            ..Default::default()
        };
        let mut wall = Wall::new(metrics, &config, event_tx);

        let feed = Arc::new(Mutex::new(FeedCalls {
            has_next: true,
            ..Default::default()
        }));
        let player = Arc::new(Mutex::new(PlayerCalls::default()));
        wall.start_session(
            Box::new(MockFeed(feed.clone())),
            Box::new(MockPlayer(player.clone())),
        );

        Fixture {
            wall,
            feed,
            player,
            _event_rx: event_rx,
        }
    }

    fn thumb(id: &str) -> Thumbnail {
        Thumbnail::new(VideoId::new(id), &b"jpeg"[..])
    }

    /// Drive the initial population round to completion.
    fn populate(f: &mut Fixture) {
        let tiles = f.wall.grid().cols() * f.wall.grid().rows();
        for i in 0..tiles {
            f.wall
                .handle_event(WallEvent::ThumbnailReady(thumb(&format!("video{i}"))));
            f.wall.handle_event(WallEvent::AnimationCompleted);
        }
    }

    /// Walk a populated wall up to a playing video.
    fn play_video(f: &mut Fixture, id: &str) -> (u32, u32) {
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb(id)));
        f.wall
            .handle_event(WallEvent::PlayerLoaded(Some(VideoId::new(id))));
        f.wall.handle_event(WallEvent::Tick);
        f.wall.handle_event(WallEvent::AnimationCompleted);
        assert_eq!(f.wall.phase(), WallPhase::VideoPlaying);
        f.wall.video_surface_tile().expect("video surface placed")
    }

    #[test]
    fn session_start_requests_the_first_thumbnail() {
        let f = fixture();
        assert_eq!(f.wall.phase(), WallPhase::LoadingThumbnails);
        assert_eq!(f.feed.lock().unwrap().first, 1);
        assert_eq!(f.feed.lock().unwrap().next, 0);
    }

    #[test]
    fn population_round_fills_every_tile_then_settles() {
        let mut f = fixture();
        let tiles = f.wall.grid().cols() * f.wall.grid().rows();

        for i in 0..tiles {
            assert_eq!(f.wall.phase(), WallPhase::LoadingThumbnails);
            f.wall
                .handle_event(WallEvent::ThumbnailReady(thumb(&format!("video{i}"))));
            // Arrival triggers the flip directly; the ticker is not involved.
            assert_eq!(f.wall.animation().start_count(), u64::from(i) + 1);
            f.wall.handle_event(WallEvent::AnimationCompleted);
            // Exactly one outstanding request at any time.
            assert_eq!(f.feed.lock().unwrap().next, i as usize + 1);
        }

        assert!(f.wall.grid().all_images_loaded());
        assert_eq!(f.wall.phase(), WallPhase::VideoFlippedOut);
    }

    #[test]
    fn thumbnail_after_population_cues_its_video_once() {
        let mut f = fixture();
        populate(&mut f);

        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("vid123")));

        assert_eq!(f.wall.phase(), WallPhase::VideoLoading);
        assert_eq!(f.wall.current_video(), Some(&VideoId::new("vid123")));
        let cued = f.player.lock().unwrap().cued.clone();
        assert_eq!(cued, vec![VideoId::new("vid123")]);
    }

    #[test]
    fn ticks_never_flip_while_a_video_is_loading() {
        let mut f = fixture();
        populate(&mut f);
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("vid123")));
        assert_eq!(f.wall.phase(), WallPhase::VideoLoading);

        let starts = f.wall.animation().start_count();
        for _ in 0..5 {
            f.wall.handle_event(WallEvent::Tick);
        }
        assert_eq!(f.wall.animation().start_count(), starts);
    }

    #[test]
    fn ticks_without_a_pending_thumbnail_are_no_ops() {
        let mut f = fixture();
        populate(&mut f);
        // The last flip consumed the pending thumbnail and its replacement
        // has not arrived yet.
        let starts = f.wall.animation().start_count();
        f.wall.handle_event(WallEvent::Tick);
        assert_eq!(f.wall.animation().start_count(), starts);
    }

    #[test]
    fn cued_video_lands_on_a_fully_visible_tile_and_plays() {
        let mut f = fixture();
        populate(&mut f);

        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("vid123")));
        f.wall
            .handle_event(WallEvent::PlayerLoaded(Some(VideoId::new("vid123"))));
        assert_eq!(f.wall.phase(), WallPhase::VideoCued);

        f.wall.handle_event(WallEvent::Tick);
        f.wall.handle_event(WallEvent::AnimationCompleted);

        assert_eq!(f.wall.phase(), WallPhase::VideoPlaying);
        let (col, row) = f.wall.video_surface_tile().expect("video surface placed");
        // The overhanging last column must never host the player.
        assert!(f.wall.grid().is_fully_visible(col, row));
        assert!(f.wall.grid().is_hidden(col, row));
        assert_eq!(f.player.lock().unwrap().play, 1);
    }

    #[test]
    fn background_tiles_keep_refreshing_during_playback() {
        let mut f = fixture();
        populate(&mut f);
        let video_tile = play_video(&mut f, "vid123");

        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("video9")));
        let starts = f.wall.animation().start_count();
        f.wall.handle_event(WallEvent::Tick);
        assert_eq!(f.wall.animation().start_count(), starts + 1);
        f.wall.handle_event(WallEvent::AnimationCompleted);

        // Phase and surface are untouched by background refreshes.
        assert_eq!(f.wall.phase(), WallPhase::VideoPlaying);
        assert_eq!(f.wall.video_surface_tile(), Some(video_tile));
        assert!(f.wall.grid().is_hidden(video_tile.0, video_tile.1));
    }

    #[test]
    fn ended_video_retargets_its_own_tile() {
        let mut f = fixture();
        populate(&mut f);
        let video_tile = play_video(&mut f, "vid123");

        // The replacement thumbnail arrives while the video still plays.
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("video9")));
        f.wall.handle_event(WallEvent::PlayerEnded);

        assert_eq!(f.wall.phase(), WallPhase::VideoEnded);
        assert!(f.wall.video_surface_tile().is_none());
        assert!(!f.wall.grid().is_hidden(video_tile.0, video_tile.1));

        f.wall.handle_event(WallEvent::Tick);
        assert_eq!(f.wall.phase(), WallPhase::VideoBeingFlippedOut);
        // The flip targets exactly the tile that was playing, not a fresh
        // cursor pick.
        assert!(f.wall.grid().is_hidden(video_tile.0, video_tile.1));

        f.wall.handle_event(WallEvent::AnimationCompleted);
        assert_eq!(f.wall.phase(), WallPhase::VideoFlippedOut);
        assert!(f.wall.video_surface_tile().is_none());
    }

    #[test]
    fn fatal_error_tears_the_session_down() {
        let mut f = fixture();
        populate(&mut f);
        play_video(&mut f, "vid123");

        f.wall.handle_event(WallEvent::PlayerError(PlayerError::Disconnected(
            "service gone".to_string(),
        )));

        assert_eq!(f.wall.phase(), WallPhase::Uninitialized);
        assert!(f.feed.lock().unwrap().released);
        assert!(f.player.lock().unwrap().released);
        assert!(f.wall.video_surface_tile().is_none());
    }

    #[test]
    fn recoverable_error_resumes_the_cycle_like_a_normal_ending() {
        let mut f = fixture();
        populate(&mut f);
        play_video(&mut f, "vid123");

        f.wall.handle_event(WallEvent::PlayerError(PlayerError::Video(
            "bad stream".to_string(),
        )));

        assert_eq!(f.wall.phase(), WallPhase::VideoEnded);
        assert!(!f.feed.lock().unwrap().released);
        assert!(!f.player.lock().unwrap().released);
    }

    #[test]
    fn cue_failure_still_resumes_the_cycle() {
        let mut f = fixture();
        populate(&mut f);
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("vid123")));
        assert_eq!(f.wall.phase(), WallPhase::VideoLoading);

        f.wall.handle_event(WallEvent::PlayerError(PlayerError::Video(
            "unplayable".to_string(),
        )));
        assert_eq!(f.wall.phase(), WallPhase::VideoEnded);

        // No tile ever hosted the video; the advance falls back to a normal
        // target and the wall returns to its idle phase.
        f.wall.handle_event(WallEvent::Tick);
        assert_eq!(f.wall.phase(), WallPhase::VideoBeingFlippedOut);
        f.wall.handle_event(WallEvent::AnimationCompleted);
        assert_eq!(f.wall.phase(), WallPhase::VideoFlippedOut);
    }

    #[test]
    fn thumbnail_errors_retry_by_advancing_the_feed() {
        let mut f = fixture();
        f.wall
            .handle_event(WallEvent::ThumbnailError("404".to_string()));
        f.wall
            .handle_event(WallEvent::ThumbnailError("404".to_string()));

        let calls = f.feed.lock().unwrap();
        assert_eq!(calls.next, 2);
        assert_eq!(f.wall.phase(), WallPhase::LoadingThumbnails);
    }

    #[test]
    fn persistent_thumbnail_errors_eventually_stop_retrying() {
        let mut f = fixture();
        for _ in 0..MAX_FEED_ERROR_STREAK + 4 {
            f.wall
                .handle_event(WallEvent::ThumbnailError("404".to_string()));
        }
        let retries = f.feed.lock().unwrap().next;
        assert_eq!(retries, MAX_FEED_ERROR_STREAK as usize - 1);
    }

    #[test]
    fn a_successful_thumbnail_clears_the_error_streak() {
        let mut f = fixture();
        for _ in 0..MAX_FEED_ERROR_STREAK - 2 {
            f.wall
                .handle_event(WallEvent::ThumbnailError("404".to_string()));
        }
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("video0")));
        f.wall.handle_event(WallEvent::AnimationCompleted);

        // Errors are tolerated afresh after a success.
        let before = f.feed.lock().unwrap().next;
        f.wall
            .handle_event(WallEvent::ThumbnailError("404".to_string()));
        assert_eq!(f.feed.lock().unwrap().next, before + 1);
    }

    #[test]
    fn feed_wraps_to_first_when_exhausted() {
        let mut f = fixture();
        f.feed.lock().unwrap().has_next = false;

        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("video0")));
        f.wall.handle_event(WallEvent::AnimationCompleted);

        let calls = f.feed.lock().unwrap();
        assert_eq!(calls.next, 0);
        // Once for session start, once for the wrap.
        assert_eq!(calls.first, 2);
    }

    #[test]
    fn reset_releases_everything() {
        let mut f = fixture();
        populate(&mut f);
        play_video(&mut f, "vid123");

        f.wall.reset();

        assert_eq!(f.wall.phase(), WallPhase::Uninitialized);
        assert!(f.feed.lock().unwrap().released);
        assert!(f.player.lock().unwrap().released);
    }

    #[test]
    fn new_session_starts_from_a_clean_grid() {
        let mut f = fixture();
        populate(&mut f);
        let video_tile = play_video(&mut f, "vid123");

        // Switch playlists mid-playback: a fresh session on the same wall.
        let feed = Arc::new(Mutex::new(FeedCalls {
            has_next: true,
            ..Default::default()
        }));
        let player = Arc::new(Mutex::new(PlayerCalls::default()));
        f.wall.start_session(
            Box::new(MockFeed(feed.clone())),
            Box::new(MockPlayer(player.clone())),
        );

        assert_eq!(f.wall.phase(), WallPhase::LoadingThumbnails);
        assert!(f.feed.lock().unwrap().released);
        assert!(f.player.lock().unwrap().released);
        // The old video's tile is not left as a permanent hole.
        assert!(!f.wall.grid().is_hidden(video_tile.0, video_tile.1));
        assert!(!f.wall.grid().all_images_loaded());
        assert_eq!(feed.lock().unwrap().first, 1);

        // One flip must not finish the fresh population round; the old
        // playlist's loaded flags are gone.
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("fresh0")));
        f.wall.handle_event(WallEvent::AnimationCompleted);
        assert_eq!(f.wall.phase(), WallPhase::LoadingThumbnails);
    }

    #[test]
    fn pause_and_resume_only_apply_while_playing() {
        let mut f = fixture();
        populate(&mut f);

        f.wall.pause_playback();
        assert_eq!(f.player.lock().unwrap().pause, 0);

        play_video(&mut f, "vid123");
        f.wall.pause_playback();
        f.wall.resume_playback();
        let calls = f.player.lock().unwrap();
        assert_eq!(calls.pause, 1);
        // One play for the flip-in, one for the resume.
        assert_eq!(calls.play, 2);
    }

    #[test]
    fn pump_turns_animation_completion_into_a_transition() {
        let mut f = fixture();
        f.wall.handle_event(WallEvent::ThumbnailReady(thumb("video0")));
        assert!(f.wall.animation().is_running());

        // Well past the initial transition's total duration.
        f.wall
            .pump(Instant::now() + std::time::Duration::from_secs(5));
        assert!(!f.wall.animation().is_running());
        assert_eq!(f.feed.lock().unwrap().next, 1);
    }
}
