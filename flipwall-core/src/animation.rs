use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

/// The transition used when a tile's content is replaced.
///
/// Every style shares one sequencing contract: the outgoing image's exit
/// transition begins at `start()`, and the incoming image's entry transition
/// begins once `duration` has elapsed. Slide-vertical deliberately overrides
/// this and runs both at the same time; fade has no exit transition at all
/// (the incoming image fades in over the outgoing one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionStyle {
    #[default]
    Flip,
    Fade,
    SlideHorizontal,
    SlideVertical,
}
impl TransitionStyle {
    pub fn from_pref(value: &str) -> Self {
        match value {
            "flip" => TransitionStyle::Flip,
            "fade" => TransitionStyle::Fade,
            "slide-horizontal" => TransitionStyle::SlideHorizontal,
            "slide-vertical" => TransitionStyle::SlideVertical,
            _ => TransitionStyle::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Flip => "flip",
            TransitionStyle::Fade => "fade",
            TransitionStyle::SlideHorizontal => "slide-horizontal",
            TransitionStyle::SlideVertical => "slide-vertical",
        }
    }

    /// Whether entry and exit transitions run simultaneously rather than
    /// entry starting after `duration`.
    fn simultaneous(&self) -> bool {
        matches!(self, TransitionStyle::SlideVertical)
    }

    /// Whether the outgoing image animates at all.
    fn has_exit(&self) -> bool {
        !matches!(self, TransitionStyle::Fade)
    }
}

/// Transform to apply to one image of the transition when rendering a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    /// Rotation around the vertical axis, in degrees.
    pub rotation_y_deg: f32,
    /// 0.0 = transparent, 1.0 = opaque.
    pub opacity: f32,
    /// Translation relative to the tile position, in pixels.
    pub offset: (f32, f32),
    /// Uniform scale about the tile center.
    pub scale: f32,
}
impl TileTransform {
    const IDENTITY: Self = Self {
        rotation_y_deg: 0.0,
        opacity: 1.0,
        offset: (0.0, 0.0),
        scale: 1.0,
    };
}

/// One rendered frame of a running transition.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub position: (f32, f32),
    /// `None` once the outgoing image should no longer be drawn.
    pub outgoing: Option<(Arc<[u8]>, TileTransform)>,
    /// `None` until the incoming image's entry transition has begun.
    pub incoming: Option<(Arc<[u8]>, TileTransform)>,
}

/// Emitted exactly once per `start()`, when both transitions have finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCompleted;

/// Drives a single reusable tile transition between an outgoing and incoming
/// image at a given screen position.
///
/// The controller is sampled, not callback-driven: the frontend calls
/// [`TileAnimation::tick`] once per frame and renders [`TileAnimation::frame`].
/// Re-entrant `start()` calls before completion are a caller contract
/// violation; the coordinator never issues one.
pub struct TileAnimation {
    style: TransitionStyle,
    duration: Duration,
    tile_width: u32,
    tile_height: u32,
    position: (f32, f32),
    incoming: Option<Arc<[u8]>>,
    outgoing: Option<Arc<[u8]>>,
    started_at: Option<Instant>,
    start_count: u64,
}

impl TileAnimation {
    pub fn new(style: TransitionStyle, duration: Duration, tile_width: u32, tile_height: u32) -> Self {
        Self {
            style,
            duration,
            tile_width,
            tile_height,
            position: (0.0, 0.0),
            incoming: None,
            outgoing: None,
            started_at: None,
            start_count: 0,
        }
    }

    pub fn style(&self) -> TransitionStyle {
        self.style
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = (x, y);
    }

    pub fn set_incoming_image(&mut self, image: Arc<[u8]>) {
        self.incoming = Some(image);
    }

    pub fn set_outgoing_image(&mut self, image: Option<Arc<[u8]>>) {
        self.outgoing = image;
    }

    /// Begin the transition. Exactly one completion will be observable via
    /// [`Self::tick`].
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_some() {
            tracing::warn!("animation restarted while still running");
        }
        self.started_at = Some(now);
        self.start_count += 1;
        tracing::debug!(style = self.style.as_str(), "animation started");
    }

    /// Stop without completing; used when the overlay is torn down.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// How many times the transition has been started over its lifetime.
    pub fn start_count(&self) -> u64 {
        self.start_count
    }

    fn total_duration(&self) -> Duration {
        if self.style.simultaneous() {
            self.duration
        } else {
            // Entry begins only after the exit's duration has elapsed.
            self.duration * 2
        }
    }

    /// Advance the clock; returns the completion marker once both
    /// transitions have finished. The running flag clears on completion, so
    /// repeated ticks report at most one completion per start.
    pub fn tick(&mut self, now: Instant) -> Option<AnimationCompleted> {
        let started_at = self.started_at?;
        if now.duration_since(started_at) >= self.total_duration() {
            self.started_at = None;
            tracing::debug!(style = self.style.as_str(), "animation completed");
            return Some(AnimationCompleted);
        }
        None
    }

    /// Sample the transforms for rendering. `None` while not running.
    pub fn frame(&self, now: Instant) -> Option<AnimationFrame> {
        let started_at = self.started_at?;
        let elapsed = now.duration_since(started_at);

        let exit_progress = progress(elapsed, Duration::ZERO, self.duration);
        let entry_delay = if self.style.simultaneous() {
            Duration::ZERO
        } else {
            self.duration
        };
        let entry_progress = if elapsed >= entry_delay {
            Some(progress(elapsed, entry_delay, self.duration))
        } else {
            None
        };

        let outgoing = self.outgoing.as_ref().map(|image| {
            let transform = if self.style.has_exit() {
                self.exit_transform(accelerate(exit_progress))
            } else {
                TileTransform::IDENTITY
            };
            (image.clone(), transform)
        });
        let incoming = match (&self.incoming, entry_progress) {
            (Some(image), Some(p)) => Some((image.clone(), self.entry_transform(accelerate(p)))),
            _ => None,
        };

        Some(AnimationFrame {
            position: self.position,
            outgoing,
            incoming,
        })
    }

    fn exit_transform(&self, t: f32) -> TileTransform {
        match self.style {
            TransitionStyle::Flip => TileTransform {
                // Fold away: 0 to 90 degrees, scaling down.
                rotation_y_deg: 90.0 * t,
                scale: 1.0 - 0.25 * t,
                ..TileTransform::IDENTITY
            },
            TransitionStyle::Fade => TileTransform::IDENTITY,
            TransitionStyle::SlideHorizontal => TileTransform {
                // Out to the left.
                offset: (-(self.tile_width as f32) * t, 0.0),
                ..TileTransform::IDENTITY
            },
            TransitionStyle::SlideVertical => TileTransform {
                // Out through the bottom.
                offset: (0.0, self.tile_height as f32 * t),
                ..TileTransform::IDENTITY
            },
        }
    }

    fn entry_transform(&self, t: f32) -> TileTransform {
        match self.style {
            TransitionStyle::Flip => TileTransform {
                // Unfold: -90 back to 0 degrees, scaling up.
                rotation_y_deg: -90.0 * (1.0 - t),
                scale: 0.75 + 0.25 * t,
                ..TileTransform::IDENTITY
            },
            TransitionStyle::Fade => TileTransform {
                opacity: t,
                ..TileTransform::IDENTITY
            },
            TransitionStyle::SlideHorizontal => TileTransform {
                // In from the right.
                offset: (self.tile_width as f32 * (1.0 - t), 0.0),
                ..TileTransform::IDENTITY
            },
            TransitionStyle::SlideVertical => TileTransform {
                // In from the top.
                offset: (0.0, -(self.tile_height as f32) * (1.0 - t)),
                ..TileTransform::IDENTITY
            },
        }
    }
}

/// Linear progress of a phase beginning at `delay` and lasting `duration`,
/// clamped to 0..=1.
fn progress(elapsed: Duration, delay: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let into = elapsed.saturating_sub(delay);
    (into.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Accelerating interpolation: slow start, fast finish.
fn accelerate(t: f32) -> f32 {
    t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE_W: u32 = 480;
    const TILE_H: u32 = 270;

    fn animation(style: TransitionStyle) -> TileAnimation {
        let mut animation =
            TileAnimation::new(style, Duration::from_millis(500), TILE_W, TILE_H);
        animation.set_incoming_image(Arc::from(&b"in"[..]));
        animation.set_outgoing_image(Some(Arc::from(&b"out"[..])));
        animation
    }

    #[test]
    fn emits_exactly_one_completion_per_start() {
        let mut anim = animation(TransitionStyle::Flip);
        let t0 = Instant::now();
        anim.start(t0);

        assert!(anim.tick(t0 + Duration::from_millis(500)).is_none());
        assert!(anim.tick(t0 + Duration::from_millis(1000)).is_some());
        // Further ticks after completion report nothing.
        assert!(anim.tick(t0 + Duration::from_millis(2000)).is_none());
        assert!(!anim.is_running());
    }

    #[test]
    fn entry_begins_after_duration_for_staggered_styles() {
        for style in [
            TransitionStyle::Flip,
            TransitionStyle::Fade,
            TransitionStyle::SlideHorizontal,
        ] {
            let mut anim = animation(style);
            let t0 = Instant::now();
            anim.start(t0);

            let early = anim.frame(t0 + Duration::from_millis(250)).unwrap();
            assert!(early.incoming.is_none(), "style {style:?}");

            let late = anim.frame(t0 + Duration::from_millis(750)).unwrap();
            assert!(late.incoming.is_some(), "style {style:?}");
        }
    }

    #[test]
    fn slide_vertical_runs_both_transitions_simultaneously() {
        let mut anim = animation(TransitionStyle::SlideVertical);
        let t0 = Instant::now();
        anim.start(t0);

        let frame = anim.frame(t0 + Duration::from_millis(100)).unwrap();
        assert!(frame.outgoing.is_some());
        assert!(frame.incoming.is_some());

        // And the whole transition is over after a single duration.
        assert!(anim.tick(t0 + Duration::from_millis(500)).is_some());
    }

    #[test]
    fn fade_has_no_exit_transition() {
        let mut anim = animation(TransitionStyle::Fade);
        let t0 = Instant::now();
        anim.start(t0);

        let frame = anim.frame(t0 + Duration::from_millis(400)).unwrap();
        let (_, outgoing) = frame.outgoing.unwrap();
        assert_eq!(outgoing, TileTransform::IDENTITY);
    }

    #[test]
    fn flip_rotations_meet_at_the_right_angles() {
        let mut anim = animation(TransitionStyle::Flip);
        let t0 = Instant::now();
        anim.start(t0);

        let start = anim.frame(t0).unwrap();
        assert_eq!(start.outgoing.unwrap().1.rotation_y_deg, 0.0);

        // Exit fully folded by the end of the first phase.
        let mid = anim.frame(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(mid.outgoing.unwrap().1.rotation_y_deg, 90.0);
        // Entry starts fully folded the other way.
        assert_eq!(mid.incoming.unwrap().1.rotation_y_deg, -90.0);
    }

    #[test]
    fn slide_horizontal_enters_from_the_right() {
        let mut anim = animation(TransitionStyle::SlideHorizontal);
        let t0 = Instant::now();
        anim.start(t0);

        let frame = anim.frame(t0 + Duration::from_millis(500)).unwrap();
        let (_, incoming) = frame.incoming.unwrap();
        assert_eq!(incoming.offset.0, TILE_W as f32);

        let frame = anim.frame(t0 + Duration::from_millis(999)).unwrap();
        let (_, incoming) = frame.incoming.unwrap();
        // Nearly home by the end of the entry transition.
        assert!(incoming.offset.0 < TILE_W as f32 * 0.01);
    }

    #[test]
    fn frame_is_none_when_not_running() {
        let anim = animation(TransitionStyle::Flip);
        assert!(anim.frame(Instant::now()).is_none());
    }
}
