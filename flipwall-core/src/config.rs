use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::TransitionStyle;

/// The player surface cannot be smaller than 110dp high; this bounds how many
/// rows fit on a given display.
pub const MIN_TILE_HEIGHT_DP: f32 = 110.0;

/// Fallback row count when the preference is absent or unparseable.
pub const DEFAULT_ROW_COUNT: u32 = 4;

/// Base inter-tile padding in dp; border preferences scale this.
pub const INTER_TILE_PADDING_DP: u32 = 5;

/// Thumbnails have a 16:9 aspect ratio.
pub const TILE_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// Duration of the very first round of flip-ins, before the wall is populated.
pub const INITIAL_FLIP_DURATION: Duration = Duration::from_millis(100);

/// Duration of a normal flip transition.
pub const FLIP_DURATION: Duration = Duration::from_millis(500);

/// Cadence of the periodic tile advance.
pub const FLIP_PERIOD: Duration = Duration::from_millis(2000);

/// Wall preferences as stored in the config file. All values are kept as
/// strings: malformed ones silently fall back to defaults rather than failing
/// the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WallConfig {
    /// Transition style: one of `flip`, `fade`, `slide-horizontal`,
    /// `slide-vertical`.
    pub effect: String,
    /// Tile border: one of `none`, `thin`, `thick`.
    pub border: String,
    /// Preferred row count; clamped to what fits on the display.
    pub rows: String,
}
impl Default for WallConfig {
    fn default() -> Self {
        Self {
            effect: TransitionStyle::Flip.as_str().to_string(),
            border: TileBorder::Thin.as_str().to_string(),
            rows: DEFAULT_ROW_COUNT.to_string(),
        }
    }
}
impl WallConfig {
    /// The configured transition style, falling back to flip.
    pub fn transition_style(&self) -> TransitionStyle {
        TransitionStyle::from_pref(&self.effect)
    }

    /// The configured tile border, falling back to thin.
    pub fn tile_border(&self) -> TileBorder {
        TileBorder::from_pref(&self.border)
    }

    /// The configured row count, falling back to [`DEFAULT_ROW_COUNT`] when
    /// the value is not a positive integer.
    pub fn row_preference(&self) -> u32 {
        match self.rows.trim().parse::<u32>() {
            Ok(rows) if rows > 0 => rows,
            _ => DEFAULT_ROW_COUNT,
        }
    }

    /// The inter-tile padding in dp implied by the border preference.
    pub fn padding_dp(&self) -> u32 {
        self.tile_border().padding_dp()
    }
}

/// How much space to leave between tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileBorder {
    /// Tiles touch each other.
    None,
    /// The base padding.
    #[default]
    Thin,
    /// Twice the base padding.
    Thick,
}
impl TileBorder {
    pub fn from_pref(value: &str) -> Self {
        match value {
            "none" => TileBorder::None,
            "thin" => TileBorder::Thin,
            "thick" => TileBorder::Thick,
            _ => TileBorder::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileBorder::None => "none",
            TileBorder::Thin => "thin",
            TileBorder::Thick => "thick",
        }
    }

    pub fn padding_dp(&self) -> u32 {
        match self {
            TileBorder::None => 0,
            TileBorder::Thin => INTER_TILE_PADDING_DP,
            TileBorder::Thick => INTER_TILE_PADDING_DP * 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_preference_parses_positive_integers() {
        let config = WallConfig {
            rows: "3".to_string(),
            ..Default::default()
        };
        assert_eq!(config.row_preference(), 3);
    }

    #[test]
    fn row_preference_falls_back_on_garbage() {
        for bad in ["", "lots", "-2", "0", "4.5"] {
            let config = WallConfig {
                rows: bad.to_string(),
                ..Default::default()
            };
            assert_eq!(config.row_preference(), DEFAULT_ROW_COUNT, "input {bad:?}");
        }
    }

    #[test]
    fn border_maps_to_padding() {
        assert_eq!(TileBorder::from_pref("none").padding_dp(), 0);
        assert_eq!(TileBorder::from_pref("thin").padding_dp(), 5);
        assert_eq!(TileBorder::from_pref("thick").padding_dp(), 10);
        // Unknown values fall back to thin.
        assert_eq!(TileBorder::from_pref("ornate").padding_dp(), 5);
    }
}
