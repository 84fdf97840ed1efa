use std::sync::Arc;

use crate::config::{DEFAULT_ROW_COUNT, MIN_TILE_HEIGHT_DP, TILE_ASPECT_RATIO};

/// Display properties read once per layout pass.
#[derive(Debug, Clone, Copy)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    /// Scale factor from dp to px.
    pub density: f32,
}

/// One grid cell. The grid exclusively owns the per-tile image handles;
/// everything else refers to tiles by (column, row).
#[derive(Default)]
struct Tile {
    image: Option<Arc<[u8]>>,
    loaded: bool,
    /// Set while a flip is animating over the tile, or while the live video
    /// surface is rendered in its place.
    hidden: bool,
}

/// The wall's tile grid: pure geometry plus per-tile image state.
///
/// Tile dimensions are derived once from display metrics and a fixed 16:9
/// aspect ratio and never change mid-cycle; resizing the display means
/// configuring a fresh grid.
pub struct WallGrid {
    cols: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    padding: u32,
    display_width: u32,
    display_height: u32,
    /// Row-major tile storage.
    tiles: Vec<Tile>,
    /// Stable cursor for `next_load_target`, so repeated calls cycle through
    /// every tile before revisiting one.
    cursor: usize,
}

impl WallGrid {
    /// Compute the grid layout for a display.
    ///
    /// Rows are bounded by both the minimum tile height and the preference:
    /// `rows = min(rows that fit, row_preference)`. Columns are chosen to
    /// cover the full display width, so the last column may overhang the
    /// right edge; `next_load_target` can exclude such tiles when a fully
    /// visible one is required.
    pub fn configure(metrics: DisplayMetrics, row_preference: u32, padding_dp: u32) -> Self {
        let height_dp = metrics.height_px as f32 / metrics.density;
        let max_rows = (height_dp / MIN_TILE_HEIGHT_DP).floor() as u32;
        let rows = max_rows.min(row_preference.max(1)).max(1);

        let padding = (metrics.density * padding_dp as f32) as u32;
        let tile_height = (metrics.height_px / rows).saturating_sub(padding).max(1);
        let tile_width = (tile_height as f32 * TILE_ASPECT_RATIO) as u32;
        let cols = (metrics.width_px as f32 / (tile_width + padding) as f32).ceil() as u32;
        let cols = cols.max(1);

        tracing::debug!(
            cols,
            rows,
            tile_width,
            tile_height,
            padding,
            "configured wall grid"
        );

        let mut tiles = Vec::new();
        tiles.resize_with((cols * rows) as usize, Tile::default);

        Self {
            cols,
            rows,
            tile_width,
            tile_height,
            padding,
            display_width: metrics.width_px,
            display_height: metrics.height_px,
            tiles,
            cursor: 0,
        }
    }

    /// A grid sized with defaults, for callers that have no preferences.
    pub fn configure_default(metrics: DisplayMetrics) -> Self {
        Self::configure(
            metrics,
            DEFAULT_ROW_COUNT,
            crate::config::INTER_TILE_PADDING_DP,
        )
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Pixel position of a tile's top-left corner.
    pub fn position(&self, col: u32, row: u32) -> (f32, f32) {
        (
            (col * (self.tile_width + self.padding)) as f32,
            (row * (self.tile_height + self.padding)) as f32,
        )
    }

    /// Select the next tile to refresh: row-major order from a stable cursor,
    /// skipping tiles that are hidden (mid-transition or hosting the video).
    ///
    /// With `require_fully_visible`, candidates are restricted to tiles whose
    /// full bounds lie within the display; a partially off-screen player
    /// surface is not allowed. Returns `None` when no tile is eligible, in
    /// which case the caller's advance is a no-op.
    pub fn next_load_target(&mut self, require_fully_visible: bool) -> Option<(u32, u32)> {
        let count = self.tiles.len();
        for offset in 0..count {
            let index = (self.cursor + offset) % count;
            let (col, row) = self.coords(index);
            if self.tiles[index].hidden {
                continue;
            }
            if require_fully_visible && !self.is_fully_visible(col, row) {
                continue;
            }
            self.cursor = (index + 1) % count;
            return Some((col, row));
        }
        None
    }

    /// Whether the tile's full bounds lie within the display.
    pub fn is_fully_visible(&self, col: u32, row: u32) -> bool {
        let (x, y) = self.position(col, row);
        x + self.tile_width as f32 <= self.display_width as f32
            && y + self.tile_height as f32 <= self.display_height as f32
    }

    pub fn set_image(&mut self, col: u32, row: u32, image: Arc<[u8]>) {
        let index = self.index(col, row);
        let tile = &mut self.tiles[index];
        tile.image = Some(image);
        tile.loaded = true;
    }

    pub fn image(&self, col: u32, row: u32) -> Option<Arc<[u8]>> {
        self.tiles[self.index(col, row)].image.clone()
    }

    pub fn hide_image(&mut self, col: u32, row: u32) {
        let index = self.index(col, row);
        self.tiles[index].hidden = true;
    }

    pub fn show_image(&mut self, col: u32, row: u32) {
        let index = self.index(col, row);
        self.tiles[index].hidden = false;
    }

    pub fn is_hidden(&self, col: u32, row: u32) -> bool {
        self.tiles[self.index(col, row)].hidden
    }

    /// True once every tile has received at least one image.
    pub fn all_images_loaded(&self) -> bool {
        self.tiles.iter().all(|tile| tile.loaded)
    }

    /// Return every tile to its initial state: no image, not loaded, not
    /// hidden, cursor at the first tile. A fresh session repopulates from
    /// scratch.
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            *tile = Tile::default();
        }
        self.cursor = 0;
    }

    fn index(&self, col: u32, row: u32) -> usize {
        assert!(col < self.cols && row < self.rows, "tile out of bounds");
        (row * self.cols + col) as usize
    }

    fn coords(&self, index: usize) -> (u32, u32) {
        (index as u32 % self.cols, index as u32 / self.cols)
    }
}
