use std::time::Instant;

use egui::{Align2, Color32, FontId, Rect, Ui, UiBuilder, pos2, vec2};

use crate::fc;
use fc::animation::TileTransform;

use super::ThumbnailTextures;

/// Paint the whole wall: the thumbnail grid, the transition overlay, and the
/// video surface.
pub fn draw(ui: &mut Ui, wall: &fc::Wall, textures: &mut ThumbnailTextures) {
    // Grid geometry is in physical pixels; egui paints in points.
    let scale = 1.0 / ui.ctx().pixels_per_point();
    let grid = wall.grid();
    let (tile_width, tile_height) = grid.tile_size();
    let tile_size = vec2(tile_width as f32 * scale, tile_height as f32 * scale);

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.is_hidden(col, row) {
                continue;
            }
            let Some(image) = grid.image(col, row) else {
                continue;
            };
            let (x, y) = grid.position(col, row);
            let rect = Rect::from_min_size(pos2(x * scale, y * scale), tile_size);
            egui::Image::new(textures.source(&image)).paint_at(ui, rect);
        }
    }

    if let Some(frame) = wall.animation().frame(Instant::now()) {
        let (x, y) = frame.position;
        let tile_rect = Rect::from_min_size(pos2(x * scale, y * scale), tile_size);

        // Clip to the tile so sliding images do not spill into neighbours.
        let mut overlay = ui.new_child(UiBuilder::new().max_rect(tile_rect));
        overlay.set_clip_rect(tile_rect);
        if let Some((image, transform)) = &frame.outgoing {
            paint_transformed(&mut overlay, textures, image, tile_rect, transform, scale);
        }
        if let Some((image, transform)) = &frame.incoming {
            paint_transformed(&mut overlay, textures, image, tile_rect, transform, scale);
        }
    }

    if let Some((col, row)) = wall.video_surface_tile() {
        let (x, y) = grid.position(col, row);
        let rect = Rect::from_min_size(pos2(x * scale, y * scale), tile_size);
        draw_video_surface(ui, rect, wall.playback_snapshot());
    }
}

fn paint_transformed(
    ui: &mut Ui,
    textures: &mut ThumbnailTextures,
    image: &std::sync::Arc<[u8]>,
    rect: Rect,
    transform: &TileTransform,
    scale: f32,
) {
    // A tile folding about its vertical axis reads as its width compressing.
    let width_scale = transform.rotation_y_deg.to_radians().cos().abs() * transform.scale;
    let height_scale = transform.scale;
    if width_scale <= f32::EPSILON {
        return;
    }

    let center = rect.center() + vec2(transform.offset.0 * scale, transform.offset.1 * scale);
    let draw_rect = Rect::from_center_size(
        center,
        vec2(rect.width() * width_scale, rect.height() * height_scale),
    );
    egui::Image::new(textures.source(image))
        .tint(Color32::WHITE.gamma_multiply(transform.opacity))
        .paint_at(ui, draw_rect);
}

fn draw_video_surface(ui: &Ui, rect: Rect, snapshot: Option<fc::player::PlaybackSnapshot>) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::BLACK);

    let Some(snapshot) = snapshot else {
        return;
    };

    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &snapshot.title,
        FontId::proportional((rect.height() * 0.08).max(12.0)),
        Color32::WHITE,
    );

    if snapshot.paused {
        painter.text(
            rect.center_top() + vec2(0.0, 8.0),
            Align2::CENTER_TOP,
            "paused",
            FontId::proportional(14.0),
            Color32::LIGHT_GRAY,
        );
    }

    // Progress bar along the bottom edge.
    if !snapshot.duration.is_zero() {
        let fraction =
            (snapshot.position.as_secs_f32() / snapshot.duration.as_secs_f32()).clamp(0.0, 1.0);
        let bar_height = 4.0;
        let bar = Rect::from_min_max(
            pos2(rect.left(), rect.bottom() - bar_height),
            rect.right_bottom(),
        );
        painter.rect_filled(bar, 0.0, Color32::from_gray(60));
        let filled = Rect::from_min_max(
            bar.left_top(),
            pos2(bar.left() + bar.width() * fraction, bar.bottom()),
        );
        painter.rect_filled(filled, 0.0, Color32::from_rgb(220, 60, 60));
    }
}
