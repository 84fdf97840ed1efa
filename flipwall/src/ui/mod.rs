use std::time::{Duration, Instant};

mod picker;
mod textures;
mod wall_view;

pub use textures::ThumbnailTextures;

use egui::{Align2, Color32, Context, FontId, Frame, Visuals};

use crate::{App, config::Config};

/// How long the menu hint stays up after launch before fading out.
const HINT_DURATION: Duration = Duration::from_secs(6);
const HINT_FADE: Duration = Duration::from_secs(2);

#[derive(Default)]
pub struct PickerState {
    pub(crate) open: bool,
    pub(crate) new_id: String,
    pub(crate) new_name: String,
}

pub struct UiState {
    pub picker: PickerState,
    pub textures: ThumbnailTextures,
    pub hint_shown_at: Instant,
}

pub fn initialize(cc: &eframe::CreationContext<'_>, config: &Config) -> UiState {
    cc.egui_ctx.set_visuals(Visuals::dark());
    cc.egui_ctx.style_mut(|style| {
        style.visuals.panel_fill = Color32::BLACK;
    });

    egui_extras::install_image_loaders(&cc.egui_ctx);

    UiState {
        picker: PickerState {
            // A first run has nothing to show; lead with the picker.
            open: config.session.first_run,
            ..Default::default()
        },
        textures: ThumbnailTextures::default(),
        hint_shown_at: Instant::now(),
    }
}

impl App {
    pub fn render(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(wall) = &self.wall {
                    wall_view::draw(ui, wall, &mut self.ui_state.textures);
                }
                draw_hint(ui, &self.config, &self.ui_state);
            });

        self.ui_state.textures.prune(ctx);
        picker::show(self, ctx);
    }
}

fn draw_hint(ui: &egui::Ui, config: &Config, ui_state: &UiState) {
    let age = ui_state.hint_shown_at.elapsed();
    let opacity = if config.session.first_run {
        1.0
    } else if age < HINT_DURATION {
        let fade_start = HINT_DURATION.saturating_sub(HINT_FADE);
        1.0 - (age.saturating_sub(fade_start).as_secs_f32() / HINT_FADE.as_secs_f32())
            .clamp(0.0, 1.0)
    } else {
        return;
    };

    let rect = ui.max_rect();
    ui.painter().text(
        rect.center_bottom() - egui::vec2(0.0, 24.0),
        Align2::CENTER_BOTTOM,
        "press P to choose a playlist, space to pause",
        FontId::proportional(18.0),
        Color32::WHITE.gamma_multiply(opacity),
    );
}
