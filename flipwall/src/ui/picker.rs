use egui::Context;

use crate::{App, fc};
use fc::flipwall_state::{PlaylistEntry, PlaylistId};

/// The playlist picker window. Selecting an entry restarts the session on it;
/// entries can also be added here and are persisted to the config file.
pub fn show(app: &mut App, ctx: &Context) {
    if !app.ui_state.picker.open {
        return;
    }

    let mut open = true;
    let mut selected = None;
    let mut added = false;

    egui::Window::new("Playlists")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            if app.config.playlists.is_empty() {
                ui.label("No playlists yet. Add one below.");
            }
            for entry in &app.config.playlists {
                let current =
                    app.config.session.last_playlist_id.as_ref() == Some(&entry.id);
                let label = if current {
                    format!("▶ {}", entry.name)
                } else {
                    entry.name.clone()
                };
                if ui.button(label).on_hover_text(entry.id.to_string()).clicked() {
                    selected = Some(entry.id.clone());
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut app.ui_state.picker.new_name);
            });
            ui.horizontal(|ui| {
                ui.label("Playlist ID:");
                ui.text_edit_singleline(&mut app.ui_state.picker.new_id);
            });
            if ui.button("Add").clicked() && !app.ui_state.picker.new_id.trim().is_empty() {
                added = true;
            }
        });

    if added {
        let id = app.ui_state.picker.new_id.trim().to_string();
        let name = app.ui_state.picker.new_name.trim().to_string();
        let name = if name.is_empty() { id.clone() } else { name };
        app.config.playlists.push(PlaylistEntry {
            id: PlaylistId::new(id),
            name,
        });
        app.config.save();
        app.ui_state.picker.new_id.clear();
        app.ui_state.picker.new_name.clear();
    }

    if let Some(playlist_id) = selected {
        app.ui_state.picker.open = false;
        app.select_playlist(playlist_id);
    } else {
        app.ui_state.picker.open = open;
    }
}
