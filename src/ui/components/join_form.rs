use eframe::egui;

use crate::ui::state::AppState;

/// Returns true when the user asked to join. The button stays disabled until
/// both fields are filled.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    ui.heading("Join a room");
    ui.separator();

    let submitted = egui::Grid::new("join_form")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Room:");
            ui.text_edit_singleline(&mut state.room_input);
            ui.end_row();

            ui.label("Display name:");
            let response = ui.text_edit_singleline(&mut state.name_input);
            ui.end_row();

            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
        })
        .inner;

    let enabled = state.can_join();
    let clicked = ui
        .add_enabled(enabled, egui::Button::new("Join"))
        .clicked();

    enabled && (clicked || submitted)
}
