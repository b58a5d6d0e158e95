use eframe::egui;

use crate::chat::Composer;

/// Returns the submitted text, if any.
pub fn render(ui: &mut egui::Ui, composer: &mut Composer) -> Option<String> {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.text_edit_singleline(&mut composer.input);
        if ui.button("Send").clicked() {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
    });

    if send { composer.submit() } else { None }
}
