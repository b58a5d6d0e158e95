use eframe::egui;

use crate::common::ChatMessage;

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage]) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                if message.is_system() {
                    ui.label(egui::RichText::new(&message.body).italics().weak());
                } else {
                    ui.label(format!("{}: {}", message.author, message.body));
                }
            }
        });
}
