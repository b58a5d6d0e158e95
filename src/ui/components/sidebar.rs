use eframe::egui;

use crate::chat::RoomSession;
use crate::common::ConnectionState;

/// Returns true when the user clicked "Leave".
pub fn render(ui: &mut egui::Ui, session: &RoomSession, connection: &ConnectionState) -> bool {
    ui.heading(session.room());
    ui.separator();

    ui.label(format!("You are {}", session.display_name()));
    ui.horizontal(|ui| {
        let color = match connection {
            ConnectionState::Connected => egui::Color32::GREEN,
            ConnectionState::Connecting => egui::Color32::YELLOW,
            ConnectionState::Failed(_) => egui::Color32::RED,
            ConnectionState::Disconnected => egui::Color32::GRAY,
        };
        ui.colored_label(color, "●");
        ui.label(egui::RichText::new(connection.to_string()).weak());
    });

    ui.separator();
    ui.button("Leave").clicked()
}
