use eframe::egui;
use tokio::sync::mpsc;

use crate::chat::ChatRoom;
use crate::common::NetworkEvent;
use crate::network::ChannelTransport;

use super::components::{chat_area, input_bar, join_form, sidebar};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    room: ChatRoom<ChannelTransport>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        state: AppState,
        room: ChatRoom<ChannelTransport>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self {
            state,
            room,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.room.handle_network_event(event);
        }
    }

    fn join(&mut self) {
        if let Err(err) = self.room.join(&self.state.room_input, &self.state.name_input) {
            log::debug!("Join rejected: {err}");
        }
    }

    fn send(&mut self, text: String) {
        if let Err(err) = self.room.send(&text) {
            log::warn!("Message not sent: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        if !self.room.is_joined() {
            let mut join_requested = false;
            egui::CentralPanel::default().show(ctx, |ui| {
                join_requested = join_form::render(ui, &mut self.state);
            });
            if join_requested {
                self.join();
            }
            ctx.request_repaint();
            return;
        }

        let mut leave_requested = false;
        egui::SidePanel::left("room_sidebar")
            .resizable(true)
            .default_width(180.0)
            .show(ctx, |ui| {
                leave_requested = sidebar::render(ui, self.room.session(), self.room.connection());
            });

        let mut submitted = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Room chat");
            ui.separator();
            egui::TopBottomPanel::bottom("input_bar").show_inside(ui, |ui| {
                submitted = input_bar::render(ui, &mut self.state.composer);
            });
            chat_area::render(ui, self.room.messages());
        });

        if let Some(text) = submitted {
            self.send(text);
        }
        if leave_requested {
            self.room.leave();
        }

        ctx.request_repaint();
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        self.room.leave();
    }
}
