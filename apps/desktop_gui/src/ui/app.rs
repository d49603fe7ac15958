use eframe::egui;
use storage::SlotStore;
use task_core::{
    view::EMPTY_STATE_MESSAGE, TaskBoard, TaskListView, TextStyle, CLEAR_ALL_PROMPT,
};

use crate::controller::{
    events::{StatusBanner, UiEvent},
    orchestration::{apply_events, ShellState},
};

const ROW_SPACING: f32 = 4.0;

pub struct TasklistApp<S> {
    board: TaskBoard<S>,
    shell: ShellState,
}

impl<S: SlotStore> TasklistApp<S> {
    pub fn new(mut board: TaskBoard<S>) -> Self {
        let banner = board.take_notice().map(StatusBanner::from);
        Self {
            board,
            shell: ShellState {
                confirm_clear_open: false,
                banner,
            },
        }
    }

    fn show_banner(&self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        let Some(banner) = &self.shell.banner else {
            return;
        };
        egui::Frame::group(ui.style())
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(banner.title);
                    ui.label(&banner.message);
                    if ui.small_button("Dismiss").clicked() {
                        events.push(UiEvent::BannerDismissed);
                    }
                });
            });
        ui.add_space(8.0);
    }

    fn show_input_row(&mut self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(self.board.draft_mut())
                    .hint_text("Add a new task...")
                    .desired_width(ui.available_width() - 60.0),
            );
            let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if enter || ui.button("Add").clicked() {
                events.push(UiEvent::DraftSubmitted);
                input.request_focus();
            }
        });
    }

    fn show_task_rows(ui: &mut egui::Ui, view: &TaskListView, events: &mut Vec<UiEvent>) {
        if view.show_empty_state {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| ui.weak(EMPTY_STATE_MESSAGE));
            ui.add_space(12.0);
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(ui.available_height() - 48.0)
            .show(ui, |ui| {
                for row in &view.rows {
                    ui.horizontal(|ui| {
                        let mut checked = row.completed;
                        if ui.checkbox(&mut checked, "").changed() {
                            events.push(UiEvent::Row(row.toggle_action()));
                        }
                        let text = egui::RichText::new(&row.text);
                        let text = match row.style {
                            TextStyle::Normal => text,
                            TextStyle::Completed => text.strikethrough().weak(),
                        };
                        ui.label(text);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Delete").clicked() {
                                events.push(UiEvent::Row(row.delete_action()));
                            }
                        });
                    });
                    ui.add_space(ROW_SPACING);
                }
            });
    }

    fn show_footer(ui: &mut egui::Ui, view: &TaskListView, events: &mut Vec<UiEvent>) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(view.counts.total_label());
            ui.separator();
            ui.label(view.counts.completed_label());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear all").clicked() {
                    events.push(UiEvent::ClearRequested);
                }
            });
        });
    }

    fn show_clear_dialog(ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let modal = egui::Modal::new(egui::Id::new("confirm_clear_all")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.label(CLEAR_ALL_PROMPT);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Delete all").clicked() {
                    events.push(UiEvent::ClearAnswered(true));
                }
                if ui.button("Cancel").clicked() {
                    events.push(UiEvent::ClearAnswered(false));
                }
            });
        });
        if modal.should_close() && !events.iter().any(|e| matches!(e, UiEvent::ClearAnswered(_)))
        {
            events.push(UiEvent::ClearAnswered(false));
        }
    }
}

impl<S: SlotStore> eframe::App for TasklistApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Tasks");
            ui.add_space(8.0);
            self.show_banner(ui, &mut events);
            self.show_input_row(ui, &mut events);
            ui.add_space(8.0);

            let view = self.board.view().clone();
            Self::show_task_rows(ui, &view, &mut events);
            Self::show_footer(ui, &view, &mut events);
        });

        if self.shell.confirm_clear_open {
            // the modal blocks the panel; drop anything queued behind it
            events.retain(|e| matches!(e, UiEvent::BannerDismissed));
            Self::show_clear_dialog(ctx, &mut events);
        }

        if !events.is_empty() {
            apply_events(&mut self.board, &mut self.shell, events);
            ctx.request_repaint();
        }
    }
}
