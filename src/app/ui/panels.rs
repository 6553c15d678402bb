use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::data::PassDataset;

use super::super::projection::Rotation;
use super::super::{AnimationClock, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(dataset: PassDataset) -> Self {
        let team_id = dataset
            .teams()
            .first()
            .map(|team| team.id.clone())
            .unwrap_or_default();
        let date_end = dataset.dates().len().saturating_sub(1);

        Self {
            dataset,
            team_id,
            date_start: 0,
            date_end,
            search: String::new(),
            selected: None,
            rotation: Rotation::ZERO,
            auto_rotate: false,
            preview_mode: false,
            live_layout: true,
            pan: Vec2::ZERO,
            zoom: 1.0,
            clock: AnimationClock::new(0.0),
            scene_dirty: true,
            scene_revision: 0,
            scene: None,
            highlight_cache: None,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_player_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_file: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        if self.scene_dirty {
            self.rebuild_scene();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("passnet");
                    if self.preview_mode {
                        ui.label("(Live Preview)");
                    }
                    ui.separator();
                    if let Some(team_name) = self.dataset.team_name(&self.team_id) {
                        ui.label(team_name);
                    }
                    ui.label(format!("players: {}", self.visible_player_count));
                    ui.label(format!("connections: {}", self.visible_edge_count));
                    ui.label(format!("file: {data_file}"));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading pass data...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_scene(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            self.selected = selected;
        }
    }
}
