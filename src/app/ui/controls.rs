use eframe::egui::{self, RichText, Ui, Vec2};

use super::super::ViewModel;
use super::super::projection::Rotation;
use super::super::render_utils::{
    BALL_ASSIST_FILL, BALL_PASS_FILL, EDGE_INCOMING, EDGE_OUTGOING,
};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search players")
            .on_hover_text("Fuzzy-highlight matching players without changing the graph.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        let mut changed = false;

        let team_label = self
            .dataset
            .team_name(&self.team_id)
            .unwrap_or("Select a team")
            .to_string();
        let teams = self.dataset.teams().to_vec();
        egui::ComboBox::from_id_salt("team_select")
            .selected_text(team_label)
            .width(200.0)
            .show_ui(ui, |ui| {
                for team in &teams {
                    changed |= ui
                        .selectable_value(&mut self.team_id, team.id.clone(), &team.name)
                        .changed();
                }
            });

        if !self.dataset.dates().is_empty() {
            let max_index = self.dataset.dates().len() - 1;
            ui.add_space(4.0);

            changed |= ui
                .add(egui::Slider::new(&mut self.date_start, 0..=max_index).text("From game"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.date_end, 0..=max_index).text("To game"))
                .changed();
            if self.date_start > self.date_end {
                self.date_start = self.date_end;
            }

            let dates = self.dataset.dates();
            ui.label(format!(
                "{} – {}",
                dates[self.date_start], dates[self.date_end]
            ));
        }

        if changed {
            self.scene_dirty = true;
        }

        ui.separator();

        let preview_label = if self.preview_mode {
            "Stop animation"
        } else {
            "Preview 3D"
        };
        if ui.button(preview_label).clicked() {
            self.set_preview_mode(!self.preview_mode);
        }

        ui.checkbox(&mut self.auto_rotate, "Auto-rotate")
            .on_hover_text("Continuously spin the scene about the Y axis.");

        ui.add_space(4.0);

        ui.add(egui::Slider::new(&mut self.rotation.x, -90.0..=90.0).text("Tilt X"));
        let spin_slider =
            ui.add(egui::Slider::new(&mut self.rotation.y, 0.0..=360.0).text("Spin Y"));
        if spin_slider.changed() && self.auto_rotate {
            // Auto-rotation resumes from the value the user just set.
            self.clock.freeze(self.rotation.y);
        }
        ui.add(egui::Slider::new(&mut self.rotation.z, 0.0..=360.0).text("Roll Z"));

        if ui.button("Reset view").clicked() {
            self.rotation = Rotation::ZERO;
            self.auto_rotate = false;
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
            self.clock.freeze(0.0);
        }

        ui.separator();

        ui.checkbox(&mut self.live_layout, "Live layout simulation")
            .on_hover_text("Keep the force layout running while viewing the graph.");
        ui.checkbox(&mut self.show_fps_bar, "FPS readout");

        ui.separator();

        ui.collapsing("Legend", |ui| {
            ui.label(RichText::new("— Outgoing pass").color(EDGE_OUTGOING));
            ui.label(RichText::new("— Incoming pass").color(EDGE_INCOMING));
            ui.label(RichText::new("● Pass in flight").color(BALL_PASS_FILL));
            ui.label(RichText::new("● Assist in flight").color(BALL_ASSIST_FILL));
        });
    }

    pub(in crate::app) fn set_preview_mode(&mut self, on: bool) {
        self.preview_mode = on;

        if on {
            self.rotation = Rotation {
                x: 15.0,
                y: 0.0,
                z: 0.0,
            };
            self.auto_rotate = true;
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
            self.clock.freeze(0.0);
        } else {
            self.rotation = Rotation::ZERO;
            self.auto_rotate = false;
            self.clock.freeze(0.0);
            self.clock.clear_particles();
        }
    }
}
