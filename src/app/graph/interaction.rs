use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::ViewModel;
use super::super::projection::Rotation;

const DRAG_DEGREES_PER_PIXEL: f32 = 0.4;

impl ViewModel {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        // The animated preview runs at a fixed framing.
        if self.preview_mode || !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let view_before = (pointer - rect.center() - self.pan) / self.zoom;

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.5, 3.0);
        self.pan = pointer - rect.center() - (view_before * self.zoom);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn handle_drag_rotate(&mut self, response: &egui::Response) {
        if !response.dragged_by(egui::PointerButton::Primary) {
            return;
        }

        let delta = response.drag_delta();
        if delta == Vec2::ZERO {
            return;
        }

        let spin = delta.x * DRAG_DEGREES_PER_PIXEL;
        let tilt = delta.y * DRAG_DEGREES_PER_PIXEL;

        self.rotation = Rotation {
            x: (self.rotation.x + tilt).clamp(-90.0, 90.0),
            y: (self.rotation.y + spin).rem_euclid(360.0),
            z: self.rotation.z,
        };
        if self.auto_rotate {
            // Keep spinning from the dragged heading instead of snapping back.
            self.clock.nudge(spin);
        }
    }

    pub(in crate::app) fn hovered_node(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<(usize, f32)> {
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer| {
            (0..screen_positions.len())
                .filter_map(|index| {
                    let distance = screen_positions[index].distance(pointer);
                    if distance <= screen_radii[index].max(4.0) {
                        Some((index, distance))
                    } else {
                        None
                    }
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
    }

    // Clicking the focused player again or the backdrop returns to idle;
    // clicking another player moves the focus straight across.
    pub(in crate::app) fn apply_scene_click(&mut self, clicked: Option<String>) {
        let next = match clicked {
            Some(id) if self.selected.as_deref() == Some(id.as_str()) => None,
            Some(id) => Some(id),
            None => None,
        };
        self.set_selected(next);
    }
}
