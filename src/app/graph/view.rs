use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::initials;

use super::super::animation::{BALL_ARC_CURVATURE, arc_point};
use super::super::depth::{back_to_front, edge_depths};
use super::super::highlight::{EdgeEmphasis, HighlightState, NodeEmphasis, build_highlight_state};
use super::super::physics::step_layout;
use super::super::projection::{FOCAL_LENGTH, Point3, Rotation, perspective_scale, project};
use super::super::render_utils::{
    BALL_ASSIST_FILL, BALL_PASS_FILL, CANVAS_FILL, DIMMED_OPACITY, GRID_STROKE, INCOMING_LABEL_INK,
    LABEL_INK, OUTGOING_LABEL_INK, SEARCH_MATCH_FILL, STAT_INK, blend_color, depth_brightness,
    edge_paint, edge_width, node_fill, node_radius, node_stroke_color, view_to_screen,
    with_opacity,
};
use super::super::{AnimationClock, HighlightCache, PlayerNode, RenderScene, ViewModel};

const GRID_EXTENT: f32 = 1200.0;
const GRID_STEP: f32 = 150.0;
const GRID_PLANE_Y: f32 = 400.0;

// Static edges bow gently; the travelling balls use a harder 0.3 curve so
// the two reads stay visually distinct.
const EDGE_ARC_CURVATURE: f32 = 0.17;
const EDGE_ARC_SAMPLES: usize = 20;

const PREVIEW_NODE_RADIUS: f32 = 35.0;
const BALL_RADIUS: f32 = 5.0;

impl ViewModel {
    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui) {
        if self.scene_dirty {
            self.rebuild_scene();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_FILL);

        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);
        self.handle_drag_rotate(&response);

        let now_ms = ui.input(|input| input.time) * 1000.0;
        if self.auto_rotate {
            self.clock.advance_rotation(now_ms);
        } else {
            self.clock.freeze(self.rotation.y);
        }
        // One rotation snapshot feeds every projection and depth comparison
        // in this frame.
        let rotation = Rotation {
            x: self.rotation.x,
            y: self.clock.angle_y(),
            z: self.rotation.z,
        };

        let delta_seconds = ui
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let pan = self.pan;
        let zoom = self.zoom;
        let preview = self.preview_mode;

        if !matches!(
            &self.highlight_cache,
            Some(cache)
                if cache.scene_revision == self.scene_revision && cache.selected == self.selected
        ) {
            let state = match &self.scene {
                Some(scene) => {
                    let focused = self
                        .selected
                        .as_ref()
                        .and_then(|id| scene.index_by_id.get(id).copied());
                    build_highlight_state(scene.nodes.len(), &scene.edges, focused)
                }
                None => build_highlight_state(0, &[], None),
            };
            self.highlight_cache = Some(HighlightCache {
                selected: self.selected.clone(),
                scene_revision: self.scene_revision,
                state,
            });
        }

        let Some(scene) = self.scene.as_mut() else {
            self.visible_player_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No passes matched the current team and date filters.",
                FontId::proportional(14.0),
                LABEL_INK,
            );
            return;
        };

        let mut layout_moving = false;
        if self.live_layout {
            layout_moving = step_layout(scene, delta_seconds);
        }

        let frame = &mut scene.frame;
        frame.node_projections.clear();
        frame.node_screen.clear();
        frame.node_radius_px.clear();
        frame.node_depths.clear();
        for node in &scene.nodes {
            let projected = project(
                Point3::new(node.world_pos.x, node.world_pos.y, node.depth_seed),
                rotation,
                FOCAL_LENGTH,
                Pos2::ZERO,
            );
            let base_radius = if preview {
                PREVIEW_NODE_RADIUS
            } else {
                node_radius(node.assist_total, scene.max_assist_total)
            };

            frame.node_screen.push(view_to_screen(rect, pan, zoom, projected));
            frame
                .node_radius_px
                .push((base_radius * projected.scale * zoom).max(1.0));
            frame.node_depths.push(projected.depth);
            frame.node_projections.push(projected);
        }

        back_to_front(&frame.node_depths, &mut frame.node_order);
        edge_depths(&scene.edges, &frame.node_projections, &mut frame.edge_depths);
        back_to_front(&frame.edge_depths, &mut frame.edge_order);

        if preview {
            self.clock.spawn_particles(
                &scene.edges,
                &scene.frame.node_projections,
                &mut rand::thread_rng(),
            );
            self.clock.advance_particles();
        } else {
            self.clock.clear_particles();
        }

        let Some(highlight) = self.highlight_cache.as_ref().map(|cache| &cache.state) else {
            return;
        };
        let search_matches = search_match_indices(&scene.nodes, &self.search, &self.selected);

        draw_floor_grid(&painter, rect, pan, zoom, rotation);
        draw_shadows(&painter, rect, pan, zoom, rotation, scene, preview);
        draw_edges(&painter, scene, highlight, preview, zoom);

        let hovered = Self::hovered_node(ui, &scene.frame.node_screen, &scene.frame.node_radius_px);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        let hovered_index = hovered.map(|(index, _)| index);

        draw_nodes(
            &painter,
            scene,
            highlight,
            &search_matches,
            hovered_index,
            preview,
            zoom,
        );
        draw_particles(&painter, scene, &self.clock, highlight, zoom);
        self.clock.retire_finished();

        if let Some(index) = hovered_index
            && let Some(node) = scene.nodes.get(index)
        {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  Ast {}", node.name, node.assist_total),
                FontId::proportional(13.0),
                LABEL_INK,
            );
        }

        self.visible_player_count = scene.nodes.len();
        self.visible_edge_count = scene.edges.len();

        let pending_click = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered_index.and_then(|index| scene.nodes.get(index).map(|node| node.id.clone())))
        } else {
            None
        };

        if self.auto_rotate || preview || layout_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        if let Some(clicked) = pending_click {
            self.apply_scene_click(clicked);
        }
    }
}

fn search_match_indices(
    nodes: &[PlayerNode],
    search: &str,
    selected: &Option<String>,
) -> HashSet<usize> {
    if selected.is_some() {
        return HashSet::new();
    }

    let query = search.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            matcher
                .fuzzy_match(&node.name, query)
                .or_else(|| matcher.fuzzy_match(&node.name.to_ascii_lowercase(), &query.to_ascii_lowercase()))
                .map(|_| index)
        })
        .collect()
}

fn draw_floor_grid(painter: &egui::Painter, rect: Rect, pan: Vec2, zoom: f32, rotation: Rotation) {
    let mut offset = -GRID_EXTENT;
    while offset <= GRID_EXTENT {
        for (start, end) in [
            (
                Point3::new(-GRID_EXTENT, GRID_PLANE_Y, offset),
                Point3::new(GRID_EXTENT, GRID_PLANE_Y, offset),
            ),
            (
                Point3::new(offset, GRID_PLANE_Y, -GRID_EXTENT),
                Point3::new(offset, GRID_PLANE_Y, GRID_EXTENT),
            ),
        ] {
            let from = project(start, rotation, FOCAL_LENGTH, Pos2::ZERO);
            let to = project(end, rotation, FOCAL_LENGTH, Pos2::ZERO);
            let opacity = (from.scale * 0.2).max(0.05);
            painter.line_segment(
                [
                    view_to_screen(rect, pan, zoom, from),
                    view_to_screen(rect, pan, zoom, to),
                ],
                Stroke::new(1.0, with_opacity(GRID_STROKE, opacity)),
            );
        }
        offset += GRID_STEP;
    }
}

fn draw_shadows(
    painter: &egui::Painter,
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    rotation: Rotation,
    scene: &RenderScene,
    preview: bool,
) {
    for node in &scene.nodes {
        let grounded = project(
            Point3::new(node.world_pos.x, GRID_PLANE_Y, node.depth_seed),
            rotation,
            FOCAL_LENGTH,
            Pos2::ZERO,
        );
        let base_radius = if preview {
            PREVIEW_NODE_RADIUS
        } else {
            node_radius(node.assist_total, scene.max_assist_total)
        };
        let center = view_to_screen(rect, pan, zoom, grounded);
        let radius = base_radius * grounded.scale * zoom;

        painter.add(Shape::ellipse_filled(
            center,
            vec2(radius * 1.2, radius * 0.4),
            Color32::from_black_alpha(50),
        ));
    }
}

fn sample_arc(source: Pos2, target: Pos2, curvature: f32) -> Vec<Pos2> {
    (0..=EDGE_ARC_SAMPLES)
        .map(|step| {
            let t = step as f32 / EDGE_ARC_SAMPLES as f32;
            arc_point(source, target, t, curvature)
        })
        .collect()
}

fn draw_arrow_head(
    painter: &egui::Painter,
    source: Pos2,
    target: Pos2,
    curvature: f32,
    size: f32,
    color: Color32,
) {
    let tip = arc_point(source, target, 0.92, curvature);
    let back = arc_point(source, target, 0.84, curvature);
    let direction = tip - back;
    let length = direction.length();
    if length <= f32::EPSILON {
        return;
    }

    let direction = direction / length;
    let perpendicular = vec2(-direction.y, direction.x);
    painter.add(Shape::convex_polygon(
        vec![
            tip,
            tip - direction * size + perpendicular * (size * 0.5),
            tip - direction * size - perpendicular * (size * 0.5),
        ],
        color,
        Stroke::NONE,
    ));
}

fn draw_edges(
    painter: &egui::Painter,
    scene: &RenderScene,
    highlight: &HighlightState,
    preview: bool,
    zoom: f32,
) {
    let frame = &scene.frame;

    for &edge_index in &frame.edge_order {
        let Some(edge) = scene.edges.get(edge_index) else {
            continue;
        };
        let source = frame.node_screen[edge.source];
        let target = frame.node_screen[edge.target];
        let mean_scale = (frame.node_projections[edge.source].scale
            + frame.node_projections[edge.target].scale)
            * 0.5;

        let emphasis = highlight
            .edges
            .get(edge_index)
            .copied()
            .unwrap_or(EdgeEmphasis::Default);
        let color = edge_paint(emphasis, preview);
        let width = (edge_width(edge.passes, scene.max_pass_weight) * mean_scale * zoom).max(0.3);

        painter.add(Shape::line(
            sample_arc(source, target, EDGE_ARC_CURVATURE),
            Stroke::new(width, color),
        ));

        let wants_marker = match emphasis {
            EdgeEmphasis::Outgoing | EdgeEmphasis::Incoming => true,
            EdgeEmphasis::Default => !preview,
            EdgeEmphasis::Suppressed => false,
        };
        if wants_marker {
            draw_arrow_head(
                painter,
                source,
                target,
                EDGE_ARC_CURVATURE,
                (7.0 * mean_scale * zoom).max(3.0),
                color,
            );
        }

        if !preview && highlight.edge_label_visible(edge_index) {
            let label_ink = match emphasis {
                EdgeEmphasis::Incoming => INCOMING_LABEL_INK,
                _ => OUTGOING_LABEL_INK,
            };
            painter.text(
                arc_point(source, target, 0.5, EDGE_ARC_CURVATURE),
                Align2::CENTER_CENTER,
                format!("{} P / {} A", edge.passes, edge.assists),
                FontId::proportional((10.0 * mean_scale * zoom).clamp(8.0, 16.0)),
                label_ink,
            );
        }
    }
}

fn draw_nodes(
    painter: &egui::Painter,
    scene: &RenderScene,
    highlight: &HighlightState,
    search_matches: &HashSet<usize>,
    hovered_index: Option<usize>,
    preview: bool,
    zoom: f32,
) {
    let frame = &scene.frame;

    for &node_index in &frame.node_order {
        let node = &scene.nodes[node_index];
        let center = frame.node_screen[node_index];
        let radius = frame.node_radius_px[node_index];
        let scale = frame.node_projections[node_index].scale;

        let emphasis = highlight
            .nodes
            .get(node_index)
            .copied()
            .unwrap_or(NodeEmphasis::Default);
        let dimmed = emphasis == NodeEmphasis::Dimmed;

        let mut fill = node_fill(emphasis, preview);
        if !preview && search_matches.contains(&node_index) {
            fill = blend_color(fill, SEARCH_MATCH_FILL, 0.68);
        }
        if hovered_index == Some(node_index) && !dimmed {
            fill = blend_color(fill, Color32::WHITE, 0.25);
        }
        fill = depth_brightness(fill, scale);

        painter.circle_filled(center, radius, fill);
        painter.circle_stroke(
            center,
            radius,
            Stroke::new((2.0 * scale * zoom).max(0.5), node_stroke_color(emphasis)),
        );

        let text_opacity = if dimmed { DIMMED_OPACITY } else { 1.0 };
        let font_scale = (scale * zoom).clamp(0.5, 2.0);

        if preview {
            // Stand-in for the player portrait: initials inside the disc.
            painter.text(
                center,
                Align2::CENTER_CENTER,
                initials(&node.name),
                FontId::proportional(22.0 * font_scale),
                with_opacity(LABEL_INK, text_opacity),
            );
            painter.text(
                center + vec2(0.0, (PREVIEW_NODE_RADIUS + 15.0) * scale * zoom),
                Align2::CENTER_CENTER,
                &node.name,
                FontId::proportional(14.0 * font_scale),
                with_opacity(LABEL_INK, text_opacity),
            );
        } else {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                &node.name,
                FontId::proportional(12.0 * font_scale),
                with_opacity(LABEL_INK, text_opacity),
            );
        }

        if highlight.stat_visible(node_index) {
            let stat_offset = if preview {
                (PREVIEW_NODE_RADIUS + 30.0) * scale * zoom
            } else {
                radius + 15.0 * font_scale
            };
            painter.text(
                center + vec2(0.0, stat_offset),
                Align2::CENTER_CENTER,
                format!("Ast: {}", node.assist_total),
                FontId::proportional(11.0 * font_scale),
                STAT_INK,
            );
        }
    }
}

fn draw_particles(
    painter: &egui::Painter,
    scene: &RenderScene,
    clock: &AnimationClock,
    highlight: &HighlightState,
    zoom: f32,
) {
    let frame = &scene.frame;

    for particle in clock.particles() {
        let Some(edge) = scene.edges.get(particle.edge) else {
            debug_assert!(false, "particle references a retired edge");
            continue;
        };

        let source = frame.node_screen[edge.source];
        let target = frame.node_screen[edge.target];
        let t = particle.t.min(1.0);
        let center = arc_point(source, target, t, BALL_ARC_CURVATURE);
        let scale = perspective_scale(particle.depth());

        let fill = if particle.assist_flavored {
            BALL_ASSIST_FILL
        } else {
            BALL_PASS_FILL
        };
        let opacity = if highlight.particle_dimmed(particle.edge) {
            0.05
        } else {
            1.0
        };

        let radius = (BALL_RADIUS * scale * zoom).max(1.0);
        painter.circle_filled(center, radius, with_opacity(fill, opacity));
        painter.circle_stroke(
            center,
            radius,
            Stroke::new(0.5, with_opacity(Color32::from_black_alpha(128), opacity)),
        );
    }
}
