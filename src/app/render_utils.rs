use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2};

use super::highlight::{EdgeEmphasis, NodeEmphasis};
use super::projection::Projected;

pub(in crate::app) const NODE_RADIUS_MIN: f32 = 15.0;
pub(in crate::app) const NODE_RADIUS_MAX: f32 = 45.0;
pub(in crate::app) const EDGE_WIDTH_MIN: f32 = 1.0;
pub(in crate::app) const EDGE_WIDTH_MAX: f32 = 6.0;

pub(in crate::app) const DIMMED_OPACITY: f32 = 0.1;
pub(in crate::app) const SUPPRESSED_EDGE_OPACITY: f32 = 0.05;

pub(in crate::app) const CANVAS_FILL: Color32 = Color32::from_rgb(248, 250, 252);
pub(in crate::app) const GRID_STROKE: Color32 = Color32::from_rgb(148, 163, 184);
pub(in crate::app) const NODE_FILL: Color32 = Color32::from_rgb(96, 165, 250);
pub(in crate::app) const NODE_FOCUS_FILL: Color32 = Color32::from_rgb(251, 191, 36);
pub(in crate::app) const SEARCH_MATCH_FILL: Color32 = Color32::from_rgb(103, 196, 255);
pub(in crate::app) const EDGE_NEUTRAL: Color32 = Color32::from_rgb(156, 163, 175);
pub(in crate::app) const EDGE_OUTGOING: Color32 = Color32::from_rgb(34, 197, 94);
pub(in crate::app) const EDGE_INCOMING: Color32 = Color32::from_rgb(239, 68, 68);
pub(in crate::app) const LABEL_INK: Color32 = Color32::from_rgb(31, 41, 55);
pub(in crate::app) const STAT_INK: Color32 = Color32::from_rgb(220, 38, 38);
pub(in crate::app) const OUTGOING_LABEL_INK: Color32 = Color32::from_rgb(21, 128, 61);
pub(in crate::app) const INCOMING_LABEL_INK: Color32 = Color32::from_rgb(185, 28, 28);
pub(in crate::app) const BALL_PASS_FILL: Color32 = Color32::from_rgb(249, 115, 22);
pub(in crate::app) const BALL_ASSIST_FILL: Color32 = Color32::from_rgb(34, 197, 94);

// Linear scale from [0, max_assist_total] onto [15, 45]. A degenerate domain
// (nobody has an assist yet) pins everything to the minimum radius.
pub(in crate::app) fn node_radius(assist_total: u32, max_assist_total: u32) -> f32 {
    if max_assist_total == 0 {
        return NODE_RADIUS_MIN;
    }

    let t = (assist_total as f32 / max_assist_total as f32).clamp(0.0, 1.0);
    NODE_RADIUS_MIN + t * (NODE_RADIUS_MAX - NODE_RADIUS_MIN)
}

// Linear scale from [1, max_pass_weight] onto [1, 6].
pub(in crate::app) fn edge_width(passes: u32, max_pass_weight: u32) -> f32 {
    if max_pass_weight <= 1 {
        return EDGE_WIDTH_MIN;
    }

    let t = ((passes.saturating_sub(1)) as f32 / (max_pass_weight - 1) as f32).clamp(0.0, 1.0);
    EDGE_WIDTH_MIN + t * (EDGE_WIDTH_MAX - EDGE_WIDTH_MIN)
}

pub(in crate::app) fn view_to_screen(rect: Rect, pan: Vec2, zoom: f32, projected: Projected) -> Pos2 {
    let center = rect.center();
    pos2(
        center.x + pan.x + projected.x * zoom,
        center.y + pan.y + projected.y * zoom,
    )
}

pub(in crate::app) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

// Nearer entities render brighter, mirroring the perspective scale.
pub(in crate::app) fn depth_brightness(color: Color32, scale: f32) -> Color32 {
    let factor = 0.7 + (scale * 0.4);
    Color32::from_rgba_unmultiplied(
        ((color.r() as f32 * factor).round() as u32).min(255) as u8,
        ((color.g() as f32 * factor).round() as u32).min(255) as u8,
        ((color.b() as f32 * factor).round() as u32).min(255) as u8,
        color.a(),
    )
}

pub(in crate::app) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(in crate::app) fn node_fill(emphasis: NodeEmphasis, preview_mode: bool) -> Color32 {
    if preview_mode {
        let base = Color32::WHITE;
        return match emphasis {
            NodeEmphasis::Dimmed => with_opacity(base, DIMMED_OPACITY),
            _ => base,
        };
    }

    match emphasis {
        NodeEmphasis::Focused => NODE_FOCUS_FILL,
        NodeEmphasis::Dimmed => with_opacity(NODE_FILL, DIMMED_OPACITY),
        NodeEmphasis::Default | NodeEmphasis::Neighbor => NODE_FILL,
    }
}

pub(in crate::app) fn node_stroke_color(emphasis: NodeEmphasis) -> Color32 {
    match emphasis {
        NodeEmphasis::Focused => Color32::BLACK,
        NodeEmphasis::Dimmed => with_opacity(Color32::WHITE, DIMMED_OPACITY),
        NodeEmphasis::Default | NodeEmphasis::Neighbor => Color32::WHITE,
    }
}

pub(in crate::app) fn edge_paint(emphasis: EdgeEmphasis, preview_mode: bool) -> Color32 {
    match emphasis {
        EdgeEmphasis::Outgoing => with_opacity(EDGE_OUTGOING, 0.8),
        EdgeEmphasis::Incoming => with_opacity(EDGE_INCOMING, 0.8),
        EdgeEmphasis::Suppressed => with_opacity(EDGE_NEUTRAL, SUPPRESSED_EDGE_OPACITY),
        EdgeEmphasis::Default => {
            let opacity = if preview_mode { 0.1 } else { 0.2 };
            with_opacity(EDGE_NEUTRAL, opacity)
        }
    }
}
