use std::cmp::Ordering;

use super::PassEdge;
use super::projection::Projected;

// Larger depth means farther into the scene; those entities draw first so
// nearer ones paint over them. Ties keep insertion order (stable sort).
pub(in crate::app) fn back_to_front(depths: &[f32], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..depths.len());
    order.sort_by(|&a, &b| depths[b].partial_cmp(&depths[a]).unwrap_or(Ordering::Equal));
}

pub(in crate::app) fn edge_depths(
    edges: &[PassEdge],
    node_projections: &[Projected],
    depths: &mut Vec<f32>,
) {
    depths.clear();
    depths.reserve(edges.len().saturating_sub(depths.capacity()));
    for edge in edges {
        let source = node_projections[edge.source].depth;
        let target = node_projections[edge.target].depth;
        depths.push((source + target) * 0.5);
    }
}
