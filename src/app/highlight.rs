use super::PassEdge;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeEmphasis {
    Default,
    Focused,
    Neighbor,
    Dimmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum EdgeEmphasis {
    Default,
    Outgoing,
    Incoming,
    Suppressed,
}

#[derive(Clone, Debug)]
pub(in crate::app) struct HighlightState {
    pub focused: Option<usize>,
    pub nodes: Vec<NodeEmphasis>,
    pub edges: Vec<EdgeEmphasis>,
}

impl HighlightState {
    pub(in crate::app) fn stat_visible(&self, node: usize) -> bool {
        self.focused == Some(node)
    }

    pub(in crate::app) fn edge_label_visible(&self, edge: usize) -> bool {
        matches!(
            self.edges.get(edge),
            Some(EdgeEmphasis::Outgoing | EdgeEmphasis::Incoming)
        )
    }

    pub(in crate::app) fn particle_dimmed(&self, edge: usize) -> bool {
        self.focused.is_some() && matches!(self.edges.get(edge), Some(EdgeEmphasis::Suppressed))
    }
}

// Pure function of the selection and the graph shape: rotation and particle
// state never feed into it, so the result is reusable until either the
// selection or the scene changes.
pub(in crate::app) fn build_highlight_state(
    node_count: usize,
    edges: &[PassEdge],
    focused: Option<usize>,
) -> HighlightState {
    let Some(focused_index) = focused.filter(|&index| index < node_count) else {
        return HighlightState {
            focused: None,
            nodes: vec![NodeEmphasis::Default; node_count],
            edges: vec![EdgeEmphasis::Default; edges.len()],
        };
    };

    let mut nodes = vec![NodeEmphasis::Dimmed; node_count];
    let mut edge_emphasis = Vec::with_capacity(edges.len());

    for edge in edges {
        if edge.source == focused_index {
            edge_emphasis.push(EdgeEmphasis::Outgoing);
            if let Some(target) = nodes.get_mut(edge.target) {
                *target = NodeEmphasis::Neighbor;
            }
        } else if edge.target == focused_index {
            edge_emphasis.push(EdgeEmphasis::Incoming);
            if let Some(source) = nodes.get_mut(edge.source) {
                *source = NodeEmphasis::Neighbor;
            }
        } else {
            edge_emphasis.push(EdgeEmphasis::Suppressed);
        }
    }

    nodes[focused_index] = NodeEmphasis::Focused;

    HighlightState {
        focused: Some(focused_index),
        nodes,
        edges: edge_emphasis,
    }
}
