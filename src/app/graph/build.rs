use std::collections::HashMap;
use std::collections::hash_map::Entry;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::data::PassRecord;
use crate::util::stable_pair;

use super::super::{FrameScratch, LayoutScratch, PassEdge, PlayerNode, RenderScene, ViewModel};

const DEPTH_SEED_RANGE: f32 = 200.0;
const INITIAL_RING_RADIUS: f32 = 160.0;

impl ViewModel {
    pub(in crate::app) fn rebuild_scene(&mut self) {
        self.scene_revision = self.scene_revision.wrapping_add(1);
        self.highlight_cache = None;
        // Particles hold edge indices into the arena being replaced.
        self.clock.clear_particles();

        let start = self.dataset.dates().get(self.date_start).map(String::as_str);
        let end = self.dataset.dates().get(self.date_end).map(String::as_str);
        let records = self
            .dataset
            .filtered(&self.team_id, start, end)
            .collect::<Vec<_>>();

        let prior = self.scene.take();
        let scene = build_pass_scene(&records, prior, &mut rand::thread_rng());

        self.visible_player_count = scene.as_ref().map_or(0, |scene| scene.nodes.len());
        self.visible_edge_count = scene.as_ref().map_or(0, |scene| scene.edges.len());
        self.scene = scene;
        self.scene_dirty = false;
    }
}

fn intern_player(
    nodes: &mut Vec<PlayerNode>,
    index_by_id: &mut HashMap<String, usize>,
    prior_nodes: &mut HashMap<String, PlayerNode>,
    rng: &mut impl Rng,
    id: &str,
    name: &str,
) -> usize {
    if let Some(&index) = index_by_id.get(id) {
        return index;
    }

    let index = nodes.len();
    let node = match prior_nodes.remove(id) {
        // Carry layout position, velocity and depth seed across rebuilds so
        // filter changes do not rescramble the scene; totals are recomputed
        // wholesale below.
        Some(mut node) => {
            node.assist_total = 0;
            node
        }
        None => {
            let (jx, jy) = stable_pair(id);
            let mut direction = vec2(jx, jy);
            if direction.length_sq() <= 0.0001 {
                let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
                direction = vec2(angle.cos(), angle.sin());
            } else {
                direction = direction.normalized();
            }

            PlayerNode {
                id: id.to_string(),
                name: name.to_string(),
                assist_total: 0,
                world_pos: direction * INITIAL_RING_RADIUS,
                velocity: Vec2::ZERO,
                depth_seed: rng.gen_range(-DEPTH_SEED_RANGE..=DEPTH_SEED_RANGE),
            }
        }
    };

    nodes.push(node);
    index_by_id.insert(id.to_string(), index);
    index
}

pub(in crate::app) fn build_pass_scene(
    records: &[&PassRecord],
    prior: Option<RenderScene>,
    rng: &mut impl Rng,
) -> Option<RenderScene> {
    if records.is_empty() {
        return None;
    }

    let mut prior_nodes = prior
        .map(|scene| {
            scene
                .nodes
                .into_iter()
                .map(|node| (node.id.clone(), node))
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    let mut nodes: Vec<PlayerNode> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<PassEdge> = Vec::new();
    let mut edge_by_pair: HashMap<(usize, usize), usize> = HashMap::new();

    for record in records {
        let source = intern_player(
            &mut nodes,
            &mut index_by_id,
            &mut prior_nodes,
            rng,
            &record.source_id,
            &record.source_name,
        );
        let target = intern_player(
            &mut nodes,
            &mut index_by_id,
            &mut prior_nodes,
            rng,
            &record.target_id,
            &record.target_name,
        );

        if source == target {
            continue;
        }

        nodes[source].assist_total += record.assists;

        match edge_by_pair.entry((source, target)) {
            Entry::Occupied(entry) => {
                let edge = &mut edges[*entry.get()];
                edge.passes += record.passes;
                edge.assists += record.assists;
            }
            Entry::Vacant(entry) => {
                entry.insert(edges.len());
                edges.push(PassEdge {
                    source,
                    target,
                    passes: record.passes,
                    assists: record.assists,
                });
            }
        }
    }

    if nodes.is_empty() {
        return None;
    }

    // Pairs that never completed a pass are noise; they drop out here and
    // never reach the render stage.
    edges.retain(|edge| edge.passes > 0);

    let max_assist_total = nodes.iter().map(|node| node.assist_total).max().unwrap_or(0);
    let max_pass_weight = edges.iter().map(|edge| edge.passes).max().unwrap_or(0);

    Some(RenderScene {
        nodes,
        edges,
        index_by_id,
        max_assist_total,
        max_pass_weight,
        layout_scratch: LayoutScratch::default(),
        frame: FrameScratch::default(),
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::app::render_utils::node_radius;

    fn record(source: &str, target: &str, passes: u32, assists: u32) -> PassRecord {
        PassRecord {
            team_id: "1".to_string(),
            team_name: "Team".to_string(),
            game_date: "2024-01-01".to_string(),
            source_id: source.to_string(),
            source_name: source.to_string(),
            target_id: target.to_string(),
            target_name: target.to_string(),
            passes,
            assists,
        }
    }

    fn build(records: &[PassRecord]) -> RenderScene {
        let refs = records.iter().collect::<Vec<_>>();
        build_pass_scene(&refs, None, &mut StdRng::seed_from_u64(1)).expect("scene builds")
    }

    fn edge_weights(scene: &RenderScene) -> Vec<(String, String, u32, u32)> {
        let mut weights = scene
            .edges
            .iter()
            .map(|edge| {
                (
                    scene.nodes[edge.source].id.clone(),
                    scene.nodes[edge.target].id.clone(),
                    edge.passes,
                    edge.assists,
                )
            })
            .collect::<Vec<_>>();
        weights.sort();
        weights
    }

    #[test]
    fn records_accumulate_per_ordered_pair() {
        let scene = build(&[
            record("a", "b", 3, 1),
            record("a", "b", 4, 0),
            record("b", "a", 2, 2),
        ]);

        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(
            edge_weights(&scene),
            [
                ("a".to_string(), "b".to_string(), 7, 1),
                ("b".to_string(), "a".to_string(), 2, 2),
            ]
        );
    }

    #[test]
    fn aggregation_is_order_independent() {
        let forward = build(&[
            record("a", "b", 3, 1),
            record("b", "c", 5, 2),
            record("a", "b", 2, 0),
        ]);
        let shuffled = build(&[
            record("a", "b", 2, 0),
            record("b", "c", 5, 2),
            record("a", "b", 3, 1),
        ]);

        assert_eq!(edge_weights(&forward), edge_weights(&shuffled));
    }

    #[test]
    fn zero_pass_pairs_never_reach_the_scene() {
        let scene = build(&[
            record("a", "b", 0, 4),
            record("a", "c", 2, 0),
        ]);

        assert_eq!(scene.edges.len(), 1);
        assert_eq!(scene.nodes.len(), 3);
        // The dropped pair still counted toward the passer's assist total.
        let a = &scene.nodes[scene.index_by_id["a"]];
        assert_eq!(a.assist_total, 4);
    }

    #[test]
    fn self_passes_are_ignored() {
        let scene = build(&[record("a", "a", 9, 3), record("a", "b", 1, 0)]);
        assert_eq!(scene.edges.len(), 1);
        let a = &scene.nodes[scene.index_by_id["a"]];
        assert_eq!(a.assist_total, 0);
    }

    #[test]
    fn depth_seeds_are_bounded_and_survive_rebuilds() {
        let records = vec![record("a", "b", 3, 1), record("b", "c", 2, 0)];
        let refs = records.iter().collect::<Vec<_>>();

        let mut rng = StdRng::seed_from_u64(9);
        let first = build_pass_scene(&refs, None, &mut rng).expect("scene builds");
        for node in &first.nodes {
            assert!((-DEPTH_SEED_RANGE..=DEPTH_SEED_RANGE).contains(&node.depth_seed));
        }

        let seeds = first
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.depth_seed))
            .collect::<HashMap<_, _>>();

        let second = build_pass_scene(&refs, Some(first), &mut rng).expect("scene rebuilds");
        for node in &second.nodes {
            assert_eq!(seeds[&node.id], node.depth_seed);
        }
    }

    #[test]
    fn two_player_scenario_hits_the_radius_extremes() {
        let scene = build(&[record("p1", "p2", 10, 3)]);

        assert_eq!(scene.edges.len(), 1);
        assert_eq!(scene.edges[0].passes, 10);
        assert_eq!(scene.max_pass_weight, 10);

        let p1 = &scene.nodes[scene.index_by_id["p1"]];
        let p2 = &scene.nodes[scene.index_by_id["p2"]];
        assert_eq!(node_radius(p1.assist_total, scene.max_assist_total), 45.0);
        assert_eq!(node_radius(p2.assist_total, scene.max_assist_total), 15.0);
    }

    #[test]
    fn empty_window_builds_no_scene() {
        let refs: Vec<&PassRecord> = Vec::new();
        assert!(build_pass_scene(&refs, None, &mut StdRng::seed_from_u64(1)).is_none());
    }
}
