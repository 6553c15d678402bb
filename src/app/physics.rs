use eframe::egui::Vec2;

use super::RenderScene;

// Springs prefer a 400-unit link length; charge and collision keep the
// roster spread. A team is at most a couple dozen nodes, so the pair loops
// stay quadratic.
const LINK_DISTANCE: f32 = 400.0;
const SPRING_STRENGTH: f32 = 0.02;
const REPULSION_STRENGTH: f32 = 42_000.0;
const COLLIDE_RADIUS: f32 = 50.0;
const COLLIDE_STRENGTH: f32 = 1.6;
const CENTER_PULL: f32 = 0.0016;
const VELOCITY_DAMPING: f32 = 0.86;

pub(in crate::app) fn step_layout(scene: &mut RenderScene, delta_seconds: f32) -> bool {
    let node_count = scene.nodes.len();
    if node_count < 2 {
        return false;
    }

    let forces = &mut scene.layout_scratch.forces;
    forces.resize(node_count, Vec2::ZERO);
    forces.fill(Vec2::ZERO);

    let time_step_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = scene.nodes[i].world_pos - scene.nodes[j].world_pos;
            let distance_sq = delta.length_sq().max(25.0);
            let distance = distance_sq.sqrt();
            let direction = delta / distance;

            let repulsion = REPULSION_STRENGTH / distance_sq;
            forces[i] += direction * repulsion;
            forces[j] -= direction * repulsion;

            let min_distance = COLLIDE_RADIUS * 2.0;
            if distance < min_distance {
                let push = (min_distance - distance) * COLLIDE_STRENGTH;
                forces[i] += direction * push;
                forces[j] -= direction * push;
            }
        }
    }

    for edge in &scene.edges {
        if edge.source >= node_count || edge.target >= node_count {
            continue;
        }

        let delta = scene.nodes[edge.source].world_pos - scene.nodes[edge.target].world_pos;
        let distance = delta.length().max(0.5);
        let direction = delta / distance;

        let correction = direction * ((distance - LINK_DISTANCE) * SPRING_STRENGTH);
        forces[edge.source] -= correction;
        forces[edge.target] += correction;
    }

    for (index, force) in forces.iter_mut().enumerate() {
        *force -= scene.nodes[index].world_pos * CENTER_PULL;
    }

    let max_force = 180.0;
    let max_speed = 26.0;
    let min_sleep_speed_sq = 0.02 * 0.02;
    let min_sleep_force_sq = 0.08 * 0.08;
    let damping_factor = VELOCITY_DAMPING.powf(time_step_scale);
    let mut any_motion = false;

    for (index, force_value) in forces.iter().enumerate() {
        let mut force = *force_value;
        let force_sq = force.length_sq();
        if force_sq > max_force * max_force {
            force *= max_force / force_sq.sqrt();
        }

        let mut velocity =
            (scene.nodes[index].velocity + (force * (0.055 * time_step_scale))) * damping_factor;
        let mut speed_sq = velocity.length_sq();
        if speed_sq > max_speed * max_speed {
            velocity *= max_speed / speed_sq.sqrt();
            speed_sq = max_speed * max_speed;
        }

        if speed_sq < min_sleep_speed_sq && force_sq < min_sleep_force_sq {
            velocity = Vec2::ZERO;
            speed_sq = 0.0;
        }

        scene.nodes[index].velocity = velocity;
        scene.nodes[index].world_pos += velocity * time_step_scale;
        if speed_sq > 0.000_001 {
            any_motion = true;
        }
    }

    let mut centroid = Vec2::ZERO;
    for node in &scene.nodes {
        centroid += node.world_pos;
    }
    centroid /= node_count as f32;
    if centroid.length_sq() > 0.000_001 {
        for node in &mut scene.nodes {
            node.world_pos -= centroid;
        }
    }

    any_motion
}
