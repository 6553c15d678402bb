use eframe::egui::{Pos2, pos2};
use rand::Rng;

use super::PassEdge;
use super::projection::Projected;

// Degrees advanced per 16 ms of wall time while auto-rotating.
const AUTO_ROTATE_STEP: f64 = 0.05;

const SPAWN_RATE_PER_PASS: f32 = 0.002;
const BALL_SPEED_MIN: f32 = 0.01;
const BALL_SPEED_SPREAD: f32 = 0.005;

pub(in crate::app) const BALL_ARC_CURVATURE: f32 = 0.3;

#[derive(Clone, Debug)]
pub(in crate::app) struct Particle {
    pub edge: usize,
    pub t: f32,
    pub speed: f32,
    pub assist_flavored: bool,
    pub source_depth: f32,
    pub target_depth: f32,
}

impl Particle {
    pub(in crate::app) fn depth(&self) -> f32 {
        let t = self.t.min(1.0);
        self.source_depth + (self.target_depth - self.source_depth) * t
    }
}

pub(in crate::app) struct AnimationClock {
    angle_y: f64,
    last_tick_ms: Option<f64>,
    particles: Vec<Particle>,
}

impl AnimationClock {
    pub(in crate::app) fn new(angle_y: f32) -> Self {
        Self {
            angle_y: f64::from(angle_y),
            last_tick_ms: None,
            particles: Vec::new(),
        }
    }

    pub(in crate::app) fn angle_y(&self) -> f32 {
        self.angle_y as f32
    }

    // The first tick after a freeze only records the timestamp, so resuming
    // auto-rotation never jumps by the paused interval.
    pub(in crate::app) fn advance_rotation(&mut self, now_ms: f64) {
        if let Some(last) = self.last_tick_ms {
            let delta_ms = (now_ms - last).max(0.0);
            self.angle_y = (self.angle_y + AUTO_ROTATE_STEP * delta_ms / 16.0).rem_euclid(360.0);
        }
        self.last_tick_ms = Some(now_ms);
    }

    pub(in crate::app) fn freeze(&mut self, angle_y: f32) {
        self.angle_y = f64::from(angle_y);
        self.last_tick_ms = None;
    }

    pub(in crate::app) fn nudge(&mut self, delta_degrees: f32) {
        self.angle_y = (self.angle_y + f64::from(delta_degrees)).rem_euclid(360.0);
    }

    pub(in crate::app) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(in crate::app) fn spawn_particles(
        &mut self,
        edges: &[PassEdge],
        node_projections: &[Projected],
        rng: &mut impl Rng,
    ) {
        for (index, edge) in edges.iter().enumerate() {
            if rng.r#gen::<f32>() >= spawn_chance(edge.passes) {
                continue;
            }

            let assist_ratio = if edge.passes > 0 {
                edge.assists as f32 / edge.passes as f32
            } else {
                0.0
            };

            self.particles.push(Particle {
                edge: index,
                t: 0.0,
                speed: BALL_SPEED_MIN + rng.r#gen::<f32>() * BALL_SPEED_SPREAD,
                assist_flavored: rng.r#gen::<f32>() < assist_ratio,
                source_depth: node_projections[edge.source].depth,
                target_depth: node_projections[edge.target].depth,
            });
        }
    }

    pub(in crate::app) fn advance_particles(&mut self) {
        for particle in &mut self.particles {
            particle.t += particle.speed;
        }
    }

    // Runs after the frame has drawn, so a finishing particle still renders
    // the end of its arc before it disappears.
    pub(in crate::app) fn retire_finished(&mut self) {
        self.particles.retain(|particle| particle.t < 1.0);
    }

    pub(in crate::app) fn clear_particles(&mut self) {
        self.particles.clear();
    }
}

pub(in crate::app) fn spawn_chance(passes: u32) -> f32 {
    (passes as f32 * SPAWN_RATE_PER_PASS).min(1.0)
}

pub(in crate::app) fn arc_point(source: Pos2, target: Pos2, t: f32, curvature: f32) -> Pos2 {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return source;
    }

    let mid_x = (source.x + target.x) * 0.5;
    let mid_y = (source.y + target.y) * 0.5;
    let bow = length * curvature;
    let control_x = mid_x + (-dy / length) * bow;
    let control_y = mid_y + (dx / length) * bow;

    let inv = 1.0 - t;
    pos2(
        inv * inv * source.x + 2.0 * inv * t * control_x + t * t * target.x,
        inv * inv * source.y + 2.0 * inv * t * control_y + t * t * target.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Pos2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::app::projection::{FOCAL_LENGTH, Point3, Rotation, project};

    fn projections(depths: &[f32]) -> Vec<Projected> {
        depths
            .iter()
            .map(|&z| {
                project(
                    Point3::new(0.0, 0.0, z),
                    Rotation::ZERO,
                    FOCAL_LENGTH,
                    Pos2::ZERO,
                )
            })
            .collect()
    }

    fn edge(passes: u32, assists: u32) -> PassEdge {
        PassEdge {
            source: 0,
            target: 1,
            passes,
            assists,
        }
    }

    #[test]
    fn rotation_advances_at_rate_and_wraps() {
        let mut clock = AnimationClock::new(0.0);
        let mut now = 0.0;

        clock.advance_rotation(now);
        assert_eq!(clock.angle_y(), 0.0);

        let mut previous = clock.angle_y();
        for _ in 0..100 {
            now += 16.0;
            clock.advance_rotation(now);
            assert!(clock.angle_y() > previous);
            previous = clock.angle_y();
        }
        // 100 ticks of 16 ms at 0.05 deg per tick.
        assert!((clock.angle_y() - 5.0).abs() < 1e-4);

        // A full revolution is 360 / 0.05 = 7200 ticks.
        for _ in 100..7200 {
            now += 16.0;
            clock.advance_rotation(now);
        }
        let wrapped = f64::from(clock.angle_y()).rem_euclid(360.0);
        assert!(wrapped < 1e-6 || wrapped > 360.0 - 1e-6);
    }

    #[test]
    fn first_tick_after_freeze_does_not_jump() {
        let mut clock = AnimationClock::new(0.0);
        clock.advance_rotation(0.0);
        clock.advance_rotation(16.0);
        let angle = clock.angle_y();

        clock.freeze(angle);
        // A long pause, then resume: the gap must not be integrated.
        clock.advance_rotation(100_000.0);
        assert_eq!(clock.angle_y(), angle);
        clock.advance_rotation(100_016.0);
        assert!((clock.angle_y() - angle - 0.05).abs() < 1e-4);
    }

    #[test]
    fn freeze_snaps_to_external_angle() {
        let mut clock = AnimationClock::new(0.0);
        clock.advance_rotation(0.0);
        clock.advance_rotation(160.0);
        assert!(clock.angle_y() > 0.0);

        clock.freeze(42.0);
        assert_eq!(clock.angle_y(), 42.0);
    }

    #[test]
    fn particle_lives_for_ceil_inverse_speed_ticks() {
        let mut clock = AnimationClock::new(0.0);
        let speed = 0.013;
        clock.particles.push(Particle {
            edge: 0,
            t: 0.0,
            speed,
            assist_flavored: false,
            source_depth: 0.0,
            target_depth: 0.0,
        });

        let mut ticks = 0;
        let mut previous = 0.0;
        while !clock.particles.is_empty() {
            clock.advance_particles();
            if let Some(particle) = clock.particles.first() {
                assert!(particle.t > previous);
                previous = particle.t;
            }
            clock.retire_finished();
            ticks += 1;
            assert!(ticks < 1000, "particle never retired");
        }

        assert_eq!(ticks, (1.0 / speed).ceil() as i32);
    }

    #[test]
    fn spawn_chance_is_capped_rate() {
        assert_eq!(spawn_chance(10), 0.02);
        assert_eq!(spawn_chance(500), 1.0);
        assert_eq!(spawn_chance(5000), 1.0);
        assert_eq!(spawn_chance(0), 0.0);
    }

    #[test]
    fn saturated_edge_spawns_every_tick_with_bounded_speed() {
        let mut clock = AnimationClock::new(0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let edges = vec![edge(500, 0)];
        let nodes = projections(&[-120.0, 80.0]);

        for tick in 1..=20 {
            clock.spawn_particles(&edges, &nodes, &mut rng);
            assert_eq!(clock.particles().len(), tick);
        }

        for particle in clock.particles() {
            assert!(particle.speed >= BALL_SPEED_MIN);
            assert!(particle.speed < BALL_SPEED_MIN + BALL_SPEED_SPREAD);
            assert!(!particle.assist_flavored);
            assert_eq!(particle.source_depth, -120.0);
            assert_eq!(particle.target_depth, 80.0);
        }
    }

    #[test]
    fn every_pass_an_assist_means_every_ball_is_assist_flavored() {
        let mut clock = AnimationClock::new(0.0);
        let mut rng = StdRng::seed_from_u64(11);
        let edges = vec![edge(500, 500)];
        let nodes = projections(&[0.0, 0.0]);

        for _ in 0..20 {
            clock.spawn_particles(&edges, &nodes, &mut rng);
        }
        assert!(clock.particles().iter().all(|p| p.assist_flavored));
    }

    #[test]
    fn particle_depth_interpolates_spawn_depths() {
        let particle = Particle {
            edge: 0,
            t: 0.25,
            speed: 0.01,
            assist_flavored: false,
            source_depth: -100.0,
            target_depth: 100.0,
        };
        assert_eq!(particle.depth(), -50.0);
    }

    #[test]
    fn clearing_discards_all_particles() {
        let mut clock = AnimationClock::new(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        clock.spawn_particles(&[edge(500, 0)], &projections(&[0.0, 0.0]), &mut rng);
        assert!(!clock.particles().is_empty());

        clock.clear_particles();
        assert!(clock.particles().is_empty());
    }

    #[test]
    fn arc_endpoints_match_and_midpoint_bows() {
        let source = Pos2::new(0.0, 0.0);
        let target = Pos2::new(100.0, 0.0);

        let start = arc_point(source, target, 0.0, BALL_ARC_CURVATURE);
        let end = arc_point(source, target, 1.0, BALL_ARC_CURVATURE);
        assert!((start.x - source.x).abs() < 1e-4 && (start.y - source.y).abs() < 1e-4);
        assert!((end.x - target.x).abs() < 1e-4 && (end.y - target.y).abs() < 1e-4);

        // Perpendicular offset at the apex is half the control-point bow.
        let mid = arc_point(source, target, 0.5, BALL_ARC_CURVATURE);
        assert!((mid.x - 50.0).abs() < 1e-4);
        assert!((mid.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_arc_stays_at_source() {
        let point = Pos2::new(40.0, 40.0);
        let on_arc = arc_point(point, point, 0.5, BALL_ARC_CURVATURE);
        assert_eq!(on_arc, point);
    }
}
