use eframe::egui::Pos2;

pub(in crate::app) const FOCAL_LENGTH: f32 = 1000.0;

// Keeps the perspective denominator away from zero when a point rotates
// through the camera plane at z = -FOCAL_LENGTH.
const MIN_PERSPECTIVE_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub(in crate::app) fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub(in crate::app) const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Projected {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub depth: f32,
}

// Rotation applies about Y, then X, then Z; the axes do not commute, so the
// order is part of the contract.
pub(in crate::app) fn project(
    point: Point3,
    rotation: Rotation,
    focal_length: f32,
    origin: Pos2,
) -> Projected {
    let (sin_y, cos_y) = rotation.y.to_radians().sin_cos();
    let (sin_x, cos_x) = rotation.x.to_radians().sin_cos();
    let (sin_z, cos_z) = rotation.z.to_radians().sin_cos();

    let x1 = point.x * cos_y - point.z * sin_y;
    let z1 = point.z * cos_y + point.x * sin_y;

    let y1 = point.y * cos_x - z1 * sin_x;
    let z2 = z1 * cos_x + point.y * sin_x;

    let x2 = x1 * cos_z - y1 * sin_z;
    let y2 = y1 * cos_z + x1 * sin_z;

    let scale = focal_length / (focal_length + z2).max(MIN_PERSPECTIVE_DISTANCE);

    Projected {
        x: x2 * scale + origin.x,
        y: y2 * scale + origin.y,
        scale,
        depth: z2,
    }
}

pub(in crate::app) fn perspective_scale(depth: f32) -> f32 {
    FOCAL_LENGTH / (FOCAL_LENGTH + depth).max(MIN_PERSPECTIVE_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_rotation_is_pure_perspective() {
        let projected = project(
            Point3::new(10.0, -20.0, 30.0),
            Rotation::ZERO,
            FOCAL_LENGTH,
            pos2(500.0, 400.0),
        );

        let scale = 1000.0 / 1030.0;
        assert_close(projected.scale, scale, 1e-6);
        assert_close(projected.x, 10.0 * scale + 500.0, 1e-4);
        assert_close(projected.y, -20.0 * scale + 400.0, 1e-4);
        assert_close(projected.depth, 30.0, 1e-6);
    }

    #[test]
    fn fixed_vector_matches_y_then_x_then_z_composition() {
        let projected = project(
            Point3::new(100.0, 50.0, 200.0),
            Rotation {
                x: 30.0,
                y: 45.0,
                z: 60.0,
            },
            FOCAL_LENGTH,
            pos2(500.0, 400.0),
        );

        assert_close(projected.x, 515.719_65, 5e-3);
        assert_close(projected.y, 323.373_28, 5e-3);
        assert_close(projected.scale, 0.827_327_12, 1e-5);
        assert_close(projected.depth, 208.711_73, 5e-3);

        // Applying X before Y would land elsewhere (511.877, 326.922); make
        // sure we are not accidentally in that composition.
        assert!((projected.x - 511.877_32).abs() > 1.0);
        assert!((projected.y - 326.921_99).abs() > 1.0);
    }

    #[test]
    fn y_then_x_ordering_for_axis_point() {
        // (0, 0, 100) under Y=90 swings to -x before the X rotation sees it,
        // so the X rotation leaves it in the z = 0 plane.
        let projected = project(
            Point3::new(0.0, 0.0, 100.0),
            Rotation {
                x: 90.0,
                y: 90.0,
                z: 0.0,
            },
            FOCAL_LENGTH,
            Pos2::ZERO,
        );

        assert_close(projected.x, -100.0, 1e-3);
        assert_close(projected.y, 0.0, 1e-3);
        assert_close(projected.depth, 0.0, 1e-3);
    }

    #[test]
    fn camera_plane_depth_is_clamped() {
        let projected = project(
            Point3::new(100.0, 0.0, -FOCAL_LENGTH),
            Rotation::ZERO,
            FOCAL_LENGTH,
            Pos2::ZERO,
        );

        assert!(projected.scale.is_finite());
        assert_close(projected.scale, FOCAL_LENGTH, 1e-3);

        let behind = project(
            Point3::new(0.0, 0.0, -2.0 * FOCAL_LENGTH),
            Rotation::ZERO,
            FOCAL_LENGTH,
            Pos2::ZERO,
        );
        assert!(behind.scale > 0.0);
        assert!(behind.scale.is_finite());
    }

    #[test]
    fn perspective_scale_matches_project() {
        let projected = project(
            Point3::new(0.0, 0.0, 250.0),
            Rotation::ZERO,
            FOCAL_LENGTH,
            Pos2::ZERO,
        );
        assert_close(perspective_scale(projected.depth), projected.scale, 1e-6);
    }
}
