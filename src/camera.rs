//! 2D orthographic camera.
//!
//! Maps a scene-space rectangle to normalized device coordinates, with the
//! vertical axis flipped so that scene coordinates follow the top-left-origin
//! convention of the host canvas.

use glam::{Mat3, Vec3};

/// Scene-space bounds for the 2D orthographic camera.
///
/// The transform maps `[left, right] × [bottom, top]` onto `[-1, 1]²`, with
/// `(left, bottom)` landing at NDC `(-1, +1)` and `(right, top)` at
/// `(+1, -1)` — the sign flip on Y keeps a y-down scene upright on a y-up
/// device.
///
/// Bounds must be finite with `left != right` and `bottom != top`; the
/// caller owns that invariant (a degenerate rectangle produces a
/// non-invertible transform, not an error).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2d {
    /// Left scene-space bound.
    pub left: f32,
    /// Right scene-space bound.
    pub right: f32,
    /// Bottom scene-space bound.
    pub bottom: f32,
    /// Top scene-space bound.
    pub top: f32,
}

impl Camera2d {
    /// Camera over `[-margin, width+margin] × [-margin, height+margin]`.
    ///
    /// The margin over-extends the viewport slightly so elements sitting
    /// exactly on the boundary are not clipped. A fixed margin is an
    /// approximation of half a rendered point's on-screen radius; it is
    /// configurable so hosts can tune it to their point size.
    #[must_use]
    pub const fn with_margin(width: f32, height: f32, margin: f32) -> Self {
        Self {
            left: -margin,
            right: width + margin,
            bottom: -margin,
            top: height + margin,
        }
    }

    /// The 3×3 homogeneous scene-to-NDC transform.
    #[must_use]
    pub fn matrix(&self) -> Mat3 {
        let rl = self.right - self.left;
        let tb = self.top - self.bottom;
        Mat3::from_cols(
            Vec3::new(2.0 / rl, 0.0, 0.0),
            Vec3::new(0.0, -2.0 / tb, 0.0),
            Vec3::new(
                -(self.left + self.right) / rl,
                (self.top + self.bottom) / tb,
                1.0,
            ),
        )
    }
}

/// GPU uniform holding the camera transform.
///
/// A WGSL `mat3x3<f32>` aligns each column to 16 bytes, so the three
/// columns are padded out to `vec4`s (48 bytes total).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 3×3 scene-to-NDC matrix, columns padded to vec4.
    pub mvp: [[f32; 4]; 3],
}

impl CameraUniform {
    /// Pack a matrix into the padded GPU layout.
    #[must_use]
    pub fn from_matrix(m: &Mat3) -> Self {
        let col = |c: Vec3| [c.x, c.y, c.z, 0.0];
        Self {
            mvp: [col(m.x_axis), col(m.y_axis), col(m.z_axis)],
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn project(camera: &Camera2d, point: Vec2) -> Vec2 {
        camera.matrix().transform_point2(point)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(
            (a - b).length() < 1e-5,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn corners_map_to_ndc_corners_with_vertical_flip() {
        let camera = Camera2d {
            left: 0.0,
            right: 800.0,
            bottom: 0.0,
            top: 600.0,
        };
        assert_close(project(&camera, Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_close(
            project(&camera, Vec2::new(800.0, 600.0)),
            Vec2::new(1.0, -1.0),
        );
        assert_close(
            project(&camera, Vec2::new(400.0, 300.0)),
            Vec2::new(0.0, 0.0),
        );
    }

    #[test]
    fn off_center_bounds() {
        let camera = Camera2d {
            left: -10.0,
            right: 30.0,
            bottom: 5.0,
            top: 25.0,
        };
        assert_close(
            project(&camera, Vec2::new(-10.0, 5.0)),
            Vec2::new(-1.0, 1.0),
        );
        assert_close(
            project(&camera, Vec2::new(30.0, 25.0)),
            Vec2::new(1.0, -1.0),
        );
    }

    #[test]
    fn margin_extends_bounds_symmetrically() {
        let camera = Camera2d::with_margin(100.0, 50.0, 0.01);
        assert_eq!(camera.left, -0.01);
        assert_eq!(camera.right, 100.01);
        assert_eq!(camera.bottom, -0.01);
        assert_eq!(camera.top, 50.01);
    }

    #[test]
    fn uniform_packs_columns_with_padding() {
        let camera = Camera2d {
            left: 0.0,
            right: 2.0,
            bottom: 0.0,
            top: 2.0,
        };
        let u = CameraUniform::from_matrix(&camera.matrix());
        assert_eq!(size_of::<CameraUniform>(), 48);
        // x scale lives in column 0, y scale (negated) in column 1.
        assert_eq!(u.mvp[0][0], 1.0);
        assert_eq!(u.mvp[1][1], -1.0);
        assert_eq!(u.mvp[0][3], 0.0);
        assert_eq!(u.mvp[1][3], 0.0);
    }
}
