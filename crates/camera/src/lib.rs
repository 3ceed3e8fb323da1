use cgmath::{Matrix4, Rad, SquareMatrix, Vector3, Zero};
use log::trace;

/// Orthographic 2D camera.
///
/// The projection is fixed at construction. The view matrix follows the
/// camera position and its rotation around the z axis, and is recomputed only
/// when one of them actually changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    projection: Matrix4<f32>,
    view: Matrix4<f32>,

    position: Vector3<f32>,
    // radians, around +z
    rotation: f32,
}

impl Camera {
    /// Creates a camera whose projection maps the `[left, right] x [bottom, top]`
    /// rectangle and the `[near, far]` depth range to clip space.
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            projection: cgmath::ortho(left, right, bottom, top, near, far),
            view: Matrix4::identity(),
            position: Vector3::zero(),
            rotation: 0.0,
        }
    }

    /// Camera covering `width x height` world units with the origin at the
    /// bottom-left corner.
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height, -1.0, 1.0)
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        if self.position != position {
            self.position = position;
            self.compute_view_matrix();
        }
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.set_position(self.position + delta);
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        if self.rotation != rotation {
            self.rotation = rotation;
            self.compute_view_matrix();
        }
    }

    // inverse(T(p) * R(a)) == R(-a) * T(-p)
    fn compute_view_matrix(&mut self) {
        self.view =
            Matrix4::from_angle_z(Rad(-self.rotation)) * Matrix4::from_translation(-self.position);
        trace!(
            "camera view recomputed: position={:?} rotation={}",
            self.position,
            self.rotation
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use cgmath::Vector4;

    use super::*;

    fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
        let actual: [[f32; 4]; 4] = actual.into();
        let expected: [[f32; 4]; 4] = expected.into();
        for (a, e) in actual.iter().flatten().zip(expected.iter().flatten()) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    fn assert_vector_eq(actual: Vector4<f32>, expected: Vector4<f32>) {
        let actual: [f32; 4] = actual.into();
        let expected: [f32; 4] = expected.into();
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn new_camera_has_identity_view() {
        let camera = Camera::with_viewport(800.0, 600.0);
        assert_eq!(camera.view(), Matrix4::identity());
        assert_eq!(camera.position(), Vector3::zero());
    }

    #[test]
    fn projection_maps_viewport_corners_to_clip_space() {
        let camera = Camera::with_viewport(800.0, 600.0);
        let top_right = camera.projection() * Vector4::new(800.0, 600.0, 0.0, 1.0);
        let bottom_left = camera.projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_vector_eq(top_right, Vector4::new(1.0, 1.0, 0.0, 1.0));
        assert_vector_eq(bottom_left, Vector4::new(-1.0, -1.0, 0.0, 1.0));
    }

    #[test]
    fn view_moves_world_opposite_to_camera() {
        let mut camera = Camera::default();
        camera.set_position(Vector3::new(2.0, 3.0, 0.0));
        let p = camera.view() * Vector4::new(2.0, 3.0, 0.0, 1.0);
        assert_vector_eq(p, Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn view_is_inverse_of_camera_transform() {
        let mut camera = Camera::default();
        camera.set_position(Vector3::new(-4.0, 1.5, 0.0));
        camera.set_rotation(FRAC_PI_2);
        let model = Matrix4::from_translation(camera.position())
            * Matrix4::from_angle_z(Rad(camera.rotation()));
        assert_matrix_eq(camera.view() * model, Matrix4::identity());
    }

    #[test]
    fn translate_accumulates() {
        let mut camera = Camera::default();
        camera.translate(Vector3::new(1.0, 0.0, 0.0));
        camera.translate(Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(camera.position(), Vector3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn getters_return_copies() {
        let camera = Camera::default();
        let mut projection = camera.projection();
        projection.x.x = 42.0;
        assert_ne!(camera.projection(), projection);
    }
}
