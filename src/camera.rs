//! Free-fly camera.
//!
//! The [`Camera`] keeps a position and a yaw/pitch orientation (in degrees) and derives an
//! orthonormal front/right/up basis from them whenever the orientation changes.

use glam::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = 0.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_FOV: f32 = 45.0;

pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 45.0;
pub const PITCH_LIMIT: f32 = 89.0;

/// Direction of a camera translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Camera {
    /// Creates a camera at `position` looking along the direction given by `yaw` and `pitch`.
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.normalize(),
            yaw,
            pitch,
            fov: DEFAULT_FOV,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
        };
        camera.update_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, 0.1, 100.0)
    }

    /// Moves the camera `speed * delta_time` units in the given direction.
    pub fn translate(&mut self, direction: Movement, delta_time: f32) {
        let step = self.speed * delta_time;
        match direction {
            Movement::Forward => self.position += self.front * step,
            Movement::Backward => self.position -= self.front * step,
            Movement::Left => self.position -= self.right * step,
            Movement::Right => self.position += self.right * step,
            Movement::Up => self.position += self.world_up * step,
            Movement::Down => self.position -= self.world_up * step,
        }
    }

    /// Turns the camera by a mouse offset in pixels.
    pub fn rotate(&mut self, offset_x: f32, offset_y: f32, constrain_pitch: bool) {
        self.yaw += offset_x * self.sensitivity;
        self.pitch += offset_y * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrows (positive offset) or widens the field of view.
    pub fn zoom(&mut self, offset_y: f32) {
        self.fov = (self.fov - offset_y).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[cfg(test)]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[cfg(test)]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    fn update_vectors(&mut self) {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();

        self.front = Vec3::new(
            pitch_rad.cos() * yaw_rad.cos(),
            pitch_rad.sin(),
            pitch_rad.cos() * yaw_rad.sin(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert!(f.dot(r).abs() < EPSILON, "front.right = {}", f.dot(r));
        assert!(f.dot(u).abs() < EPSILON, "front.up = {}", f.dot(u));
        assert!(r.dot(u).abs() < EPSILON, "right.up = {}", r.dot(u));
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_default_orientation_faces_positive_x() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Y, 0.0, 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::X, EPSILON));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPSILON));
        assert!(camera.right().abs_diff_eq(Vec3::Z, EPSILON));
    }

    #[test]
    fn test_yaw_ninety_faces_positive_z() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Y, 90.0, 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::Z, EPSILON));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.rotate(3.0, 250.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT && camera.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        for _ in 0..100 {
            camera.rotate(-7.0, -400.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT && camera.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn test_unconstrained_pitch_passes_limit() {
        let mut camera = Camera::default();
        camera.rotate(0.0, 1000.0, false);
        assert!(camera.pitch() > PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom(-10.0);
        assert_eq!(camera.fov(), MAX_FOV);
        camera.zoom(30.0);
        assert_eq!(camera.fov(), 15.0);
        camera.zoom(100.0);
        assert_eq!(camera.fov(), MIN_FOV);
        for offset in [3.5, -60.0, 0.25, 44.0, -2.0] {
            camera.zoom(offset);
            assert!((MIN_FOV..=MAX_FOV).contains(&camera.fov()));
        }
    }

    #[test]
    fn test_basis_stays_orthonormal() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, -90.0, 0.0);
        assert_orthonormal(&camera);
        let offsets = [
            (12.0, 4.0),
            (-300.0, 80.0),
            (45.5, -910.0),
            (0.0, 0.0),
            (720.0, 33.3),
            (-1.0, 1000.0),
        ];
        for (dx, dy) in offsets {
            camera.rotate(dx, dy, true);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_forward_then_backward_restores_position() {
        let start = Vec3::new(0.0, 0.0, -3.0);
        let mut camera = Camera::new(start, Vec3::Y, 37.0, -12.0);
        camera.translate(Movement::Forward, 0.016);
        assert!(!camera.position().abs_diff_eq(start, EPSILON));
        camera.translate(Movement::Backward, 0.016);
        assert!(camera.position().abs_diff_eq(start, EPSILON));
    }

    #[test]
    fn test_vertical_movement_uses_world_up() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::Y, 10.0, 60.0);
        camera.translate(Movement::Up, 1.0);
        assert!(camera.position().abs_diff_eq(Vec3::Y * DEFAULT_SPEED, EPSILON));
        camera.translate(Movement::Down, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::NEG_Y * DEFAULT_SPEED, EPSILON));
    }

    #[test]
    fn test_strafe_moves_along_right() {
        let mut camera = Camera::default();
        camera.translate(Movement::Right, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::Z * 2.0 * DEFAULT_SPEED, EPSILON));
        camera.translate(Movement::Left, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::ZERO, EPSILON));
    }

    #[test]
    fn test_view_matrix_maps_front_to_negative_z() {
        let camera = Camera::new(Vec3::new(4.0, 1.0, -2.0), Vec3::Y, 135.0, 20.0);
        let view = camera.view_matrix();
        let ahead = view.transform_point3(camera.position() + camera.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        let eye = view.transform_point3(camera.position());
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));
    }
}
