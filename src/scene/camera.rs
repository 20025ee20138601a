use glam::{Vec2, Vec3};

use crate::targeting::{CameraProjection, Ray};

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2;

/// First-person camera: a position plus yaw/pitch, projecting through a
/// pinhole with the given vertical field of view.
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub viewport: Vec2,
}

impl CameraController {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(1280.0, 720.0),
        }
    }

    /// Stand in the middle of `center`/`extent` at eye height, looking along +Z.
    pub fn from_bounds(center: [f32; 3], extent: [f32; 3]) -> Self {
        let center = Vec3::from_array(center);
        let floor = center.y - extent[1];
        let eye_height = (extent[1] * 2.0).min(1.6);
        let position = Vec3::new(center.x, floor + eye_height, center.z);
        let (yaw, pitch) = forward_to_yaw_pitch(Vec3::Z);
        Self::new(position, yaw, pitch)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Apply a pointer drag. Dragging right turns right, dragging up looks up.
    /// Pitch stops at straight up/down.
    pub fn look(&mut self, delta: Vec2, sensitivity_deg: f32) {
        let scale = sensitivity_deg.to_radians();
        self.yaw += delta.x * scale;
        self.pitch -= delta.y * scale;
        wrap_angles(&mut self.yaw, &mut self.pitch);
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        camera_basis(self.yaw, self.pitch)
    }
}

impl CameraProjection for CameraController {
    fn screen_to_ray(&self, screen_pos: Vec2) -> Option<Ray> {
        if !screen_pos.is_finite() || self.viewport.min_element() <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * screen_pos.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen_pos.y / self.viewport.y,
        );
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.viewport.x / self.viewport.y;
        let (forward, right, up) = self.basis();
        let direction = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }
}

fn forward_to_yaw_pitch(forward: Vec3) -> (f32, f32) {
    let n = forward.normalize_or_zero();
    let yaw = n.z.atan2(n.x);
    let pitch = n.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

fn camera_basis(yaw: f32, pitch: f32) -> (Vec3, Vec3, Vec3) {
    let cos_pitch = pitch.cos();
    let forward = Vec3::new(yaw.cos() * cos_pitch, pitch.sin(), yaw.sin() * cos_pitch);
    let right = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
    let up = right.cross(forward).normalize_or_zero();
    (forward, right, up)
}

fn wrap_angles(yaw: &mut f32, pitch: &mut f32) {
    const TWO_PI: f32 = std::f32::consts::PI * 2.0;
    if yaw.is_finite() {
        *yaw = (*yaw + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI;
    }
    if pitch.is_finite() {
        *pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}
