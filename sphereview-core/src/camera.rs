use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Quat;

/// Keep a little headroom at the poles so the view never flips.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Drag-look camera for the panorama.
///
/// Angles are radians. Yaw wraps, pitch clamps short of the poles, and a
/// yaw-only scene ignores vertical drag entirely.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    yaw: f32,
    pitch: f32,
    yaw_only: bool,
}

impl Camera {
    pub fn new(default_yaw_deg: f32, yaw_only: bool) -> Self {
        Self {
            yaw: default_yaw_deg.to_radians().rem_euclid(TAU),
            pitch: 0.0,
            yaw_only,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Apply a drag delta in radians.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(TAU);
        if !self.yaw_only {
            self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    /// Orientation of the view: yaw about Y, then pitch about X.
    pub fn pose(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_yaw_is_applied() {
        let cam = Camera::new(90.0, false);
        assert!((cam.yaw() - FRAC_PI_2).abs() < EPSILON);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut cam = Camera::new(350.0, false);
        cam.rotate(20.0_f32.to_radians(), 0.0);
        assert!((cam.yaw() - 10.0_f32.to_radians()).abs() < EPSILON);
    }

    #[test]
    fn test_pitch_clamps_at_poles() {
        let mut cam = Camera::new(0.0, false);
        cam.rotate(0.0, 10.0);
        assert!(cam.pitch() < FRAC_PI_2);
        cam.rotate(0.0, -20.0);
        assert!(cam.pitch() > -FRAC_PI_2);
    }

    #[test]
    fn test_yaw_only_ignores_pitch() {
        let mut cam = Camera::new(0.0, true);
        cam.rotate(0.1, 0.5);
        assert_eq!(cam.pitch(), 0.0);
        assert!(cam.yaw() > 0.0);
    }

    #[test]
    fn test_identity_pose_at_rest() {
        let cam = Camera::new(0.0, false);
        let pose = cam.pose();
        assert!((pose.w - 1.0).abs() < EPSILON);
    }
}
