//! Camera rig: per-mode view transforms over the vehicle pose.
//!
//! Each mode is a pure function from (pose, camera settings, wall-clock
//! time) to an eye/target pair; the rig only keeps the smoothed follow
//! position as state. When no pose has been received yet the rig holds
//! its last transform so the console still draws.

use bytemuck::{Pod, Zeroable};
use console_core::{CameraMode, CameraSettings};
use glam::{Mat4, Vec3};

/// Exponential smoothing factor for the follow camera, per frame.
pub const FOLLOW_SMOOTHING: f32 = 0.05;
/// Orbit angular rate in radians per wall-clock second.
pub const ORBIT_RATE: f32 = 0.2;
/// Static vantage point for the free camera.
const FREE_EYE: Vec3 = Vec3::new(0.0, 80.0, 0.1);

/// Latest vehicle pose the rig tracks.
#[derive(Debug, Clone, Copy)]
pub struct VehiclePose {
    pub position: Vec3,
    /// Heading (yaw) in radians.
    pub yaw: f32,
}

/// The console camera.
#[derive(Debug, Clone)]
pub struct CameraRig {
    eye: Vec3,
    target: Vec3,
    aspect: f32,
    near: f32,
    far: f32,
    fov_degrees: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye: FREE_EYE,
            target: Vec3::ZERO,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
            fov_degrees: 60.0,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Desired eye/target for a mode. Pure; the follow mode's smoothing
    /// is applied by [`CameraRig::update`] on top of this.
    pub fn mode_transform(
        mode: CameraMode,
        pose: VehiclePose,
        distance: f32,
        elapsed_secs: f32,
    ) -> (Vec3, Vec3) {
        let pos = pose.position;
        let yaw = pose.yaw;
        match mode {
            CameraMode::Fpv => {
                let eye = pos + Vec3::new(0.3 * yaw.sin(), 0.1, 0.3 * yaw.cos());
                let target = pos + Vec3::new(yaw.sin() * 10.0, -0.2, yaw.cos() * 10.0);
                (eye, target)
            }
            CameraMode::Follow => {
                let desired = pos
                    + Vec3::new(
                        -yaw.sin() * distance * 0.3,
                        distance * 0.8,
                        -yaw.cos() * distance * 0.3,
                    );
                (desired, pos)
            }
            CameraMode::Orbit => {
                let t = elapsed_secs * ORBIT_RATE;
                let eye = pos + Vec3::new(t.cos() * distance, distance * 0.4, t.sin() * distance);
                (eye, pos)
            }
            // Tiny z offset keeps the view direction off the up axis.
            CameraMode::TopDown => (pos + Vec3::new(0.0, distance * 3.0, 0.01), pos),
            CameraMode::Free => (FREE_EYE, Vec3::ZERO),
        }
    }

    /// Advance the rig for this frame. `pose` is None until the first
    /// snapshot arrives; the rig then keeps its last transform.
    pub fn update(
        &mut self,
        pose: Option<VehiclePose>,
        settings: &CameraSettings,
        elapsed_secs: f32,
    ) {
        self.fov_degrees = settings.fov_degrees;
        let pose = match pose {
            Some(p) => p,
            None => {
                if settings.mode == CameraMode::Free {
                    self.eye = FREE_EYE;
                    self.target = Vec3::ZERO;
                }
                return;
            }
        };

        let (desired_eye, target) =
            Self::mode_transform(settings.mode, pose, settings.distance(), elapsed_secs);
        self.eye = if settings.mode == CameraMode::Follow {
            self.eye.lerp(desired_eye, FOLLOW_SMOOTHING)
        } else {
            desired_eye
        };
        self.target = target;
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, rig: &CameraRig) {
        self.view_proj = rig.view_projection_matrix().to_cols_array_2d();
        let eye = rig.eye();
        self.position = [eye.x, eye.y, eye.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(pos: Vec3, yaw: f32) -> VehiclePose {
        VehiclePose { position: pos, yaw }
    }

    fn settings(mode: CameraMode, distance: f32) -> CameraSettings {
        let mut s = CameraSettings::default();
        s.mode = mode;
        s.set_distance(distance);
        s
    }

    #[test]
    fn fpv_offsets_with_heading() {
        let p = pose(Vec3::new(5.0, 2.0, 5.0), 0.0);
        let (eye, target) = CameraRig::mode_transform(CameraMode::Fpv, p, 10.0, 0.0);
        // yaw 0: forward is +Z.
        assert!((eye - Vec3::new(5.0, 2.1, 5.3)).length() < 1e-5);
        assert!((target - Vec3::new(5.0, 1.8, 15.0)).length() < 1e-5);
    }

    #[test]
    fn topdown_sits_above_at_triple_distance() {
        let p = pose(Vec3::new(1.0, 2.0, 3.0), 0.7);
        let (eye, target) = CameraRig::mode_transform(CameraMode::TopDown, p, 10.0, 0.0);
        assert!((eye.y - 32.0).abs() < 1e-5);
        assert_eq!(target, p.position);
    }

    #[test]
    fn orbit_radius_matches_distance() {
        let p = pose(Vec3::ZERO, 0.0);
        for t in [0.0f32, 3.0, 11.5] {
            let (eye, _) = CameraRig::mode_transform(CameraMode::Orbit, p, 8.0, t);
            let horizontal = Vec3::new(eye.x, 0.0, eye.z);
            assert!((horizontal.length() - 8.0).abs() < 1e-4);
            assert!((eye.y - 3.2).abs() < 1e-5);
        }
    }

    #[test]
    fn orbit_rate_uses_wall_clock() {
        let p = pose(Vec3::ZERO, 0.0);
        let (a, _) = CameraRig::mode_transform(CameraMode::Orbit, p, 8.0, 0.0);
        let (b, _) = CameraRig::mode_transform(CameraMode::Orbit, p, 8.0, 1.0);
        let expected = ORBIT_RATE;
        let actual = Vec3::new(a.x, 0.0, a.z)
            .normalize()
            .angle_between(Vec3::new(b.x, 0.0, b.z).normalize());
        assert!((actual - expected).abs() < 1e-4);
    }

    #[test]
    fn follow_chases_without_snapping() {
        let mut rig = CameraRig::new();
        let s = settings(CameraMode::Follow, 10.0);
        let p = pose(Vec3::new(100.0, 0.0, 0.0), 0.0);
        let start = rig.eye();
        rig.update(Some(p), &s, 0.0);
        let after_one = rig.eye();
        let (desired, _) = CameraRig::mode_transform(CameraMode::Follow, p, 10.0, 0.0);
        // Moved 5% of the way, not all the way.
        assert!((after_one - start.lerp(desired, FOLLOW_SMOOTHING)).length() < 1e-4);
        assert!((after_one - desired).length() > 1.0);

        // Converges over many frames.
        for _ in 0..500 {
            rig.update(Some(p), &s, 0.0);
        }
        assert!((rig.eye() - desired).length() < 0.05);
    }

    #[test]
    fn missing_pose_keeps_last_transform() {
        let mut rig = CameraRig::new();
        let s = settings(CameraMode::Orbit, 10.0);
        rig.update(Some(pose(Vec3::new(4.0, 4.0, 4.0), 0.0)), &s, 1.0);
        let eye = rig.eye();
        rig.update(None, &s, 2.0);
        assert_eq!(rig.eye(), eye);
    }
}
