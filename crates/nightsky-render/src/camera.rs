//! Perspective camera for the sky and its GPU uniform block.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use nightsky_sky::CameraPose;

/// Camera block shared by every sky program (`@group(0) @binding(0)`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// World-space right vector for billboarding; w unused.
    pub camera_right: [f32; 4],
    /// World-space up vector for billboarding; w unused.
    pub camera_up: [f32; 4],
}

/// A perspective camera looking down its local -Z.
#[derive(Debug, Clone)]
pub struct SkyCamera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl SkyCamera {
    pub fn from_pose(pose: &CameraPose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation(),
            fov_y: pose.fov_y,
            aspect_ratio: pose.aspect,
            ..Self::default()
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_right: self.right().extend(0.0).to_array(),
            camera_up: self.up().extend(0.0).to_array(),
        }
    }
}

impl Default for SkyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 60f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 300.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &SkyCamera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 96);
    }

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let forward = SkyCamera::default().forward();
        assert!(forward.distance(Vec3::NEG_Z) < 1e-6);
    }

    #[test]
    fn test_point_ahead_projects_to_centre() {
        let ndc = project(&SkyCamera::default(), Vec3::new(0.0, 0.0, -40.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_frustum_edge_maps_to_ndc_edge() {
        let camera = SkyCamera::default();
        let depth = 40.0;
        let half_h = depth * (camera.fov_y * 0.5).tan();
        let ndc = project(&camera, Vec3::new(0.0, half_h, -depth));
        assert!((ndc.y - 1.0).abs() < 1e-4);
        let ndc = project(&camera, Vec3::new(half_h * camera.aspect_ratio, 0.0, -depth));
        assert!((ndc.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pose_yaw_turns_camera() {
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 1.5),
            yaw: 0.05,
            fov_y: 1.0,
            aspect: 1.5,
        };
        let camera = SkyCamera::from_pose(&pose);
        assert_eq!(camera.position, pose.position);
        assert_eq!(camera.aspect_ratio, 1.5);
        // The group turns by +yaw, so the camera turns the other way.
        assert!(camera.forward().x > 0.0);
    }

    #[test]
    fn test_billboard_basis_orthonormal() {
        let camera = SkyCamera {
            rotation: Quat::from_rotation_y(0.3),
            ..SkyCamera::default()
        };
        let u = camera.to_uniform();
        let right = Vec4::from_array(u.camera_right).truncate();
        let up = Vec4::from_array(u.camera_up).truncate();
        assert!((right.length() - 1.0).abs() < 1e-6);
        assert!((up.length() - 1.0).abs() < 1e-6);
        assert!(right.dot(up).abs() < 1e-6);
        assert!(right.dot(camera.forward()).abs() < 1e-6);
    }
}
