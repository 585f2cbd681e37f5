//! Perspective camera and viewport mapping
//!
//! Depth follows the OpenGL convention: NDC z runs from -1 at the near plane
//! to 1 at the far plane, so `unproject(x, y, 0.5)` lands between the two.

use crate::ray::Ray;
use glam::{Mat4, Vec3};

/// A perspective camera looking from `position` toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0,
            near: 0.1,
            far: 2000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse of the view-projection matrix, for unprojecting
    pub fn inverse_view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix().inverse()
    }

    /// Map an NDC point (x, y in [-1, 1], z in [-1, 1]) back into world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.inverse_view_projection_matrix().project_point3(ndc)
    }

    /// Project a world-space point to NDC.
    /// Returns None if the point is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= 0.001 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Ray from the near plane through the given NDC point.
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv_vp = self.inverse_view_projection_matrix();
        let near = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }
}

/// Screen rectangle that pointer coordinates are relative to (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Convert a pixel position to NDC, with y flipped so up is positive.
    /// A degenerate viewport maps everything to the center.
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return (0.0, 0.0);
        }
        let ndc_x = ((x - self.left) / self.width) * 2.0 - 1.0;
        let ndc_y = -((y - self.top) / self.height) * 2.0 + 1.0;
        (ndc_x, ndc_y)
    }

    /// Inverse of `to_ndc`
    pub fn to_pixels(&self, ndc_x: f32, ndc_y: f32) -> (f32, f32) {
        let x = self.left + (ndc_x + 1.0) * 0.5 * self.width;
        let y = self.top + (1.0 - ndc_y) * 0.5 * self.height;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn target_projects_to_center() {
        let cam = Camera::looking_at(Vec3::new(0.0, 3.0, 6.0), Vec3::new(0.0, 1.2, 0.0));
        let ndc = cam.project(Vec3::new(0.0, 1.2, 0.0)).unwrap();
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }

    #[test]
    fn unproject_inverts_project() {
        let cam = Camera::default();
        let world = Vec3::new(0.7, 1.2, -0.4);
        let ndc = cam.project(world).unwrap();
        let back = cam.unproject(ndc);
        assert!(approx(world, back, 1e-3));
    }

    #[test]
    fn behind_camera_is_none() {
        let cam = Camera::default();
        assert!(cam.project(Vec3::new(0.0, 6.0, 12.0)).is_none());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::default();
        let ray = cam.ray_from_ndc(0.0, 0.0);
        let to_target = (cam.target - cam.position).normalize();
        assert!(approx(ray.direction, to_target, 1e-4));
    }

    #[test]
    fn viewport_ndc_corners() {
        let vp = Viewport {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 100.0,
        };
        let (x, y) = vp.to_ndc(10.0, 20.0);
        assert!((x + 1.0).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        let (x, y) = vp.to_ndc(210.0, 120.0);
        assert!((x - 1.0).abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
        let (px, py) = vp.to_pixels(0.0, 0.0);
        assert!((px - 110.0).abs() < 1e-4);
        assert!((py - 70.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_viewport_maps_to_center() {
        let vp = Viewport::new(0.0, 0.0);
        assert_eq!(vp.to_ndc(35.0, 12.0), (0.0, 0.0));
    }
}
