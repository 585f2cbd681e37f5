//! World-space rays

use glam::Vec3;

/// A ray in 3D space with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction falls back to -Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let len = direction.length();
        let direction = if len > 1e-8 {
            direction / len
        } else {
            Vec3::NEG_Z
        };
        Self { origin, direction }
    }

    /// Ray pointing straight down from `origin`
    pub fn downward(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the horizontal plane `y = height`.
    /// None if the ray is parallel to it or the plane is behind the origin.
    pub fn distance_to_height(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_direction_falls_back() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::NEG_Z);
    }

    #[test]
    fn downward_hits_plane_below() {
        let ray = Ray::downward(Vec3::new(1.0, 3.0, 2.0));
        let t = ray.distance_to_height(1.2).unwrap();
        assert!((t - 1.8).abs() < 1e-6);
        assert!((ray.at(t).y - 1.2).abs() < 1e-6);
    }

    #[test]
    fn plane_above_is_missed() {
        let ray = Ray::downward(Vec3::new(0.0, 0.5, 0.0));
        assert!(ray.distance_to_height(1.2).is_none());
    }

    #[test]
    fn horizontal_ray_is_parallel() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray.distance_to_height(1.0).is_none());
    }
}
