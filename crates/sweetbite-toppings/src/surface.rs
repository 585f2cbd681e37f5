//! Target surfaces that falling toppings can land on
//!
//! The emitter never walks a scene graph. Hosts register the few analytic
//! shapes that matter (the cake top, the table) and the emitter queries them.

use glam::Vec3;
use sweetbite_core::Ray;

/// A ray/surface intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit surface normal at the hit
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// Something a topping can rest on
pub trait TargetSurface {
    /// Nearest intersection of `ray` with this surface, if any
    fn intersect_ray(&self, ray: &Ray) -> Option<SurfaceHit>;

    /// Intersection of a ray cast straight down from `point`
    fn intersect_downward_ray(&self, point: Vec3) -> Option<SurfaceHit> {
        self.intersect_ray(&Ray::downward(point))
    }

    /// Horizontal footprint as `(center, radius)`. `None` for unbounded surfaces.
    fn footprint(&self) -> Option<(Vec3, f32)> {
        None
    }

    fn name(&self) -> &str;
}

/// Upward-facing horizontal disc, e.g. the frosted top of a round cake.
/// Only hit from above.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub name: String,
    pub center: Vec3,
    pub radius: f32,
}

impl Disc {
    pub fn new(name: impl Into<String>, center: Vec3, radius: f32) -> Self {
        Self {
            name: name.into(),
            center,
            radius,
        }
    }
}

impl TargetSurface for Disc {
    fn intersect_ray(&self, ray: &Ray) -> Option<SurfaceHit> {
        if ray.direction.y >= 0.0 {
            return None;
        }
        let t = ray.distance_to_height(self.center.y)?;
        let point = ray.at(t);
        let dx = point.x - self.center.x;
        let dz = point.z - self.center.z;
        if dx * dx + dz * dz > self.radius * self.radius {
            return None;
        }
        Some(SurfaceHit {
            // Snap onto the plane so float drift in `at` never leaks into y
            point: Vec3::new(point.x, self.center.y, point.z),
            normal: Vec3::Y,
            distance: t,
        })
    }

    fn footprint(&self) -> Option<(Vec3, f32)> {
        Some((self.center, self.radius))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Unbounded upward-facing plane at a fixed height, e.g. the table
#[derive(Debug, Clone, PartialEq)]
pub struct GroundPlane {
    pub name: String,
    pub height: f32,
}

impl GroundPlane {
    pub fn new(name: impl Into<String>, height: f32) -> Self {
        Self {
            name: name.into(),
            height,
        }
    }
}

impl TargetSurface for GroundPlane {
    fn intersect_ray(&self, ray: &Ray) -> Option<SurfaceHit> {
        if ray.direction.y >= 0.0 {
            return None;
        }
        let t = ray.distance_to_height(self.height)?;
        let point = ray.at(t);
        Some(SurfaceHit {
            point: Vec3::new(point.x, self.height, point.z),
            normal: Vec3::Y,
            distance: t,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cake_top() -> Disc {
        Disc::new("cake_top", Vec3::new(0.0, 1.2, 0.0), 2.0)
    }

    #[test]
    fn downward_ray_hits_disc() {
        let hit = cake_top()
            .intersect_downward_ray(Vec3::new(0.5, 3.0, -0.5))
            .unwrap();
        assert!((hit.point - Vec3::new(0.5, 1.2, -0.5)).length() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.distance - 1.8).abs() < 1e-5);
    }

    #[test]
    fn outside_radius_misses() {
        assert!(cake_top()
            .intersect_downward_ray(Vec3::new(2.5, 3.0, 0.0))
            .is_none());
    }

    #[test]
    fn below_disc_misses() {
        assert!(cake_top()
            .intersect_downward_ray(Vec3::new(0.0, 1.0, 0.0))
            .is_none());
    }

    #[test]
    fn upward_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::Y);
        assert!(cake_top().intersect_ray(&ray).is_none());
    }

    #[test]
    fn oblique_ray_hits_disc() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 6.0), Vec3::new(0.0, -1.8, -6.0));
        let hit = cake_top().intersect_ray(&ray).unwrap();
        assert!((hit.point - Vec3::new(0.0, 1.2, 0.0)).length() < 1e-4);
    }

    #[test]
    fn ground_plane_is_unbounded() {
        let ground = GroundPlane::new("table", -0.01);
        let hit = ground
            .intersect_downward_ray(Vec3::new(100.0, 2.0, -40.0))
            .unwrap();
        assert!((hit.point.y + 0.01).abs() < 1e-6);
        assert_eq!(ground.name(), "table");
        assert!(ground.footprint().is_none());
    }

    #[test]
    fn disc_footprint_is_its_own_extent() {
        let disc = Disc::new("cake_top", Vec3::new(4.0, 1.2, -1.0), 1.5);
        assert_eq!(disc.footprint(), Some((Vec3::new(4.0, 1.2, -1.0), 1.5)));
    }
}
