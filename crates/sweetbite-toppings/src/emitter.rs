//! Topping emitter: spawning, per-frame simulation and instance packing
//!
//! Two entry points share the pool. Pointer handlers call [`ToppingEmitter::spawn`],
//! the render loop calls [`ToppingEmitter::advance`] once per frame. Both run on
//! the same thread, so the pool needs no locking.

use crate::config::{EmitterConfig, SpawnMode, TieBreak};
use crate::particle::{ColorVariant, Particle, ParticleState, ToppingInstance, ToppingPool};
use crate::preset::ToppingPreset;
use crate::rng::{RandomSource, ToppingRng};
use crate::surface::{SurfaceHit, TargetSurface};
use glam::{Vec2, Vec3};
use serde::Serialize;
use std::f32::consts::PI;
use sweetbite_core::{Camera, Ray};

/// What one call to `advance` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Visible slots at the start of the frame
    pub active: usize,
    pub falling: usize,
    /// Stuck or placed after the frame
    pub settled: usize,
    pub stuck_this_frame: usize,
    pub deactivated_this_frame: usize,
}

/// Per-state slot counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub inactive: usize,
    pub falling: usize,
    pub stuck: usize,
    pub placed: usize,
}

impl StateCounts {
    pub fn visible(&self) -> usize {
        self.falling + self.stuck + self.placed
    }
}

/// Pooled topping simulation for one cake
pub struct ToppingEmitter<R: RandomSource = ToppingRng> {
    config: EmitterConfig,
    preset: ToppingPreset,
    camera: Camera,
    pool: ToppingPool,
    surfaces: Vec<Box<dyn TargetSurface>>,
    rng: R,
    /// Pre-allocated instance buffer for packing visible toppings
    instance_buffer: Vec<ToppingInstance>,
    needs_upload: bool,
}

impl ToppingEmitter<ToppingRng> {
    /// Emitter seeded from system entropy
    pub fn new(config: EmitterConfig, camera: Camera) -> Self {
        Self::with_rng(config, camera, ToppingRng::from_entropy())
    }
}

impl<R: RandomSource> ToppingEmitter<R> {
    pub fn with_rng(config: EmitterConfig, camera: Camera, rng: R) -> Self {
        let pool = ToppingPool::new(config.capacity);
        let preset = config.topping.preset();
        log::info!(
            "topping emitter: {} slots, {} in {} mode",
            pool.capacity(),
            config.topping.name(),
            config.mode.as_str()
        );
        Self {
            instance_buffer: Vec::with_capacity(pool.capacity()),
            config,
            preset,
            camera,
            pool,
            surfaces: Vec::new(),
            rng,
            needs_upload: false,
        }
    }

    /// Register a surface toppings can land on. Registration order is the
    /// candidate order for `TieBreak::FirstRegistered`.
    pub fn add_surface(&mut self, surface: impl TargetSurface + 'static) {
        log::debug!("registered target surface '{}'", surface.name());
        self.surfaces.push(Box::new(surface));
    }

    pub fn clear_surfaces(&mut self) {
        self.surfaces.clear();
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn preset(&self) -> &ToppingPreset {
        &self.preset
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, e.g. after the host orbits or resizes
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn pool(&self) -> &ToppingPool {
        &self.pool
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.slots()
    }

    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for p in self.pool.slots() {
            match p.state {
                ParticleState::Inactive => counts.inactive += 1,
                ParticleState::Falling => counts.falling += 1,
                ParticleState::Stuck => counts.stuck += 1,
                ParticleState::Placed => counts.placed += 1,
            }
        }
        counts
    }

    /// Drop every topping
    pub fn reset(&mut self) {
        self.pool.clear();
        self.instance_buffer.clear();
        self.needs_upload = true;
    }

    /// Emit toppings at an NDC screen position. Returns how many slots were claimed.
    ///
    /// Sprinkle mode claims `count` slots and never fails. Place mode claims at
    /// most one slot, and none if the click ray doesn't land on the cake.
    pub fn spawn(&mut self, ndc: Vec2, count: u32, mode: SpawnMode) -> usize {
        match mode {
            SpawnMode::Sprinkle => {
                let origin = self
                    .camera
                    .unproject(Vec3::new(ndc.x, ndc.y, self.config.spawn_depth));
                self.sprinkle_at(origin, count)
            }
            SpawnMode::Place => {
                let ray = self.camera.ray_from_ndc(ndc.x, ndc.y);
                usize::from(self.place_along(&ray).is_some())
            }
        }
    }

    /// Sprinkle `count` falling toppings around a world-space origin
    pub fn sprinkle_at(&mut self, origin: Vec3, count: u32) -> usize {
        let cfg = &self.config;
        for _ in 0..count {
            let (_, p) = self.pool.claim();
            let jx = self.rng.range(cfg.spawn_jitter_xz[0], cfg.spawn_jitter_xz[1]);
            let jy = self.rng.range(cfg.spawn_jitter_y[0], cfg.spawn_jitter_y[1]);
            let jz = self.rng.range(cfg.spawn_jitter_xz[0], cfg.spawn_jitter_xz[1]);
            p.position = origin + Vec3::new(jx, jy, jz);

            let vx = self.rng.range(cfg.spawn_velocity_xz[0], cfg.spawn_velocity_xz[1]);
            let vy = self.rng.range(cfg.spawn_velocity_y[0], cfg.spawn_velocity_y[1]);
            let vz = self.rng.range(cfg.spawn_velocity_xz[0], cfg.spawn_velocity_xz[1]);
            p.velocity = Vec3::new(vx, vy, vz);

            p.orientation = random_orientation(&mut self.rng);
            p.scale = self.rng.range(cfg.sprinkle_scale[0], cfg.sprinkle_scale[1]);
            p.state = ParticleState::Falling;
        }
        count as usize
    }

    /// Place one topping where `ray` meets the cake. Returns the claimed slot.
    ///
    /// Only the nearest surface hit is considered; if it isn't on the cake
    /// top, nothing is placed even when a farther surface would qualify.
    /// The hit must lie inside the footprint of the surface it struck.
    /// Unbounded surfaces fall back to the configured cake footprint.
    pub fn place_along(&mut self, ray: &Ray) -> Option<usize> {
        let (surface, hit) = self
            .surfaces
            .iter()
            .filter_map(|s| s.intersect_ray(ray).map(|hit| (s, hit)))
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))?;

        let cfg = &self.config;
        let (center, radius) = surface
            .footprint()
            .unwrap_or((cfg.surface_center(), cfg.surface_radius));
        let on_height = (hit.point.y - cfg.surface_height).abs() < cfg.place_tolerance;
        let offset = hit.point - center;
        let on_cake = Vec2::new(offset.x, offset.z).length() < radius;
        if !on_height || !on_cake {
            log::trace!("place ignored: hit at {:?} is off the cake", hit.point);
            return None;
        }

        let (idx, p) = self.pool.claim();
        p.position = hit.point + hit.normal * cfg.surface_normal_offset;
        p.velocity = Vec3::ZERO;
        p.orientation = random_orientation(&mut self.rng);
        p.scale = self.rng.range(cfg.place_scale[0], cfg.place_scale[1]);
        p.state = ParticleState::Placed;
        Some(idx)
    }

    /// Advance the simulation by `dt` seconds. Call once per rendered frame.
    pub fn advance(&mut self, dt: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        let cfg = &self.config;

        for p in self.pool.slots_mut() {
            match p.state {
                ParticleState::Inactive => continue,
                ParticleState::Stuck | ParticleState::Placed => {
                    stats.active += 1;
                    stats.settled += 1;
                    continue;
                }
                ParticleState::Falling => stats.active += 1,
            }

            p.velocity.y -= cfg.gravity_scale * dt;
            p.position += p.velocity * dt;
            p.orientation.x += p.velocity.y * cfg.spin_pitch * dt;
            p.orientation.y += cfg.spin_yaw * dt;

            if p.position.y < cfg.deactivation_height {
                p.state = ParticleState::Inactive;
                p.velocity = Vec3::ZERO;
                stats.deactivated_this_frame += 1;
                continue;
            }

            match find_landing(&self.surfaces, cfg, p.position) {
                Some(hit) => {
                    p.position = hit.point + hit.normal * cfg.surface_normal_offset;
                    p.velocity = Vec3::ZERO;
                    p.orientation = random_orientation(&mut self.rng);
                    p.state = ParticleState::Stuck;
                    stats.stuck_this_frame += 1;
                    stats.settled += 1;
                }
                None => stats.falling += 1,
            }
        }

        if stats.active > 0 {
            self.pack_instances();
        }
        stats
    }

    /// Pack every visible slot into the contiguous instance buffer
    pub fn pack_instances(&mut self) {
        self.instance_buffer.clear();
        for (slot, p) in self.pool.slots().iter().enumerate() {
            if !p.state.is_visible() {
                continue;
            }
            let color = match p.color_variant() {
                ColorVariant::Fresh => self.preset.fresh_color,
                ColorVariant::Settled => self.preset.settled_color,
            };
            self.instance_buffer
                .push(ToppingInstance::from_particle(slot, p, color));
        }
        self.needs_upload = true;
    }

    /// Instances packed by the last `advance` or `pack_instances`
    pub fn instances(&self) -> &[ToppingInstance] {
        &self.instance_buffer
    }

    /// True when the instance buffer changed since the last `mark_uploaded`
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }
}

/// Cast straight down from `position` and pick the surface hit to stick to.
///
/// A hit qualifies when it lies within `stick_tolerance` of the surface height
/// and within `capture_radius` of the topping. For a vertical ray the horizontal
/// offset is zero, so the capture test bounds the drop distance.
fn find_landing(
    surfaces: &[Box<dyn TargetSurface>],
    cfg: &EmitterConfig,
    position: Vec3,
) -> Option<SurfaceHit> {
    let mut accepted = surfaces
        .iter()
        .filter_map(|s| s.intersect_downward_ray(position))
        .filter(|hit| {
            (hit.point.y - cfg.surface_height).abs() < cfg.stick_tolerance
                && hit.point.distance(position) < cfg.capture_radius
        });

    match cfg.tie_break {
        TieBreak::Nearest => accepted.min_by(|a, b| a.distance.total_cmp(&b.distance)),
        TieBreak::FirstRegistered => accepted.next(),
    }
}

fn random_orientation(rng: &mut impl RandomSource) -> Vec3 {
    Vec3::new(rng.range(0.0, PI), rng.range(0.0, PI), rng.range(0.0, PI))
}
