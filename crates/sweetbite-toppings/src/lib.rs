//! SweetBite Toppings - pooled topping simulation for the cake visualizer
//!
//! Provides a fixed-size pool of decorative toppings with:
//! - Ring-buffer slot reuse (the oldest spawn is overwritten once the pool wraps)
//! - Sprinkle mode: gravity integration and downward raycasts against the cake
//! - Place mode: click-to-place via a camera ray, no physics
//! - GPU instance packing for instanced draw calls
//! - Pointer gesture wiring and TOML-configurable constants

pub mod config;
pub mod emitter;
pub mod input;
pub mod particle;
pub mod preset;
pub mod rng;
pub mod surface;

pub use config::{EmitterConfig, SpawnMode, TieBreak};
pub use emitter::{FrameStats, StateCounts, ToppingEmitter};
pub use input::{PointerController, PointerEvent, PointerKind};
pub use particle::{ColorVariant, Particle, ParticleState, ToppingInstance, ToppingPool};
pub use preset::{ToppingPreset, ToppingShape, ToppingType};
pub use rng::{RandomSource, ToppingRng};
pub use surface::{Disc, GroundPlane, SurfaceHit, TargetSurface};
