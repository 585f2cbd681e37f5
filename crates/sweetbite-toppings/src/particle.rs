//! Topping slots: CPU simulation state, GPU instance data, and the ring pool

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Quat, Vec3};

/// Lifecycle of one pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleState {
    /// Holds nothing visible
    #[default]
    Inactive,
    /// Sprinkled and under gravity
    Falling,
    /// Came to rest on a target surface
    Stuck,
    /// Put down directly by a place-mode click
    Placed,
}

impl ParticleState {
    pub fn is_visible(self) -> bool {
        self != ParticleState::Inactive
    }

    /// Stuck and placed toppings never move again until their slot is reclaimed
    pub fn is_settled(self) -> bool {
        matches!(self, ParticleState::Stuck | ParticleState::Placed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParticleState::Inactive => "inactive",
            ParticleState::Falling => "falling",
            ParticleState::Stuck => "stuck",
            ParticleState::Placed => "placed",
        }
    }

    fn code(self) -> u32 {
        match self {
            ParticleState::Inactive => 0,
            ParticleState::Falling => 1,
            ParticleState::Stuck => 2,
            ParticleState::Placed => 3,
        }
    }
}

/// Cosmetic color shift between fresh and resting toppings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVariant {
    Fresh,
    Settled,
}

/// CPU-side topping state
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Only meaningful while falling; zero otherwise
    pub velocity: Vec3,
    /// Euler angles in radians (XYZ order)
    pub orientation: Vec3,
    pub scale: f32,
    pub state: ParticleState,
    /// Sequence number of the spawn that last claimed this slot
    pub spawn_id: u64,
    /// How many times this slot has been claimed
    pub generation: u32,
}

impl Particle {
    pub fn inactive() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Vec3::ZERO,
            scale: 1.0,
            state: ParticleState::Inactive,
            spawn_id: 0,
            generation: 0,
        }
    }

    pub fn color_variant(&self) -> ColorVariant {
        if self.state.is_settled() {
            ColorVariant::Settled
        } else {
            ColorVariant::Fresh
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.orientation.x,
            self.orientation.y,
            self.orientation.z,
        )
    }
}

/// GPU instance data for one visible topping.
/// 48 bytes (3 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ToppingInstance {
    /// xyz = position, w = uniform scale
    pub pos_scale: [f32; 4],
    /// Rotation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// Linear RGB
    pub color: [f32; 3],
    /// Slot index in the high 30 bits, state code in the low 2
    pub slot_state: u32,
}

impl ToppingInstance {
    pub fn from_particle(slot: usize, p: &Particle, color: [f32; 3]) -> Self {
        Self {
            pos_scale: [p.position.x, p.position.y, p.position.z, p.scale],
            rotation: p.rotation().to_array(),
            color,
            slot_state: ((slot as u32) << 2) | p.state.code(),
        }
    }

    pub fn slot(&self) -> usize {
        (self.slot_state >> 2) as usize
    }
}

/// Fixed-capacity ring of topping slots.
///
/// Slots are never allocated or freed after construction. Each claim takes the
/// slot under the write cursor and advances it, so once the pool wraps the
/// oldest spawn is overwritten regardless of its state. This bounds memory at
/// `capacity` toppings; dense sprinkling silently recycles the earliest ones.
pub struct ToppingPool {
    slots: Vec<Particle>,
    cursor: u64,
    evictions: u64,
}

impl ToppingPool {
    /// Create a pool with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![Particle::inactive(); capacity],
            cursor: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total number of claims made so far
    pub fn spawned(&self) -> u64 {
        self.cursor
    }

    /// Claims that overwrote a still-visible topping
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Slot the next claim will overwrite
    pub fn next_slot(&self) -> usize {
        (self.cursor % self.slots.len() as u64) as usize
    }

    /// Claim the slot under the cursor, returning its index and a mutable ref.
    /// The slot keeps its old contents apart from `spawn_id` and `generation`;
    /// the caller is expected to initialize every other field.
    pub fn claim(&mut self) -> (usize, &mut Particle) {
        let idx = self.next_slot();
        let spawn_id = self.cursor;
        self.cursor += 1;

        let slot = &mut self.slots[idx];
        if slot.state.is_visible() {
            self.evictions += 1;
            log::trace!(
                "evicting spawn {} ({}) from slot {idx}",
                slot.spawn_id,
                slot.state.as_str()
            );
        }
        slot.spawn_id = spawn_id;
        slot.generation = slot.generation.wrapping_add(1);
        (idx, slot)
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.slots
    }

    pub fn count(&self, state: ParticleState) -> usize {
        self.slots.iter().filter(|p| p.state == state).count()
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|p| p.state.is_visible()).count()
    }

    /// Return every slot to `Inactive` and rewind the cursor
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Particle::inactive();
        }
        self.cursor = 0;
        self.evictions = 0;
    }
}
