//! Pointer gesture wiring
//!
//! Hosts forward raw pointer events here instead of the emitter reaching into
//! any windowing or DOM layer. Press emits a burst, dragging while pressed
//! keeps sprinkling, release stops.

use crate::config::SpawnMode;
use crate::emitter::ToppingEmitter;
use crate::rng::RandomSource;
use glam::Vec2;
use sweetbite_core::Viewport;

/// Kind of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            y,
        }
    }
}

/// Tracks press state and turns pointer events into spawns
pub struct PointerController {
    viewport: Viewport,
    mode: SpawnMode,
    down_burst: u32,
    drag_burst: u32,
    pressing: bool,
    /// Last pointer position in NDC
    last_ndc: Option<Vec2>,
}

impl PointerController {
    pub fn new(viewport: Viewport, mode: SpawnMode, down_burst: u32, drag_burst: u32) -> Self {
        Self {
            viewport,
            mode,
            down_burst,
            drag_burst,
            pressing: false,
            last_ndc: None,
        }
    }

    /// Controller using the emitter's configured mode and burst sizes
    pub fn for_emitter<R: RandomSource>(viewport: Viewport, emitter: &ToppingEmitter<R>) -> Self {
        let cfg = emitter.config();
        Self::new(viewport, cfg.mode, cfg.down_burst, cfg.drag_burst)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_mode(&mut self, mode: SpawnMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> SpawnMode {
        self.mode
    }

    pub fn is_pressing(&self) -> bool {
        self.pressing
    }

    pub fn last_ndc(&self) -> Option<Vec2> {
        self.last_ndc
    }

    /// Feed one pointer event. Returns how many slots the emitter claimed.
    pub fn handle<R: RandomSource>(
        &mut self,
        event: PointerEvent,
        emitter: &mut ToppingEmitter<R>,
    ) -> usize {
        let (x, y) = self.viewport.to_ndc(event.x, event.y);
        let ndc = Vec2::new(x, y);
        self.last_ndc = Some(ndc);

        match event.kind {
            PointerKind::Down => {
                self.pressing = true;
                match self.mode {
                    SpawnMode::Sprinkle => emitter.spawn(ndc, self.down_burst, SpawnMode::Sprinkle),
                    SpawnMode::Place => emitter.spawn(ndc, 1, SpawnMode::Place),
                }
            }
            PointerKind::Move => {
                if self.pressing && self.mode == SpawnMode::Sprinkle {
                    emitter.spawn(ndc, self.drag_burst, SpawnMode::Sprinkle)
                } else {
                    0
                }
            }
            PointerKind::Up => {
                self.pressing = false;
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitterConfig;
    use crate::rng::ToppingRng;
    use crate::surface::Disc;
    use glam::Vec3;
    use sweetbite_core::Camera;

    fn setup(mode: SpawnMode) -> (PointerController, ToppingEmitter) {
        let config = EmitterConfig {
            mode,
            ..EmitterConfig::default()
        };
        let camera = Camera::looking_at(Vec3::new(0.0, 3.0, 6.0), Vec3::new(0.0, 1.2, 0.0))
            .with_aspect(800.0 / 600.0);
        let mut emitter = ToppingEmitter::with_rng(config, camera, ToppingRng::new(3));
        emitter.add_surface(Disc::new("cake_top", Vec3::new(0.0, 1.2, 0.0), 2.0));
        let controller = PointerController::for_emitter(Viewport::new(800.0, 600.0), &emitter);
        (controller, emitter)
    }

    #[test]
    fn press_drag_release() {
        let (mut input, mut emitter) = setup(SpawnMode::Sprinkle);

        assert_eq!(input.handle(PointerEvent::down(400.0, 300.0), &mut emitter), 12);
        assert!(input.is_pressing());
        assert_eq!(input.handle(PointerEvent::moved(410.0, 300.0), &mut emitter), 4);
        assert_eq!(input.handle(PointerEvent::up(410.0, 300.0), &mut emitter), 0);
        assert!(!input.is_pressing());
        assert_eq!(input.handle(PointerEvent::moved(420.0, 300.0), &mut emitter), 0);

        assert_eq!(emitter.counts().falling, 16);
    }

    #[test]
    fn move_without_press_spawns_nothing() {
        let (mut input, mut emitter) = setup(SpawnMode::Sprinkle);
        assert_eq!(input.handle(PointerEvent::moved(100.0, 100.0), &mut emitter), 0);
        assert_eq!(emitter.pool().spawned(), 0);
        let ndc = input.last_ndc().unwrap();
        assert!((ndc.x + 0.75).abs() < 1e-6);
        assert!((ndc.y - (2.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn resized_viewport_maps_new_pixels() {
        let (mut input, mut emitter) = setup(SpawnMode::Sprinkle);
        input.set_viewport(Viewport::new(400.0, 300.0));
        assert_eq!(input.viewport().width, 400.0);

        input.handle(PointerEvent::down(200.0, 150.0), &mut emitter);
        let ndc = input.last_ndc().unwrap();
        assert!(ndc.length() < 1e-6);
    }

    #[test]
    fn place_mode_ignores_drag() {
        let (mut input, mut emitter) = setup(SpawnMode::Place);
        // Viewport center looks at the cake center
        assert_eq!(input.handle(PointerEvent::down(400.0, 300.0), &mut emitter), 1);
        assert_eq!(input.handle(PointerEvent::moved(405.0, 300.0), &mut emitter), 0);
        input.handle(PointerEvent::up(405.0, 300.0), &mut emitter);
        assert_eq!(emitter.counts().placed, 1);
    }

    #[test]
    fn place_mode_click_off_cake() {
        let (mut input, mut emitter) = setup(SpawnMode::Place);
        // Top-left corner looks over the cake into empty space
        assert_eq!(input.handle(PointerEvent::down(0.0, 0.0), &mut emitter), 0);
        assert_eq!(emitter.counts().visible(), 0);
    }

    #[test]
    fn mode_can_switch_mid_session() {
        let (mut input, mut emitter) = setup(SpawnMode::Sprinkle);
        input.set_mode(SpawnMode::Place);
        assert_eq!(input.mode(), SpawnMode::Place);
        assert_eq!(input.handle(PointerEvent::down(400.0, 300.0), &mut emitter), 1);
    }
}
