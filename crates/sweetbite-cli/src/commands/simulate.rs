//! Headless simulation command
//!
//! Builds the cake scene, replays a scripted pointer gesture across the cake
//! top and advances the emitter frame by frame.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Serialize;
use sweetbite_core::{Camera, Viewport};
use sweetbite_toppings::{
    Disc, EmitterConfig, GroundPlane, ParticleState, PointerController, PointerEvent, SpawnMode,
    StateCounts, ToppingEmitter, ToppingRng, ToppingType,
};

/// Height of the table the cake sits on
const TABLE_HEIGHT: f32 = -0.01;
/// Frames between clicks when replaying a place-mode gesture
const PLACE_CLICK_INTERVAL: u32 = 10;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub topping: Option<String>,
    pub mode: Option<String>,
    pub frames: u32,
    pub dt: f32,
    pub seed: Option<u32>,
    pub width: f32,
    pub height: f32,
    pub at_cake: bool,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub topping: String,
    pub mode: String,
    pub frames: u32,
    pub dt: f32,
    pub capacity: usize,
    pub spawned: u64,
    pub evictions: u64,
    pub counts: StateCounts,
    pub stuck_total: usize,
    pub deactivated_total: usize,
    pub uploads: u32,
    pub settled_bounds: Option<Bounds>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let summary = simulate(config, &args);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_text(&summary),
        other => anyhow::bail!("Unknown format: {}", other),
    }
    Ok(())
}

/// Load the config file (or defaults) and apply command-line overrides
pub fn resolve_config(args: &SimulateArgs) -> Result<EmitterConfig> {
    let mut config = match &args.config {
        Some(path) => EmitterConfig::load(path)
            .with_context(|| format!("Failed to load config '{path}'"))?,
        None => EmitterConfig::default(),
    };
    if let Some(topping) = &args.topping {
        config.topping = ToppingType::from_name(topping);
    }
    if let Some(mode) = &args.mode {
        config.mode = mode.parse().context("Invalid --mode")?;
    }
    if args.frames == 0 || args.dt.is_nan() || args.dt <= 0.0 {
        anyhow::bail!("--frames and --dt must be positive");
    }
    Ok(config)
}

/// Run the scripted scene and collect the outcome
pub fn simulate(mut config: EmitterConfig, args: &SimulateArgs) -> Summary {
    let viewport = Viewport::new(args.width, args.height);
    let camera =
        Camera::looking_at(Vec3::new(0.0, 3.0, 6.0), Vec3::ZERO).with_aspect(viewport.aspect());

    if args.at_cake {
        if let Some(ndc) = camera.project(config.surface_center()) {
            config.spawn_depth = ndc.z;
        }
    }

    let rng = args.seed.map(ToppingRng::new).unwrap_or_default();
    let mut emitter = ToppingEmitter::with_rng(config, camera, rng);
    let cfg = emitter.config().clone();
    emitter.add_surface(Disc::new(
        "cake_top",
        cfg.surface_center(),
        cfg.surface_radius,
    ));
    emitter.add_surface(GroundPlane::new("table", TABLE_HEIGHT));

    let mut input = PointerController::for_emitter(viewport, &emitter);
    let gesture = scripted_gesture(&camera, &viewport, &cfg, args.frames);
    log::info!("replaying {} pointer events over {} frames", gesture.len(), args.frames);

    let mut next_event = 0;
    let mut stuck_total = 0;
    let mut deactivated_total = 0;
    let mut uploads = 0;
    for frame in 0..args.frames {
        while let Some((at, event)) = gesture.get(next_event) {
            if *at != frame {
                break;
            }
            input.handle(*event, &mut emitter);
            next_event += 1;
        }

        let stats = emitter.advance(args.dt);
        stuck_total += stats.stuck_this_frame;
        deactivated_total += stats.deactivated_this_frame;
        if emitter.needs_upload() {
            uploads += 1;
            emitter.mark_uploaded();
        }
    }

    Summary {
        topping: cfg.topping.name().to_string(),
        mode: cfg.mode.as_str().to_string(),
        frames: args.frames,
        dt: args.dt,
        capacity: emitter.pool().capacity(),
        spawned: emitter.pool().spawned(),
        evictions: emitter.pool().evictions(),
        counts: emitter.counts(),
        stuck_total,
        deactivated_total,
        uploads,
        settled_bounds: settled_bounds(&emitter),
    }
}

/// Pointer events (frame, event) sweeping across the cake diameter during the
/// first half of the run. Sprinkle mode drags; place mode taps.
pub fn scripted_gesture(
    camera: &Camera,
    viewport: &Viewport,
    config: &EmitterConfig,
    frames: u32,
) -> Vec<(u32, PointerEvent)> {
    let center = config.surface_center();
    let half = config.surface_radius * 0.75;
    let to_pixels = |world: Vec3| {
        camera
            .project(world)
            .map(|ndc| viewport.to_pixels(ndc.x, ndc.y))
            .unwrap_or((viewport.width * 0.5, viewport.height * 0.5))
    };
    let start = to_pixels(center - Vec3::X * half);
    let end = to_pixels(center + Vec3::X * half);
    let lerp = |t: f32| (start.0 + (end.0 - start.0) * t, start.1 + (end.1 - start.1) * t);

    let sweep = (frames / 2).max(1);
    let mut events = Vec::new();
    match config.mode {
        SpawnMode::Sprinkle => {
            events.push((0, PointerEvent::down(start.0, start.1)));
            for frame in 1..sweep {
                let (x, y) = lerp(frame as f32 / sweep as f32);
                events.push((frame, PointerEvent::moved(x, y)));
            }
            events.push((sweep, PointerEvent::up(end.0, end.1)));
        }
        SpawnMode::Place => {
            let mut frame = 0;
            while frame < sweep {
                let (x, y) = lerp(frame as f32 / sweep as f32);
                events.push((frame, PointerEvent::down(x, y)));
                events.push((frame, PointerEvent::up(x, y)));
                frame += PLACE_CLICK_INTERVAL;
            }
        }
    }
    events
}

fn settled_bounds<R: sweetbite_toppings::RandomSource>(
    emitter: &ToppingEmitter<R>,
) -> Option<Bounds> {
    let mut settled = emitter
        .particles()
        .iter()
        .filter(|p| matches!(p.state, ParticleState::Stuck | ParticleState::Placed))
        .map(|p| p.position);
    let first = settled.next()?;
    let (min, max) = settled.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some(Bounds {
        min: min.to_array(),
        max: max.to_array(),
    })
}

fn print_text(summary: &Summary) {
    println!(
        "{} / {} mode: {} frames at {:.4}s",
        summary.topping, summary.mode, summary.frames, summary.dt
    );
    println!(
        "Pool: {} slots, {} spawned, {} evicted",
        summary.capacity, summary.spawned, summary.evictions
    );
    let c = &summary.counts;
    println!(
        "Slots: {} falling, {} stuck, {} placed, {} inactive",
        c.falling, c.stuck, c.placed, c.inactive
    );
    println!(
        "Totals: {} stuck, {} fell off, {} instance uploads",
        summary.stuck_total, summary.deactivated_total, summary.uploads
    );
    match &summary.settled_bounds {
        Some(b) => println!(
            "Resting toppings span ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]
        ),
        None => println!("No toppings came to rest"),
    }
}
