use std::collections::BTreeMap;
use std::error::Error;
use std::time::Duration;

use glam::Vec2;
use instant::Instant;

use crate::click::ClickState;
use crate::config::{Capabilities, SimConfig};
use crate::debug::TickStats;
use crate::ecs::components::CatState;
use crate::sim::{InitError, Sim};
use crate::util::geometry::Rect;

/// Simulated display refresh (seconds per frame).
const FRAME_DT: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log a behavior census (simulated seconds).
const CENSUS_INTERVAL: f64 = 10.0;

/// What the runner should do.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: SimConfig,
    pub caps: Capabilities,
    /// Simulated seconds to run for.
    pub seconds: f64,
    /// Sleep between frames so the run takes as long as it simulates.
    pub realtime: bool,
}

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

/// Host events scheduled by the tour.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TourEvent {
    ModeStart(Rect),
    ModeEnd,
}

/// A fixed input script: the pointer circles the screen, double-clicks a
/// ball into play, a mode session runs, then the pointer leaves.
struct Tour {
    events: Vec<(f64, TourEvent)>,
    next_event: usize,
}

/// Button presses that make up the double click (start, end) in seconds.
const CLICK_PRESSES: [(f64, f64); 2] = [(3.0, 3.05), (3.15, 3.2)];
/// The pointer leaves the window after this long.
const POINTER_LEAVES_AT: f64 = 40.0;

impl Tour {
    fn new(viewport_size: Vec2) -> Self {
        let anchor = Rect::new(
            viewport_size.x * 0.35,
            viewport_size.y * 0.3,
            viewport_size.x * 0.3,
            viewport_size.y * 0.25,
        );
        Self {
            events: vec![(15.0, TourEvent::ModeStart(anchor)), (30.0, TourEvent::ModeEnd)],
            next_event: 0,
        }
    }

    fn pointer_at(&self, t: f64, viewport_size: Vec2) -> Option<Vec2> {
        if t >= POINTER_LEAVES_AT {
            return None;
        }
        let center = viewport_size * 0.5;
        let radius = viewport_size.min_element() * 0.3;
        let angle = (t * 0.4) as f32;
        Some(center + Vec2::new(angle.cos(), angle.sin()) * radius)
    }

    fn button_down(&self, t: f64) -> bool {
        CLICK_PRESSES.iter().any(|&(down, up)| t >= down && t < up)
    }

    /// Events whose time has come.
    fn due(&mut self, t: f64) -> Vec<TourEvent> {
        let mut due = Vec::new();
        while let Some(&(at, event)) = self.events.get(self.next_event) {
            if at > t {
                break;
            }
            due.push(event);
            self.next_event += 1;
        }
        due
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Drive a simulation headless with a fixed-timestep loop.
pub fn run(opts: RunOptions) -> Result<(), Box<dyn Error>> {
    let mut sim = match Sim::new(opts.config.clone(), opts.caps) {
        Ok(sim) => sim,
        Err(InitError::ReducedMotion) => {
            log::info!("reduced motion preferred, not starting");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let tick_secs = opts.config.tick_ms as f64 / 1000.0;
    let size = Vec2::new(opts.config.viewport.width, opts.config.viewport.height);
    let mut tour = Tour::new(size);
    let mut click = ClickState::new();
    let mut stats = TickStats::new();

    let mut elapsed = 0.0;
    let mut accumulator = 0.0;
    let mut next_census = CENSUS_INTERVAL;
    let mut frames: u64 = 0;

    while elapsed < opts.seconds {
        let frame_start = Instant::now();
        elapsed += FRAME_DT;
        frames += 1;

        // Input.
        match tour.pointer_at(elapsed, size) {
            Some(p) => sim.pointer_moved(p),
            None => sim.pointer_left(),
        }
        click.update(tour.button_down(elapsed), FRAME_DT);
        if click.double_clicked {
            if let Some(p) = sim.shared().pointer {
                sim.spawn_ball(p);
            }
        }
        for event in tour.due(elapsed) {
            match event {
                TourEvent::ModeStart(anchor) => sim.mode_start(Some(anchor)),
                TourEvent::ModeEnd => sim.mode_end(),
            }
        }

        // Fixed-step simulation.
        accumulator = (accumulator + FRAME_DT).min(MAX_ACCUMULATOR);
        while accumulator >= tick_secs {
            let tick_start = Instant::now();
            sim.tick();
            stats.record_tick(tick_start.elapsed().as_secs_f64());
            accumulator -= tick_secs;
        }

        let alpha = (accumulator / tick_secs) as f32;
        let frame = sim.frame(alpha);
        log::trace!(
            "frame {frames}: {} cats, {} balls, {} cues",
            frame.cats.len(),
            frame.balls.len(),
            frame.thoughts.len()
        );

        stats.maybe_log(FRAME_DT, sim.timers(), sim.cats().len(), sim.ball_count());

        if elapsed >= next_census {
            log_census(&sim);
            next_census += CENSUS_INTERVAL;
        }

        if opts.realtime {
            let spent = frame_start.elapsed().as_secs_f64();
            if spent < FRAME_DT {
                std::thread::sleep(Duration::from_secs_f64(FRAME_DT - spent));
            }
        }
    }

    log::info!(
        "done: {:.1}s simulated, {} frames, {} ticks",
        elapsed,
        frames,
        sim.shared().tick
    );
    log_census(&sim);
    Ok(())
}

/// How many cats are in each behavior state.
fn census(sim: &Sim) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (_, cat) in sim.world().query::<&CatState>().iter() {
        *counts.entry(format!("{:?}", cat.state)).or_insert(0) += 1;
    }
    counts
}

fn log_census(sim: &Sim) {
    let summary = census(sim)
        .iter()
        .map(|(state, n)| format!("{state}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    log::info!(
        "t={:.1}s | {} | follower: {} | mode: {}",
        sim.shared().now_ms as f64 / 1000.0,
        summary,
        sim.shared().follower.is_some(),
        sim.shared().mode.active
    );
}
