use glam::Vec2;
use thiserror::Error;

use crate::cat;
use crate::cat::sprite::SpriteSheet;
use crate::config::{validate_viewport, Capabilities, ConfigError, ContentZone, SimConfig, Viewport};
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::{Appearance, Ball, BehaviorState, CatState, Position};
use crate::ecs::systems::{self, click, mode};
use crate::render::RenderFrame;
use crate::shared::SharedState;
use crate::util::geometry::Rect;

#[derive(Debug, Error)]
pub enum InitError {
    /// The host prefers reduced motion; nothing was started.
    #[error("reduced motion requested, cats stay home")]
    ReducedMotion,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A running cat simulation. External events mutate it between ticks;
/// `tick` advances it by one fixed step.
pub struct Sim {
    world: hecs::World,
    shared: SharedState,
    config: SimConfig,
    sheet: SpriteSheet,
    rng: fastrand::Rng,
    timers: SystemTimers,
    frame: RenderFrame,
}

impl Sim {
    pub fn new(config: SimConfig, caps: Capabilities) -> Result<Self, InitError> {
        Self::with_sheet(config, caps, SpriteSheet::stock())
    }

    /// Like `new`, with a custom sprite sheet (e.g. one without diagonals).
    pub fn with_sheet(config: SimConfig, caps: Capabilities, sheet: SpriteSheet) -> Result<Self, InitError> {
        if caps.reduced_motion {
            return Err(InitError::ReducedMotion);
        }
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut world = hecs::World::new();
        cat::spawn_cats(&mut world, &config, &mut rng);
        log::info!(
            "spawned {} cats on a {}x{} viewport",
            config.initial_cat_count(),
            config.viewport.width,
            config.viewport.height
        );

        Ok(Self {
            world,
            shared: SharedState::new(),
            config,
            sheet,
            rng,
            timers: SystemTimers::new(),
            frame: RenderFrame::default(),
        })
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.shared.pointer = Some(pos);
    }

    pub fn pointer_left(&mut self) {
        self.shared.pointer = None;
    }

    /// A mode session begins. `anchor` is the on-screen box to gather around.
    pub fn mode_start(&mut self, anchor: Option<Rect>) {
        mode::start(&self.world, &mut self.shared, &self.config, anchor, &mut self.rng);
    }

    pub fn mode_end(&mut self) {
        mode::end(&self.world, &mut self.shared, &self.config, &mut self.rng);
    }

    /// Drop a ball. Returns `None` while another ball is still in play.
    pub fn spawn_ball(&mut self, pos: Vec2) -> Option<hecs::Entity> {
        click::spawn_ball(&mut self.world, &mut self.shared, &self.config, pos, &mut self.rng)
    }

    /// The viewport changed size. Cats are pulled back on screen; an invalid
    /// size is rejected and the old one kept. A configured content zone keeps
    /// its share of the width, and spectators' seats are pinned on screen.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        validate_viewport(viewport)?;
        let mut next = self.config.clone();
        next.viewport = viewport;
        if let Some(zone) = next.content_zone {
            let ratio = viewport.width / self.config.viewport.width;
            next.content_zone = Some(ContentZone {
                left: zone.left * ratio,
                right: (zone.right * ratio).min(viewport.width),
            });
        }
        next.validate()?;
        self.config = next;

        let scale = viewport.cat_scale();
        for (_, (look, pos)) in self
            .world
            .query_mut::<(&mut Appearance, &mut Position)>()
        {
            look.scale = scale;
            pos.0 = viewport.clamp_cat(pos.0);
        }
        let anchor = self.shared.mode.watch_anchor();
        for (_, cat) in self.world.query_mut::<&mut CatState>() {
            let target = viewport.clamp_cat(cat.target);
            if let (BehaviorState::Watch, Some(anchor), Some(_)) = (cat.state, anchor, cat.watch_seat) {
                cat.watch_seat = Some(target - Vec2::new(anchor.left, anchor.top));
                if target != cat.target {
                    cat.settled = false;
                }
            }
            cat.target = target;
        }
        log::info!("viewport resized to {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    pub fn tick(&mut self) {
        self.shared.now_ms += self.config.tick_ms;
        systems::tick(
            &mut self.world,
            &mut self.shared,
            &self.config,
            &self.sheet,
            &mut self.rng,
            &mut self.timers,
        );
        self.shared.tick += 1;
    }

    /// Draw data for the current state, blended `alpha` of the way from the
    /// previous tick.
    pub fn frame(&mut self, alpha: f32) -> &RenderFrame {
        self.timers.begin();
        self.frame.build(&self.world, &self.sheet, alpha);
        self.timers.end(SystemPhase::BuildInstances);
        &self.frame
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Mutable world access for hosts and tests that script scenarios.
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn cats(&self) -> Vec<hecs::Entity> {
        cat::cats_in_order(&self.world)
    }

    pub fn ball_count(&self) -> usize {
        self.world.query::<&Ball>().iter().count()
    }

    /// Send two cats to meet right away, skipping the random trigger.
    pub fn arrange_meeting(&mut self, a: hecs::Entity, b: hecs::Entity) -> bool {
        systems::interaction::initiate_meeting(&self.world, &mut self.shared, &self.config, a, b)
    }
}
