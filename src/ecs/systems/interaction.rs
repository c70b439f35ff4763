use glam::Vec2;

use crate::cat;
use crate::cat::animation::{AnimationKind, AnimationState};
use crate::config::SimConfig;
use crate::ecs::components::{BehaviorState, CatState};
use crate::ecs::systems::movement;
use crate::shared::SharedState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum simulated time between two arranged meetings.
pub const SOCIAL_COOLDOWN_MS: u64 = 20_000;
/// Per-tick probability that two free cats get sent to meet.
const MEETING_CHANCE: f32 = 0.005;
/// Each cat stops this far left/right of the midpoint.
const MEETING_OFFSET: f32 = 12.0;
const MEETING_SPEED_BOOST: f32 = 1.5;
/// Partners closer than this start interacting.
pub const MEETING_REACH: f32 = 50.0;
/// Interaction length: `MIN + rand(0..SPREAD)` ticks.
const INTERACTION_TICKS_MIN: i32 = 50;
const INTERACTION_TICKS_SPREAD: i32 = 40;
const INTERACTION_CUE_MS: u32 = 4000;

/// What a pair does together once they meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    GroomTogether,
    SleepTogether,
    Chat,
}

impl Scenario {
    const ALL: [Scenario; 3] = [Scenario::GroomTogether, Scenario::SleepTogether, Scenario::Chat];

    /// Animations for (initiator, partner) and the shared cue.
    fn animations(self) -> (AnimationKind, AnimationKind, &'static str) {
        match self {
            Scenario::GroomTogether => (AnimationKind::ScratchSelf, AnimationKind::ScratchSelf, "❤️"),
            Scenario::SleepTogether => (AnimationKind::Sleeping, AnimationKind::Sleeping, "💤"),
            Scenario::Chat => (AnimationKind::Idle, AnimationKind::Alert, "🎵"),
        }
    }
}

// ---------------------------------------------------------------------------
// Meeting arbitration
// ---------------------------------------------------------------------------

/// Maybe pair up two free cats. Runs once per tick, before behavior.
pub fn try_trigger_meeting(
    world: &hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) -> Option<(hecs::Entity, hecs::Entity)> {
    if config.viewport.is_compact() || shared.mode.active {
        return None;
    }
    let cats = cat::cats_in_order(world);
    if cats.len() < 2 || !shared.cooled_down(shared.last_social_ms, SOCIAL_COOLDOWN_MS) {
        return None;
    }
    if rng.f32() >= MEETING_CHANCE {
        return None;
    }

    let free: Vec<hecs::Entity> = cats
        .into_iter()
        .filter(|&e| {
            world
                .get::<&CatState>(e)
                .map(|c| c.state.is_free())
                .unwrap_or(false)
        })
        .collect();
    if free.len() < 2 {
        return None;
    }

    let i = rng.usize(0..free.len());
    let mut j = rng.usize(0..free.len() - 1);
    if j >= i {
        j += 1;
    }
    let (a, b) = (free[i], free[j]);
    initiate_meeting(world, shared, config, a, b).then_some((a, b))
}

/// Send two cats toward each other. Both must be alive.
pub fn initiate_meeting(
    world: &hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    a: hecs::Entity,
    b: hecs::Entity,
) -> bool {
    if a == b {
        return false;
    }
    let (Some((mut cat_a, pos_a)), Some((mut cat_b, pos_b))) = (cat::load(world, a), cat::load(world, b))
    else {
        return false;
    };

    let mid = (pos_a + pos_b) * 0.5;
    let offset = Vec2::new(MEETING_OFFSET, 0.0);
    join_meeting(&mut cat_a, b, mid - offset, config);
    join_meeting(&mut cat_b, a, mid + offset, config);
    cat::store(world, a, cat_a, pos_a);
    cat::store(world, b, cat_b, pos_b);
    cat::show_thought(world, a, "🐱", 2000);
    cat::show_thought(world, b, "🐱", 2000);

    shared.release_follower(a);
    shared.release_follower(b);
    shared.last_social_ms = Some(shared.now_ms);
    log::debug!(
        "cats {} and {} are meeting",
        cat::cat_id(world, a),
        cat::cat_id(world, b)
    );
    true
}

fn join_meeting(cat: &mut CatState, partner: hecs::Entity, target: Vec2, config: &SimConfig) {
    cat.state = BehaviorState::Meeting;
    cat.partner = Some(partner);
    cat.target = target;
    cat.speed = config.base_speed * MEETING_SPEED_BOOST;
    cat.wait_timer = 0.0;
    cat.follow_timer = 0.0;
    cat.animation = None;
    cat.chase = None;
}

// ---------------------------------------------------------------------------
// Shared interaction
// ---------------------------------------------------------------------------

/// Both partners start the same interaction. `cat` is the caller's working
/// copy of `entity`; the partner is updated in place.
pub fn start_shared_interaction(
    world: &hecs::World,
    entity: hecs::Entity,
    cat: &mut CatState,
    partner: hecs::Entity,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) {
    let duration = INTERACTION_TICKS_MIN + rng.i32(0..INTERACTION_TICKS_SPREAD);
    let scenario = Scenario::ALL[rng.usize(0..Scenario::ALL.len())];
    let (mine, theirs, glyph) = scenario.animations();

    begin_interacting(cat, partner, mine, duration, config);
    if let Ok(mut other) = world.get::<&mut CatState>(partner) {
        begin_interacting(&mut other, entity, theirs, duration, config);
    }
    cat::show_thought(world, entity, glyph, INTERACTION_CUE_MS);
    cat::show_thought(world, partner, glyph, INTERACTION_CUE_MS);
    log::debug!(
        "cats {} and {} interact: {:?} for {} ticks",
        cat::cat_id(world, entity),
        cat::cat_id(world, partner),
        scenario,
        duration
    );
}

fn begin_interacting(
    cat: &mut CatState,
    partner: hecs::Entity,
    kind: AnimationKind,
    duration: i32,
    config: &SimConfig,
) {
    cat.state = BehaviorState::Interacting;
    cat.partner = Some(partner);
    cat.interaction_timer = duration;
    cat.animation = Some(AnimationState::new(kind));
    cat.speed = config.base_speed;
}

/// End an interaction for `entity` and, if the link is intact, its partner.
pub fn finish_interaction(
    world: &hecs::World,
    entity: hecs::Entity,
    cat: &mut CatState,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) {
    let partner = cat.partner;
    release(cat, config, rng);
    cat::show_thought(world, entity, "👋", 2000);

    let Some(partner) = partner else {
        return;
    };
    let mut ended = false;
    if let Ok(mut other) = world.get::<&mut CatState>(partner) {
        if other.partner == Some(entity) {
            release(&mut other, config, rng);
            ended = true;
        }
    }
    if ended {
        cat::show_thought(world, partner, "👋", 2000);
    }
}

fn release(cat: &mut CatState, config: &SimConfig, rng: &mut fastrand::Rng) {
    cat.state = BehaviorState::Roam;
    cat.partner = None;
    cat.interaction_timer = 0;
    cat.animation = None;
    cat.speed = config.base_speed;
    cat.wait_timer = 0.0;
    cat.target = config.viewport.clamp_cat(movement::random_point(config.viewport, rng));
}

// ---------------------------------------------------------------------------
// Link repair
// ---------------------------------------------------------------------------

/// Drop one-sided partner links. A paired cat that loses its partner goes
/// back to roaming. Decided on a snapshot so both sides see the same world.
pub fn repair_links(world: &mut hecs::World) {
    let broken: Vec<hecs::Entity> = world
        .query::<&CatState>()
        .iter()
        .filter(|(entity, cat)| {
            let linked = match cat.partner {
                Some(partner) => world
                    .get::<&CatState>(partner)
                    .map(|other| other.partner == Some(*entity))
                    .unwrap_or(false),
                None => false,
            };
            !linked && (cat.partner.is_some() || cat.state.is_paired())
        })
        .map(|(entity, _)| entity)
        .collect();

    for entity in broken {
        if let Ok(mut cat) = world.get::<&mut CatState>(entity) {
            log::trace!("repairing partner link ({:?})", cat.state);
            cat.partner = None;
            if cat.state.is_paired() {
                cat.state = BehaviorState::Roam;
                cat.interaction_timer = 0;
                cat.animation = None;
                cat.wait_timer = 0.0;
            }
        }
    }
}
