use glam::Vec2;

use crate::cat;
use crate::config::SimConfig;
use crate::ecs::components::{BehaviorState, CatState};
use crate::ecs::systems::movement;
use crate::shared::SharedState;
use crate::util::geometry::Rect;

/// Chance a spectator sits below the anchor; right side takes the next slice.
const SEAT_BELOW_CHANCE: f32 = 0.6;
const SEAT_RIGHT_CHANCE: f32 = 0.8;
/// Distance between the anchor edge and a seat.
const SEAT_GAP: f32 = 20.0;
/// Left seats sit this far left of the anchor (cat width plus gap).
const SEAT_LEFT_OFFSET: f32 = 52.0;
/// Random nudge applied to a fresh seat so spectators don't line up.
const SEAT_JITTER: f32 = 10.0;
const GATHER_SPEED_BOOST: f32 = 1.5;
const WATCH_SPEED_BOOST: f32 = 1.2;

/// Seat relative to the anchor's top-left corner.
fn pick_seat(anchor: Rect, rng: &mut fastrand::Rng) -> Vec2 {
    let roll = rng.f32();
    let seat = if roll < SEAT_BELOW_CHANCE {
        Vec2::new(rng.f32() * anchor.width, anchor.height + SEAT_GAP)
    } else if roll < SEAT_RIGHT_CHANCE {
        Vec2::new(anchor.width + SEAT_GAP, rng.f32() * anchor.height)
    } else {
        Vec2::new(-SEAT_LEFT_OFFSET, rng.f32() * anchor.height)
    };
    seat + Vec2::new(
        (rng.f32() - 0.5) * SEAT_JITTER * 2.0,
        (rng.f32() - 0.5) * SEAT_JITTER * 2.0,
    )
}

/// Walk to this cat's seat around the anchor. The seat is picked once per
/// session so a cat coming back keeps its place.
pub fn enter_watch(cat: &mut CatState, anchor: Rect, config: &SimConfig, rng: &mut fastrand::Rng) {
    let seat = match cat.watch_seat {
        Some(seat) => seat,
        None => {
            let seat = pick_seat(anchor, rng);
            cat.watch_seat = Some(seat);
            seat
        }
    };
    cat.state = BehaviorState::Watch;
    cat.target = config
        .viewport
        .clamp_cat(Vec2::new(anchor.left, anchor.top) + seat);
    cat.speed = config.base_speed * WATCH_SPEED_BOOST;
    cat.idle_time = 0;
    cat.settled = false;
}

/// A mode session begins: everyone not busy with a partner gathers around.
/// Repeated starts while a session runs are ignored.
pub fn start(
    world: &hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    anchor: Option<Rect>,
    rng: &mut fastrand::Rng,
) {
    if shared.mode.active {
        log::warn!("mode start ignored, a session is already running");
        return;
    }
    shared.mode.active = true;
    shared.mode.anchor = anchor;
    shared.follower = None;
    log::info!("mode session started (anchor: {:?})", anchor);

    for entity in cat::cats_in_order(world) {
        let Some((mut cat, pos)) = cat::load(world, entity) else {
            continue;
        };
        if cat.state.is_paired() {
            continue;
        }
        cat.state = BehaviorState::Watch;
        cat.animation = None;
        cat.chase = None;
        cat.follow_timer = 0.0;
        cat.wait_timer = 0.0;
        cat.speed = config.base_speed * GATHER_SPEED_BOOST;
        match anchor {
            Some(anchor) => enter_watch(&mut cat, anchor, config, rng),
            // Nothing to gather around: sit tight.
            None => cat.target = pos,
        }
        cat::store(world, entity, cat, pos);
        cat::show_thought(world, entity, "🎮", 2000);
    }
}

/// The session ended: seats are forgotten and spectators scatter to the
/// corners. Ignored when no session is running.
pub fn end(
    world: &hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) {
    if !shared.mode.active {
        log::warn!("mode end ignored, no session is running");
        return;
    }
    shared.mode.active = false;
    shared.mode.anchor = None;
    log::info!("mode session ended");

    for entity in cat::cats_in_order(world) {
        let Some((mut cat, pos)) = cat::load(world, entity) else {
            continue;
        };
        cat.watch_seat = None;
        cat.idle_time = 0;
        cat.settled = false;
        if !cat.state.is_paired() {
            cat.state = BehaviorState::Roam;
            cat.animation = None;
            cat.chase = None;
            cat.wait_timer = 0.0;
            cat.speed = config.base_speed;
            cat.target = config
                .viewport
                .clamp_cat(movement::corner_target(config.viewport, rng));
            cat::show_thought(world, entity, "💨", 2000);
        }
        cat::store(world, entity, cat, pos);
    }
}
