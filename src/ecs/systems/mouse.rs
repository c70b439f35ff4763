use glam::Vec2;

use crate::cat;
use crate::cat::animation::{AnimationKind, AnimationState};
use crate::config::SimConfig;
use crate::ecs::components::{BehaviorState, CatState, Position};
use crate::shared::SharedState;

/// The follower is satisfied once it gets this close to the pointer.
const REACH_DISTANCE: f32 = 32.0;
/// Minimum time between two follow grants.
pub const FOLLOW_COOLDOWN_MS: u64 = 5000;
/// Follow duration range (ticks).
const FOLLOW_TICKS_MIN: f32 = 100.0;
const FOLLOW_TICKS_SPREAD: f32 = 100.0;
const FOLLOW_SPEED_BOOST: f32 = 1.2;
/// Rest after catching the pointer.
const WAIT_AFTER_REACH: f32 = 30.0;
/// Rest after giving up.
const WAIT_AFTER_GIVE_UP: f32 = 20.0;
/// A hovered cat only reacts if it is standing (nearly) still.
const HOVER_STILL_DISTANCE: f32 = 20.0;

/// What the follow step decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// Keep walking toward the pointer.
    Continue,
    /// Follow ended this tick; skip the rest of the update.
    Ended,
}

/// Whether a cat may start following the pointer right now.
pub fn can_follow(cat: &CatState, shared: &SharedState) -> bool {
    shared.follower.is_none()
        && !shared.mode.active
        && shared.cooled_down(shared.last_follow_ms, FOLLOW_COOLDOWN_MS)
        && shared.pointer_on_screen().is_some()
        && cat.state != BehaviorState::Watch
}

/// Take the follower slot. Returns false if the cat is busy or the slot is held.
pub fn start_following(
    world: &hecs::World,
    entity: hecs::Entity,
    cat: &mut CatState,
    shared: &mut SharedState,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) -> bool {
    if cat.state.is_paired() || cat.state == BehaviorState::Watch || shared.follower.is_some() {
        return false;
    }
    cat.state = BehaviorState::FollowingPointer;
    cat.follow_timer = FOLLOW_TICKS_MIN + rng.f32() * FOLLOW_TICKS_SPREAD;
    cat.speed = config.base_speed * FOLLOW_SPEED_BOOST;
    cat.wait_timer = 0.0;
    cat.animation = None;
    cat.chase = None;
    cat::show_thought(world, entity, "👀", 2000);

    shared.follower = Some(entity);
    shared.last_follow_ms = Some(shared.now_ms);
    log::debug!("cat {} starts following the pointer", cat::cat_id(world, entity));
    true
}

/// One tick of following: count down, check reach, retarget on the pointer.
pub fn follow_step(
    world: &hecs::World,
    entity: hecs::Entity,
    cat: &mut CatState,
    pos: Vec2,
    shared: &mut SharedState,
    config: &SimConfig,
) -> FollowOutcome {
    cat.follow_timer -= 1.0;

    if let Some(pointer) = shared.pointer {
        if pointer.distance(pos) < REACH_DISTANCE {
            cat::show_thought(world, entity, "😸", 2000);
            cat.state = BehaviorState::Roam;
            cat.speed = config.base_speed;
            cat.follow_timer = 0.0;
            cat.animation = Some(AnimationState::new(AnimationKind::ScratchSelf));
            cat.wait_timer = WAIT_AFTER_REACH;
            shared.release_follower(entity);
            return FollowOutcome::Ended;
        }
    }

    let pointer = match shared.pointer {
        Some(p) if cat.follow_timer > 0.0 && p.x >= 0.0 => p,
        _ => {
            cat.state = BehaviorState::Roam;
            cat.speed = config.base_speed;
            cat.wait_timer = WAIT_AFTER_GIVE_UP;
            cat::show_thought(world, entity, "🤔", 2000);
            shared.release_follower(entity);
            return FollowOutcome::Ended;
        }
    };

    cat.target = pointer;
    FollowOutcome::Continue
}

/// Drop a stale follower slot: the holder is gone or stopped following.
pub fn prune_follower(world: &hecs::World, shared: &mut SharedState) {
    let Some(follower) = shared.follower else {
        return;
    };
    let still_following = world
        .get::<&CatState>(follower)
        .map(|c| c.state == BehaviorState::FollowingPointer)
        .unwrap_or(false);
    if !still_following {
        log::trace!("releasing stale follower slot");
        shared.follower = None;
    }
}

/// Hover reaction: a heart when the pointer first lands on a relaxed cat.
pub fn update_hover(world: &mut hecs::World, pointer: Option<Vec2>, config: &SimConfig) {
    let half = config.viewport.cat_half();
    let mut greeted = Vec::new();

    for (entity, (cat, pos)) in world.query_mut::<(&mut CatState, &Position)>() {
        let over = pointer
            .map(|p| (p.x - pos.0.x).abs() <= half && (p.y - pos.0.y).abs() <= half)
            .unwrap_or(false);
        if over && !cat.hovered {
            let relaxed = cat.state.is_free()
                && cat
                    .animation
                    .map_or(true, |a| a.kind == AnimationKind::Idle)
                && cat.target.distance(pos.0) < HOVER_STILL_DISTANCE;
            if relaxed {
                greeted.push(entity);
            }
        }
        cat.hovered = over;
    }

    for entity in greeted {
        cat::show_thought(world, entity, "❤️", 1500);
    }
}
