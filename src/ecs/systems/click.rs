use glam::Vec2;

use crate::cat;
use crate::config::SimConfig;
use crate::ecs::components::{BehaviorState, CatState};
use crate::ecs::systems::balls;
use crate::shared::SharedState;

/// Chase speed is `base × (MIN + rand × SPREAD)`.
const CHASE_BOOST_MIN: f32 = 1.5;
const CHASE_BOOST_SPREAD: f32 = 0.5;

/// Whether a cat drops what it is doing to chase a fresh ball.
fn answers_ball(cat: &CatState, shared: &SharedState) -> bool {
    !shared.mode.active
        && cat.animation.is_none()
        && !cat.state.is_paired()
        && cat.state != BehaviorState::Watch
}

/// Drop a ball at `pos` and send every available cat after it.
/// Only one ball may be live at a time; returns `None` when rejected.
pub fn spawn_ball(
    world: &mut hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    pos: Vec2,
    rng: &mut fastrand::Rng,
) -> Option<hecs::Entity> {
    if balls::any_live(world) {
        log::warn!("ball spawn at {pos} rejected, a ball is still in play");
        return None;
    }
    let pos = config.viewport.clamp_cat(pos);
    let ball = balls::spawn(world, shared, config, pos, rng);

    let mut chasers = 0;
    for entity in cat::cats_in_order(world) {
        let Some((mut cat, cat_pos)) = cat::load(world, entity) else {
            continue;
        };
        if !answers_ball(&cat, shared) {
            continue;
        }
        cat.state = BehaviorState::Chasing;
        cat.chase = Some(ball);
        cat.speed = config.base_speed * (CHASE_BOOST_MIN + rng.f32() * CHASE_BOOST_SPREAD);
        cat.wait_timer = 0.0;
        cat.follow_timer = 0.0;
        cat::store(world, entity, cat, cat_pos);
        cat::show_thought(world, entity, "⚡", 2000);
        shared.release_follower(entity);
        chasers += 1;
    }

    log::info!("ball spawned at {pos}, {chasers} cats chasing");
    Some(ball)
}
