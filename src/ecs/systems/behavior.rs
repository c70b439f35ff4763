use std::f32::consts::TAU;

use glam::Vec2;

use crate::cat;
use crate::cat::animation::{AnimationKind, AnimationState, Continuation, Wall};
use crate::cat::sprite::{SpriteName, SpriteSheet};
use crate::config::SimConfig;
use crate::ecs::components::{BehaviorState, CatState, Position};
use crate::ecs::systems::{balls, interaction, mode, mouse, movement};
use crate::shared::SharedState;

/// A cat this close to its target has arrived. Independent of speed.
const ARRIVAL_DISTANCE: f32 = 16.0;
/// A spectator this close to its seat may stop short if someone is sitting there.
const WATCH_BLOCK_RANGE: f32 = 60.0;
/// Blocking neighbours are within this multiple of the minimum separation.
const WATCH_BLOCK_FACTOR: f32 = 1.2;
/// Chasers spread around the ball on a circle of this radius.
const CHASE_OFFSET_RADIUS: f32 = 15.0;
const CHASE_SPEED_BOOST: f32 = 1.8;
const ZOOMIES_SPEED_BOOST: f32 = 3.0;
/// Rest after an animation: `MIN + rand × SPREAD` ticks.
const REST_AFTER_ANIMATION_MIN: f32 = 20.0;
const REST_AFTER_ANIMATION_SPREAD: f32 = 30.0;
/// Rest after giving up on a ball.
const REST_AFTER_LOST_BALL: f32 = 10.0;
/// Rest after a zoomies sprint.
const REST_AFTER_ZOOMIES: f32 = 30.0;
/// Idle pause: `MIN + rand × SPREAD` ticks.
const IDLE_WAIT_MIN: f32 = 20.0;
const IDLE_WAIT_SPREAD: f32 = 40.0;
/// Spectators sit this many ticks before fidgeting.
const WATCH_FIDGET_AFTER: u32 = 10;
/// Per-tick chance of an idle animation while waiting.
const WAIT_ANIMATION_CHANCE: f32 = 0.05;
/// Waiting cats this close to the bottom/left edge may scratch it.
const EDGE_SCRATCH_MARGIN: f32 = 50.0;
/// Spectators within this multiple of their size from an edge may scratch it.
const WATCH_WALL_FACTOR: f32 = 1.5;
/// Chance of pausing instead of wandering off.
const IDLE_CHANCE: f32 = 0.6;
/// Chance of a personal whim (nap, zoomies, pointer).
const WHIM_CHANCE: f32 = 0.1;
const WHIM_SLEEP: f32 = 0.3;
const WHIM_ZOOMIES: f32 = 0.4;
const WHIM_FOLLOW: f32 = 0.6;

/// Everything a cat's update reads or writes besides the cat itself.
struct Ctx<'a> {
    world: &'a hecs::World,
    shared: &'a mut SharedState,
    config: &'a SimConfig,
    sheet: &'a SpriteSheet,
    rng: &'a mut fastrand::Rng,
}

/// Run every cat's state machine once, in ascending id order.
pub fn update(
    world: &mut hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    sheet: &SpriteSheet,
    rng: &mut fastrand::Rng,
) {
    mouse::prune_follower(world, shared);

    let mut ctx = Ctx {
        world,
        shared,
        config,
        sheet,
        rng,
    };
    for entity in cat::cats_in_order(ctx.world) {
        // Copy out, decide, write back. Partners are touched in place.
        let Some((mut cat, mut pos)) = cat::load(ctx.world, entity) else {
            continue;
        };
        update_cat(&mut ctx, entity, &mut cat, &mut pos);
        cat::store(ctx.world, entity, cat, pos);
    }
}

fn update_cat(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: &mut Vec2) {
    // 1. Timed states.
    match cat.state {
        BehaviorState::FollowingPointer => {
            let outcome = mouse::follow_step(ctx.world, entity, cat, *pos, ctx.shared, ctx.config);
            if outcome == mouse::FollowOutcome::Ended {
                show_resting(ctx, entity, cat);
                return;
            }
        }
        BehaviorState::Chasing => {
            if !update_chase(ctx, entity, cat, *pos) {
                show_resting(ctx, entity, cat);
                return;
            }
        }
        BehaviorState::Interacting => {
            cat.interaction_timer -= 1;
            if let Some(anim) = cat.animation.as_mut() {
                anim.frame += 1;
            }
            if cat.interaction_timer <= 0 {
                interaction::finish_interaction(ctx.world, entity, cat, ctx.config, ctx.rng);
            }
            show_resting(ctx, entity, cat);
            return;
        }
        _ => {}
    }

    // 2. Animations play in place.
    if cat.state != BehaviorState::Meeting && cat.animation.is_some() {
        advance_animation(ctx, entity, cat);
        show_resting(ctx, entity, cat);
        return;
    }

    // 3. Arrival.
    let dist = pos.distance(cat.target);
    let arrived = dist < ARRIVAL_DISTANCE;
    let blocked = cat.state == BehaviorState::Watch
        && dist < WATCH_BLOCK_RANGE
        && seat_blocked(ctx, entity, *pos);
    if arrived || blocked {
        if arrived {
            *pos = ctx.config.viewport.clamp_cat(cat.target);
        }
        on_arrival(ctx, entity, cat, *pos);
        show_resting(ctx, entity, cat);
        return;
    }

    // 4. Locomotion.
    let delta = movement::step_toward(cat, pos, dist, ctx.config.viewport);
    let walk = ctx.sheet.walk_sprite(delta);
    cat::set_sprite(ctx.world, entity, walk, (ctx.shared.tick % 2) as u32);
}

/// Retarget on the ball. Returns false when the chase is over.
fn update_chase(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: Vec2) -> bool {
    let ball = cat.chase.and_then(|b| balls::lookup(ctx.world, b));
    match ball {
        Some((ball, ball_pos)) if !ball.claimed => {
            let id = cat::cat_id(ctx.world, entity);
            let angle = id as f32 * TAU / 3.0;
            cat.target = ball_pos + Vec2::new(angle.cos(), angle.sin()) * CHASE_OFFSET_RADIUS;
            true
        }
        other => {
            let lost_to_someone = other.map_or(false, |(b, _)| b.claimed_by != Some(entity));
            if lost_to_someone {
                cat::show_thought(ctx.world, entity, "😿", 2000);
            }
            cat.state = BehaviorState::Roam;
            cat.chase = None;
            cat.speed = ctx.config.base_speed;
            cat.wait_timer = REST_AFTER_LOST_BALL;
            cat.target = pos;
            false
        }
    }
}

fn advance_animation(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState) {
    let Some(mut anim) = cat.animation else {
        return;
    };
    anim.frame += 1;
    let spec = anim.kind.spec();
    if anim.frame <= spec.frame_limit {
        cat.animation = Some(anim);
        return;
    }

    cat.animation = None;
    if cat.state == BehaviorState::Watch {
        cat.idle_time = 0;
        return;
    }
    match spec.on_finish {
        Continuation::ChainInto(next, glyph) if cat.state.is_free() => {
            cat.animation = Some(AnimationState::new(next));
            cat::show_thought(ctx.world, entity, glyph, 2000);
        }
        _ => {
            cat.state = BehaviorState::Roam;
            cat.wait_timer = REST_AFTER_ANIMATION_MIN + ctx.rng.f32() * REST_AFTER_ANIMATION_SPREAD;
        }
    }
}

/// Someone else is already sitting close to where this spectator wants to be.
fn seat_blocked(ctx: &Ctx, entity: hecs::Entity, pos: Vec2) -> bool {
    let reach = ctx.config.viewport.min_cat_distance() * WATCH_BLOCK_FACTOR;
    ctx.world
        .query::<(&Position, &CatState)>()
        .iter()
        .any(|(other, (p, _))| other != entity && p.0.distance(pos) < reach)
}

fn on_arrival(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: Vec2) {
    match cat.state {
        BehaviorState::Meeting => {
            meet_partner(ctx, entity, cat, pos);
            return;
        }
        BehaviorState::Watch => {
            if ctx.shared.mode.watch_anchor().is_some() {
                spectate(ctx, entity, cat, pos);
                return;
            }
            if ctx.shared.mode.active {
                // No anchor to gather around; hold position.
                return;
            }
            cat.state = BehaviorState::Roam;
            cat.settled = false;
            cat.speed = ctx.config.base_speed;
            cat.wait_timer = 0.0;
            cat.idle_time = 0;
        }
        BehaviorState::Zoomies => {
            cat.state = BehaviorState::Roam;
            cat.speed = ctx.config.base_speed;
            cat.wait_timer = REST_AFTER_ZOOMIES;
        }
        BehaviorState::Chasing | BehaviorState::FollowingPointer => {
            // Hold at the target; capture or reach is decided elsewhere.
            return;
        }
        _ => {}
    }

    if cat.state.is_free() {
        decide(ctx, entity, cat, pos);
    }
}

fn meet_partner(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: Vec2) {
    let partner = cat.partner.and_then(|p| {
        let (other, other_pos) = cat::load(ctx.world, p)?;
        (other.partner == Some(entity)).then_some((p, other_pos))
    });
    match partner {
        Some((p, other_pos)) => {
            if other_pos.distance(pos) < interaction::MEETING_REACH {
                interaction::start_shared_interaction(ctx.world, entity, cat, p, ctx.config, ctx.rng);
            }
        }
        None => {
            log::debug!("cat {} lost its meeting partner", cat::cat_id(ctx.world, entity));
            cat.state = BehaviorState::Roam;
            cat.partner = None;
            cat.speed = ctx.config.base_speed;
        }
    }
}

fn spectate(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: Vec2) {
    cat.settled = true;
    cat.speed = ctx.config.base_speed;
    cat.idle_time += 1;
    if cat.idle_time <= WATCH_FIDGET_AFTER || ctx.rng.u32(0..100) != 0 {
        return;
    }

    let vp = ctx.config.viewport;
    let edge = vp.cat_size() * WATCH_WALL_FACTOR;
    let mut options = vec![
        AnimationKind::ScratchSelf,
        AnimationKind::Sleeping,
        AnimationKind::Tired,
    ];
    if pos.y < edge {
        options.push(AnimationKind::ScratchWall(Wall::North));
    }
    if pos.y > vp.height - edge {
        options.push(AnimationKind::ScratchWall(Wall::South));
    }
    if pos.x < edge {
        options.push(AnimationKind::ScratchWall(Wall::West));
    }
    if pos.x > vp.width - edge {
        options.push(AnimationKind::ScratchWall(Wall::East));
    }

    let kind = options[ctx.rng.usize(0..options.len())];
    cat.animation = Some(AnimationState::new(kind));
    if let Some(glyph) = kind.spectator_glyph() {
        cat::show_thought(ctx.world, entity, glyph, 2000);
    }
}

/// A free cat has nowhere to be. The roll order matters for the odds.
fn decide(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, pos: Vec2) {
    if cat.wait_timer > 0.0 {
        cat.wait_timer -= 1.0;
        if ctx.rng.f32() < WAIT_ANIMATION_CHANCE {
            cat.animation = Some(AnimationState::new(idle_animation(ctx, pos)));
        }
        return;
    }

    if !ctx.shared.mode.active {
        if let Some(ball) = balls::first_unclaimed(ctx.world) {
            cat.state = BehaviorState::Chasing;
            cat.chase = Some(ball);
            cat.speed = ctx.config.base_speed * CHASE_SPEED_BOOST;
            cat::show_thought(ctx.world, entity, "👀", 2000);
            ctx.shared.release_follower(entity);
            return;
        }
    }

    if let Some(anchor) = ctx.shared.mode.watch_anchor() {
        mode::enter_watch(cat, anchor, ctx.config, ctx.rng);
        return;
    }

    if ctx.rng.f32() < IDLE_CHANCE {
        cat.state = BehaviorState::Idle;
        cat.wait_timer = IDLE_WAIT_MIN + ctx.rng.f32() * IDLE_WAIT_SPREAD;
        cat.animation = Some(AnimationState::new(idle_animation(ctx, pos)));
        return;
    }

    if ctx.rng.f32() < WHIM_CHANCE {
        let roll = ctx.rng.f32();
        whim(ctx, entity, cat, roll);
        return;
    }

    cat.state = BehaviorState::Roam;
    cat.speed = ctx.config.base_speed;
    cat.target = movement::roam_target(ctx.config, ctx.rng);
}

/// Fidget picked for a cat pausing at `pos`. Cats near the bottom or left
/// edge may scratch it.
fn idle_animation(ctx: &mut Ctx, pos: Vec2) -> AnimationKind {
    let vp = ctx.config.viewport;
    let mut options = vec![
        AnimationKind::ScratchSelf,
        AnimationKind::Tired,
        AnimationKind::Alert,
    ];
    if pos.y > vp.height - EDGE_SCRATCH_MARGIN {
        options.push(AnimationKind::ScratchWall(Wall::South));
    }
    if pos.x < EDGE_SCRATCH_MARGIN {
        options.push(AnimationKind::ScratchWall(Wall::West));
    }
    options[ctx.rng.usize(0..options.len())]
}

/// A personal whim. Rolls that land on nothing leave the cat as it is.
fn whim(ctx: &mut Ctx, entity: hecs::Entity, cat: &mut CatState, roll: f32) {
    if roll < WHIM_SLEEP {
        cat.animation = Some(AnimationState::new(AnimationKind::Sleeping));
        cat::show_thought(ctx.world, entity, "💤", 2000);
    } else if roll < WHIM_ZOOMIES {
        cat.state = BehaviorState::Zoomies;
        cat.speed = ctx.config.base_speed * ZOOMIES_SPEED_BOOST;
        cat.target = ctx
            .config
            .viewport
            .clamp_cat(movement::random_point(ctx.config.viewport, ctx.rng));
        cat::show_thought(ctx.world, entity, "💨", 2000);
    } else if roll < WHIM_FOLLOW && mouse::can_follow(cat, ctx.shared) {
        mouse::start_following(ctx.world, entity, cat, ctx.shared, ctx.config, ctx.rng);
    }
}

/// Sprite for a cat that is not walking this tick.
fn show_resting(ctx: &Ctx, entity: hecs::Entity, cat: &CatState) {
    match cat.animation {
        Some(anim) => cat::set_sprite(ctx.world, entity, anim.kind.sprite(), anim.frame),
        None => cat::set_sprite(ctx.world, entity, SpriteName::Idle, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{CatId, PrevPosition, Sprite, Thought};
    use crate::util::geometry::Rect;

    fn spawn_cat(world: &mut hecs::World, id: u32, pos: Vec2, target: Vec2) -> hecs::Entity {
        world.spawn((
            CatId(id),
            Position(pos),
            PrevPosition(pos),
            CatState::new(target, 10.0, 0.0),
            Sprite::default(),
            Thought::default(),
        ))
    }

    struct Fixture {
        world: hecs::World,
        shared: SharedState,
        config: SimConfig,
        sheet: SpriteSheet,
        rng: fastrand::Rng,
    }

    impl Fixture {
        fn new(seed: u64) -> Self {
            Self {
                world: hecs::World::new(),
                shared: SharedState::new(),
                config: SimConfig::default(),
                sheet: SpriteSheet::stock(),
                rng: fastrand::Rng::with_seed(seed),
            }
        }

        fn step(&mut self) {
            update(
                &mut self.world,
                &mut self.shared,
                &self.config,
                &self.sheet,
                &mut self.rng,
            );
            self.shared.tick += 1;
        }

        fn cat(&self, e: hecs::Entity) -> (CatState, Vec2) {
            cat::load(&self.world, e).unwrap()
        }

        fn edit(&self, e: hecs::Entity, f: impl FnOnce(&mut CatState)) {
            let mut cat = self.world.get::<&mut CatState>(e).unwrap();
            f(&mut *cat);
        }
    }

    #[test]
    fn walking_cat_moves_toward_target_with_walk_sprite() {
        let mut fx = Fixture::new(1);
        let e = spawn_cat(&mut fx.world, 0, Vec2::new(100.0, 400.0), Vec2::new(600.0, 400.0));

        fx.step();

        let (_, pos) = fx.cat(e);
        assert_eq!(pos, Vec2::new(110.0, 400.0));
        let sprite = *fx.world.get::<&Sprite>(e).unwrap();
        assert_eq!(sprite.name, SpriteName::Walk(crate::util::geometry::Direction::E));
    }

    #[test]
    fn waiting_cat_counts_down_in_place() {
        let mut fx = Fixture::new(2);
        let p = Vec2::new(300.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| c.wait_timer = 5.0);

        fx.step();

        let (cat, pos) = fx.cat(e);
        assert_eq!(pos, p);
        assert_eq!(cat.wait_timer, 4.0);
    }

    #[test]
    fn free_cat_goes_after_unclaimed_ball() {
        let mut fx = Fixture::new(3);
        let p = Vec2::new(300.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        let ball = balls::spawn(
            &mut fx.world,
            &mut fx.shared,
            &fx.config,
            Vec2::new(700.0, 500.0),
            &mut fx.rng,
        );

        fx.step();

        let (cat, _) = fx.cat(e);
        assert_eq!(cat.state, BehaviorState::Chasing);
        assert_eq!(cat.chase, Some(ball));
        assert_eq!(cat.speed, 18.0);
    }

    #[test]
    fn chaser_gives_up_when_ball_vanishes() {
        let mut fx = Fixture::new(4);
        let e = spawn_cat(&mut fx.world, 0, Vec2::new(300.0, 300.0), Vec2::new(700.0, 500.0));
        let ball = balls::spawn(
            &mut fx.world,
            &mut fx.shared,
            &fx.config,
            Vec2::new(700.0, 500.0),
            &mut fx.rng,
        );
        fx.edit(e, |c| {
            c.state = BehaviorState::Chasing;
            c.chase = Some(ball);
        });
        fx.world.despawn(ball).unwrap();

        fx.step();

        let (cat, _) = fx.cat(e);
        assert_eq!(cat.state, BehaviorState::Roam);
        assert_eq!(cat.chase, None);
        assert_eq!(cat.wait_timer, REST_AFTER_LOST_BALL);
    }

    #[test]
    fn chase_offsets_differ_by_id() {
        let mut fx = Fixture::new(5);
        let a = spawn_cat(&mut fx.world, 0, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let b = spawn_cat(&mut fx.world, 1, Vec2::new(1000.0, 700.0), Vec2::ZERO);
        let ball_pos = Vec2::new(600.0, 400.0);
        let ball = balls::spawn(&mut fx.world, &mut fx.shared, &fx.config, ball_pos, &mut fx.rng);
        for e in [a, b] {
            fx.edit(e, |c| {
                c.state = BehaviorState::Chasing;
                c.chase = Some(ball);
            });
        }

        fx.step();

        let (ca, _) = fx.cat(a);
        let (cb, _) = fx.cat(b);
        assert!((ca.target.distance(ball_pos) - CHASE_OFFSET_RADIUS).abs() < 1e-3);
        assert!((cb.target.distance(ball_pos) - CHASE_OFFSET_RADIUS).abs() < 1e-3);
        assert!(ca.target.distance(cb.target) > 1.0);
    }

    #[test]
    fn animation_runs_to_its_limit_then_rests() {
        let mut fx = Fixture::new(6);
        let p = Vec2::new(300.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| c.animation = Some(AnimationState::new(AnimationKind::Alert)));

        for _ in 0..15 {
            fx.step();
            assert!(fx.cat(e).0.animation.is_some());
        }
        fx.step();

        let (cat, _) = fx.cat(e);
        assert_eq!(cat.animation, None);
        assert_eq!(cat.state, BehaviorState::Roam);
        assert!(cat.wait_timer >= 20.0 && cat.wait_timer < 50.0);
    }

    #[test]
    fn tired_free_cat_grooms_afterwards() {
        let mut fx = Fixture::new(7);
        let p = Vec2::new(300.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| {
            c.animation = Some(AnimationState {
                kind: AnimationKind::Tired,
                frame: 15,
            })
        });

        fx.step();

        let (cat, _) = fx.cat(e);
        assert_eq!(cat.animation.map(|a| a.kind), Some(AnimationKind::ScratchSelf));
        assert_eq!(fx.world.get::<&Thought>(e).unwrap().0.unwrap().glyph, "😸");
    }

    #[test]
    fn meeting_pair_starts_interacting_when_close() {
        let mut fx = Fixture::new(8);
        let a = spawn_cat(&mut fx.world, 0, Vec2::new(400.0, 300.0), Vec2::ZERO);
        let b = spawn_cat(&mut fx.world, 1, Vec2::new(430.0, 300.0), Vec2::ZERO);
        interaction::initiate_meeting(&fx.world, &mut fx.shared, &fx.config, a, b);

        fx.step();

        let (ca, _) = fx.cat(a);
        let (cb, _) = fx.cat(b);
        assert_eq!(ca.state, BehaviorState::Interacting);
        assert_eq!(cb.state, BehaviorState::Interacting);
        assert_eq!(ca.partner, Some(b));
        assert_eq!(cb.partner, Some(a));
    }

    #[test]
    fn interaction_ends_for_both_partners_together() {
        let mut fx = Fixture::new(9);
        let a = spawn_cat(&mut fx.world, 0, Vec2::new(400.0, 300.0), Vec2::ZERO);
        let b = spawn_cat(&mut fx.world, 1, Vec2::new(430.0, 300.0), Vec2::ZERO);
        interaction::initiate_meeting(&fx.world, &mut fx.shared, &fx.config, a, b);
        fx.step();
        fx.edit(a, |c| c.interaction_timer = 1);

        fx.step();

        assert_eq!(fx.cat(a).0.state, BehaviorState::Roam);
        assert_eq!(fx.cat(b).0.state, BehaviorState::Roam);
        assert_eq!(fx.cat(b).0.partner, None);
    }

    #[test]
    fn spectator_settles_at_seat() {
        let mut fx = Fixture::new(10);
        let p = Vec2::new(500.0, 500.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.shared.mode.active = true;
        fx.shared.mode.anchor = Some(Rect::new(400.0, 200.0, 200.0, 200.0));
        fx.edit(e, |c| c.state = BehaviorState::Watch);

        fx.step();

        let (cat, _) = fx.cat(e);
        assert!(cat.settled);
        assert_eq!(cat.idle_time, 1);
        assert_eq!(cat.state, BehaviorState::Watch);
    }

    #[test]
    fn spectator_roams_once_session_is_over() {
        let mut fx = Fixture::new(11);
        let p = Vec2::new(500.0, 500.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| c.state = BehaviorState::Watch);

        fx.step();

        assert!(fx.cat(e).0.state.is_free() || fx.cat(e).0.state == BehaviorState::Zoomies);
    }

    #[test]
    fn zoomies_end_with_a_rest() {
        let mut fx = Fixture::new(12);
        let p = Vec2::new(500.0, 500.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| {
            c.state = BehaviorState::Zoomies;
            c.speed = 30.0;
        });

        fx.step();

        let (cat, _) = fx.cat(e);
        assert_eq!(cat.state, BehaviorState::Roam);
        assert_eq!(cat.speed, fx.config.base_speed);
        // The rest starts counting down on the same tick.
        assert_eq!(cat.wait_timer, REST_AFTER_ZOOMIES - 1.0);
    }

    #[test]
    fn follower_walks_to_pointer() {
        let mut fx = Fixture::new(13);
        let e = spawn_cat(&mut fx.world, 0, Vec2::new(100.0, 100.0), Vec2::ZERO);
        fx.shared.pointer = Some(Vec2::new(600.0, 100.0));
        fx.shared.follower = Some(e);
        fx.edit(e, |c| {
            c.state = BehaviorState::FollowingPointer;
            c.follow_timer = 100.0;
        });

        fx.step();

        let (cat, pos) = fx.cat(e);
        assert_eq!(cat.target, Vec2::new(600.0, 100.0));
        assert!(pos.x > 100.0);
        assert_eq!(fx.shared.follower, Some(e));
    }

    #[test]
    fn idle_pause_plays_a_fidget() {
        let p = Vec2::new(640.0, 400.0);
        let mut seen = Vec::new();
        for seed in 0..200 {
            let mut fx = Fixture::new(seed);
            let e = spawn_cat(&mut fx.world, 0, p, p);

            fx.step();

            let (cat, _) = fx.cat(e);
            if cat.state != BehaviorState::Idle || cat.wait_timer < IDLE_WAIT_MIN {
                continue;
            }
            let kind = cat.animation.unwrap().kind;
            assert!(
                [AnimationKind::ScratchSelf, AnimationKind::Tired, AnimationKind::Alert].contains(&kind),
                "unexpected idle animation {kind:?}"
            );
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert!(seen.len() > 1, "idle pauses always played {seen:?}");
    }

    #[test]
    fn idle_pause_by_a_wall_can_scratch_it() {
        let p = Vec2::new(40.0, 760.0);
        let scratched = (0..300).any(|seed| {
            let mut fx = Fixture::new(seed);
            let e = spawn_cat(&mut fx.world, 0, p, p);
            fx.step();
            let (cat, _) = fx.cat(e);
            cat.state == BehaviorState::Idle
                && matches!(
                    cat.animation.map(|a| a.kind),
                    Some(AnimationKind::ScratchWall(Wall::South | Wall::West))
                )
        });
        assert!(scratched);
    }

    #[test]
    fn whim_that_lands_on_nothing_changes_nothing() {
        let mut fx = Fixture::new(14);
        let p = Vec2::new(300.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        let (mut cat, _) = fx.cat(e);
        let before = cat;
        let mut ctx = Ctx {
            world: &fx.world,
            shared: &mut fx.shared,
            config: &fx.config,
            sheet: &fx.sheet,
            rng: &mut fx.rng,
        };

        // Past every whim threshold.
        whim(&mut ctx, e, &mut cat, 0.9);
        // The pointer whim with no pointer on screen.
        whim(&mut ctx, e, &mut cat, 0.5);

        assert_eq!(cat.state, before.state);
        assert_eq!(cat.target, before.target);
        assert_eq!(cat.speed, before.speed);
        assert!(cat.animation.is_none());
        assert!(ctx.shared.follower.is_none());
    }

    #[test]
    fn leaving_a_finished_watch_drops_leftover_rest() {
        let mut fx = Fixture::new(15);
        let p = Vec2::new(600.0, 300.0);
        let e = spawn_cat(&mut fx.world, 0, p, p);
        fx.edit(e, |c| {
            c.state = BehaviorState::Watch;
            c.settled = true;
            c.wait_timer = 5.0;
            c.idle_time = 15;
        });

        fx.step();

        let (cat, _) = fx.cat(e);
        assert_ne!(cat.state, BehaviorState::Watch);
        assert!(!cat.settled);
        assert_eq!(cat.idle_time, 0);
        // Either no rest at all, or a fresh idle pause; never the old countdown.
        assert!(
            cat.wait_timer == 0.0 || cat.wait_timer >= IDLE_WAIT_MIN,
            "wait {}",
            cat.wait_timer
        );
    }
}
