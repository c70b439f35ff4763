use glam::Vec2;

use crate::cat;
use crate::config::{SimConfig, Viewport};
use crate::ecs::components::{BehaviorState, Ball, CatState, Position, PrevPosition};
use crate::shared::SharedState;

/// Friction applied to ball velocity each tick.
pub const BALL_FRICTION: f32 = 0.96;
/// Ticks a ball lives before fading out.
pub const BALL_LIFE: u32 = 400;
/// Velocity kept after bouncing off a wall.
const BALL_BOUNCE: f32 = 0.8;
/// Walls sit this far inside the viewport.
const WALL_MARGIN: f32 = 10.0;
/// Below this speed on both axes the ball stops rolling.
const REST_SPEED: f32 = 0.1;
/// Max spawn speed per axis (pixels per tick).
const SPAWN_SPEED: f32 = 3.0;
/// A chasing cat this close to the ball catches it.
pub const CAPTURE_RADIUS: f32 = 25.0;

const WAIT_AFTER_WIN: f32 = 20.0;
const WAIT_AFTER_LOSS: f32 = 15.0;

/// Ball palette for light pages.
const LIGHT_PAGE_COLORS: [u32; 5] = [0xFF6B6BFF, 0x4ECDC4FF, 0x45B7D1FF, 0xF9CA24FF, 0x6C5CE7FF];
/// Ball palette for dark pages.
const DARK_PAGE_COLORS: [u32; 5] = [0xFF9FF3FF, 0x54A0FFFF, 0x5F27CDFF, 0x00D2D3FF, 0xFF9F43FF];

impl Ball {
    /// Fresh ball with a random nudge so it rolls a little.
    pub fn launch(serial: u64, dark_background: bool, rng: &mut fastrand::Rng) -> Self {
        let palette = if dark_background {
            &DARK_PAGE_COLORS
        } else {
            &LIGHT_PAGE_COLORS
        };
        Self {
            serial,
            velocity: Vec2::new(
                (rng.f32() - 0.5) * SPAWN_SPEED * 2.0,
                (rng.f32() - 0.5) * SPAWN_SPEED * 2.0,
            ),
            friction: BALL_FRICTION,
            life: BALL_LIFE,
            max_life: BALL_LIFE,
            claimed: false,
            claimed_by: None,
            color: palette[rng.usize(0..palette.len())],
        }
    }

    /// Fraction of life left, used as render opacity.
    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    /// Roll one tick: move, apply friction, bounce off the walls.
    pub fn step(&mut self, pos: &mut Vec2, viewport: Viewport) {
        *pos += self.velocity;
        self.velocity *= self.friction;

        if pos.x <= WALL_MARGIN {
            pos.x = WALL_MARGIN;
            self.velocity.x = self.velocity.x.abs() * BALL_BOUNCE;
        }
        if pos.x >= viewport.width - WALL_MARGIN {
            pos.x = viewport.width - WALL_MARGIN;
            self.velocity.x = -self.velocity.x.abs() * BALL_BOUNCE;
        }
        if pos.y <= WALL_MARGIN {
            pos.y = WALL_MARGIN;
            self.velocity.y = self.velocity.y.abs() * BALL_BOUNCE;
        }
        if pos.y >= viewport.height - WALL_MARGIN {
            pos.y = viewport.height - WALL_MARGIN;
            self.velocity.y = -self.velocity.y.abs() * BALL_BOUNCE;
        }

        if self.velocity.x.abs() < REST_SPEED && self.velocity.y.abs() < REST_SPEED {
            self.velocity = Vec2::ZERO;
        }
    }
}

/// Live balls in ascending serial order.
pub fn balls_in_order(world: &hecs::World) -> Vec<hecs::Entity> {
    let mut balls: Vec<(u64, hecs::Entity)> = world
        .query::<&Ball>()
        .iter()
        .map(|(entity, ball)| (ball.serial, entity))
        .collect();
    balls.sort_unstable_by_key(|(serial, _)| *serial);
    balls.into_iter().map(|(_, entity)| entity).collect()
}

/// Ball state and position, if the handle still points at a live ball.
pub fn lookup(world: &hecs::World, ball: hecs::Entity) -> Option<(Ball, Vec2)> {
    let state = *world.get::<&Ball>(ball).ok()?;
    let pos = world.get::<&Position>(ball).ok()?.0;
    Some((state, pos))
}

/// First ball nobody has caught yet.
pub fn first_unclaimed(world: &hecs::World) -> Option<hecs::Entity> {
    balls_in_order(world)
        .into_iter()
        .find(|&b| world.get::<&Ball>(b).map(|ball| !ball.claimed).unwrap_or(false))
}

pub fn any_live(world: &hecs::World) -> bool {
    world.query::<&Ball>().iter().next().is_some()
}

/// Put a new ball into the world.
pub fn spawn(
    world: &mut hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    pos: Vec2,
    rng: &mut fastrand::Rng,
) -> hecs::Entity {
    let serial = shared.next_ball_serial;
    shared.next_ball_serial += 1;
    let ball = Ball::launch(serial, config.dark_background, rng);
    world.spawn((Position(pos), PrevPosition(pos), ball))
}

/// Advance every ball: roll, check for a catch, then age. Runs before any cat
/// makes a decision this tick.
pub fn update(world: &mut hecs::World, config: &SimConfig) {
    for entity in balls_in_order(world) {
        let Some((mut ball, mut pos)) = lookup(world, entity) else {
            continue;
        };
        ball.step(&mut pos, config.viewport);
        write_back(world, entity, ball, pos);

        if check_capture(world, entity, config) {
            continue;
        }

        ball.life = ball.life.saturating_sub(1);
        write_back(world, entity, ball, pos);
        if ball.life == 0 {
            log::trace!("ball {} faded out", ball.serial);
            destroy(world, entity);
        }
    }
}

fn write_back(world: &hecs::World, entity: hecs::Entity, ball: Ball, pos: Vec2) {
    if let Ok(mut slot) = world.get::<&mut Ball>(entity) {
        *slot = ball;
    }
    if let Ok(mut slot) = world.get::<&mut Position>(entity) {
        slot.0 = pos;
    }
}

/// Look for a chasing cat within reach. The first cat in id order that is
/// close enough wins, not the nearest one. Losers get a consolation cue.
/// Returns true when the ball was caught (and is gone).
pub fn check_capture(world: &mut hecs::World, ball: hecs::Entity, config: &SimConfig) -> bool {
    let Some((state, ball_pos)) = lookup(world, ball) else {
        return false;
    };
    if state.claimed {
        return false;
    }

    let chasers: Vec<hecs::Entity> = cat::cats_in_order(world)
        .into_iter()
        .filter(|&e| {
            world
                .get::<&CatState>(e)
                .map(|c| c.state == BehaviorState::Chasing && c.chase == Some(ball))
                .unwrap_or(false)
        })
        .collect();

    let winner = chasers.iter().copied().find(|&e| {
        world
            .get::<&Position>(e)
            .map(|p| p.0.distance(ball_pos) < CAPTURE_RADIUS)
            .unwrap_or(false)
    });
    let Some(winner) = winner else {
        return false;
    };

    if let Ok(mut slot) = world.get::<&mut Ball>(ball) {
        slot.claimed = true;
        slot.claimed_by = Some(winner);
    }

    for &e in &chasers {
        let Some((mut cat, pos)) = cat::load(world, e) else {
            continue;
        };
        cat.speed = config.base_speed;
        cat.chase = None;
        cat.target = pos;
        if e == winner {
            cat.state = BehaviorState::Idle;
            cat.wait_timer = WAIT_AFTER_WIN;
            cat::show_thought(world, e, "🎉", 3000);
        } else {
            cat.state = BehaviorState::Roam;
            cat.wait_timer = WAIT_AFTER_LOSS;
            cat::show_thought(world, e, "😿", 2000);
        }
        cat::store(world, e, cat, pos);
    }

    log::debug!(
        "cat {} caught ball {} ({} chasers)",
        cat::cat_id(world, winner),
        state.serial,
        chasers.len()
    );
    destroy(world, ball);
    true
}

/// Remove a ball and cut every chase that still points at it.
pub fn destroy(world: &mut hecs::World, ball: hecs::Entity) {
    for (_, cat) in world.query_mut::<&mut CatState>() {
        if cat.chase == Some(ball) {
            cat.chase = None;
            cat.state = BehaviorState::Roam;
            cat.wait_timer = 0.0;
        }
    }
    let _ = world.despawn(ball);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{CatId, Thought};

    fn spawn_cat(world: &mut hecs::World, id: u32, pos: Vec2) -> hecs::Entity {
        world.spawn((
            CatId(id),
            Position(pos),
            PrevPosition(pos),
            CatState::new(pos, 10.0, 0.0),
            Thought::default(),
        ))
    }

    fn chase(world: &hecs::World, cat: hecs::Entity, ball: hecs::Entity) {
        let mut state = world.get::<&mut CatState>(cat).unwrap();
        state.state = BehaviorState::Chasing;
        state.chase = Some(ball);
        state.speed = 18.0;
    }

    fn still_ball(world: &mut hecs::World, pos: Vec2) -> hecs::Entity {
        let mut shared = SharedState::new();
        let mut rng = fastrand::Rng::with_seed(9);
        let ball = spawn(world, &mut shared, &SimConfig::default(), pos, &mut rng);
        world.get::<&mut Ball>(ball).unwrap().velocity = Vec2::ZERO;
        ball
    }

    #[test]
    fn bounces_off_walls_with_energy_loss() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut ball = Ball::launch(0, false, &mut rng);
        ball.velocity = Vec2::new(-10.0, 0.0);
        let mut pos = Vec2::new(12.0, 300.0);
        ball.step(&mut pos, Viewport::new(800.0, 600.0));

        assert_eq!(pos.x, WALL_MARGIN);
        let expected = 10.0 * BALL_FRICTION * BALL_BOUNCE;
        assert!((ball.velocity.x - expected).abs() < 1e-4);
    }

    #[test]
    fn slow_ball_comes_to_rest() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut ball = Ball::launch(0, false, &mut rng);
        ball.velocity = Vec2::new(0.05, -0.05);
        let mut pos = Vec2::new(400.0, 300.0);
        ball.step(&mut pos, Viewport::new(800.0, 600.0));
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn launch_picks_palette_by_background() {
        let mut rng = fastrand::Rng::with_seed(3);
        let light = Ball::launch(0, false, &mut rng);
        let dark = Ball::launch(1, true, &mut rng);
        assert!(LIGHT_PAGE_COLORS.contains(&light.color));
        assert!(DARK_PAGE_COLORS.contains(&dark.color));
        assert!(light.velocity.x.abs() <= SPAWN_SPEED && light.velocity.y.abs() <= SPAWN_SPEED);
    }

    #[test]
    fn unchased_ball_fades_after_its_life() {
        let mut world = hecs::World::new();
        let config = SimConfig::default();
        let ball = still_ball(&mut world, Vec2::new(300.0, 300.0));

        let mut last_life = BALL_LIFE;
        for _ in 0..BALL_LIFE - 1 {
            update(&mut world, &config);
            let life = world.get::<&Ball>(ball).unwrap().life;
            assert!(life < last_life);
            last_life = life;
        }
        assert!(world.contains(ball));
        update(&mut world, &config);
        assert!(!world.contains(ball));
    }

    #[test]
    fn first_cat_in_id_order_wins_even_if_farther() {
        let mut world = hecs::World::new();
        let config = SimConfig::default();
        let ball_pos = Vec2::new(400.0, 400.0);
        let ball = still_ball(&mut world, ball_pos);

        // Spawn the higher id first so spawn order differs from id order.
        let near = spawn_cat(&mut world, 1, ball_pos + Vec2::new(1.0, 0.0));
        let far = spawn_cat(&mut world, 0, ball_pos + Vec2::new(20.0, 0.0));
        chase(&world, near, ball);
        chase(&world, far, ball);

        update(&mut world, &config);

        assert!(!world.contains(ball));
        let winner = *world.get::<&CatState>(far).unwrap();
        let loser = *world.get::<&CatState>(near).unwrap();
        assert_eq!(winner.state, BehaviorState::Idle);
        assert_eq!(winner.wait_timer, WAIT_AFTER_WIN);
        assert_eq!(loser.state, BehaviorState::Roam);
        assert_eq!(loser.wait_timer, WAIT_AFTER_LOSS);
        assert!(winner.chase.is_none() && loser.chase.is_none());
        assert_eq!(world.get::<&Thought>(far).unwrap().0.unwrap().glyph, "🎉");
        assert_eq!(world.get::<&Thought>(near).unwrap().0.unwrap().glyph, "😿");
    }

    #[test]
    fn chaser_out_of_reach_keeps_chasing() {
        let mut world = hecs::World::new();
        let config = SimConfig::default();
        let ball = still_ball(&mut world, Vec2::new(400.0, 400.0));
        let cat = spawn_cat(&mut world, 0, Vec2::new(500.0, 400.0));
        chase(&world, cat, ball);

        update(&mut world, &config);

        assert!(world.contains(ball));
        let state = *world.get::<&CatState>(cat).unwrap();
        assert_eq!(state.state, BehaviorState::Chasing);
        assert_eq!(state.chase, Some(ball));
    }

    #[test]
    fn destroy_severs_chases() {
        let mut world = hecs::World::new();
        let ball = still_ball(&mut world, Vec2::new(400.0, 400.0));
        let cat = spawn_cat(&mut world, 0, Vec2::new(100.0, 100.0));
        chase(&world, cat, ball);

        destroy(&mut world, ball);

        let state = *world.get::<&CatState>(cat).unwrap();
        assert_eq!(state.chase, None);
        assert_eq!(state.state, BehaviorState::Roam);
        assert!(!any_live(&world));
    }
}
