use glam::Vec2;
use proptest::prelude::*;

use nekotoy::ecs::components::{Ball, BehaviorState, CatState, Position};
use nekotoy::ecs::systems::balls;
use nekotoy::{Capabilities, Rect, Sim, SimConfig};

/// Host events a session may see between ticks.
#[derive(Debug, Clone)]
enum Op {
    Tick(u32),
    PointerMove(f32, f32),
    PointerLeave,
    ModeStart(bool),
    ModeEnd,
    SpawnBall(f32, f32),
    Meet(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u32..40).prop_map(Op::Tick),
        2 => (1.0f32..1279.0, 1.0f32..799.0).prop_map(|(x, y)| Op::PointerMove(x, y)),
        1 => Just(Op::PointerLeave),
        1 => any::<bool>().prop_map(Op::ModeStart),
        1 => Just(Op::ModeEnd),
        2 => (0.0f32..1280.0, 0.0f32..800.0).prop_map(|(x, y)| Op::SpawnBall(x, y)),
        1 => (0usize..5, 0usize..5).prop_map(|(a, b)| Op::Meet(a, b)),
    ]
}

fn apply(sim: &mut Sim, op: &Op) -> u32 {
    match *op {
        Op::Tick(n) => {
            for _ in 0..n {
                sim.tick();
            }
            return n;
        }
        Op::PointerMove(x, y) => sim.pointer_moved(Vec2::new(x, y)),
        Op::PointerLeave => sim.pointer_left(),
        Op::ModeStart(with_anchor) => {
            let anchor = with_anchor.then(|| Rect::new(400.0, 200.0, 400.0, 250.0));
            sim.mode_start(anchor);
        }
        Op::ModeEnd => sim.mode_end(),
        Op::SpawnBall(x, y) => {
            sim.spawn_ball(Vec2::new(x, y));
        }
        Op::Meet(a, b) => {
            let cats = sim.cats();
            if a < cats.len() && b < cats.len() {
                sim.arrange_meeting(cats[a], cats[b]);
            }
        }
    }
    0
}

fn check_invariants(sim: &Sim) -> Result<(), TestCaseError> {
    let world = sim.world();
    let cats: Vec<(hecs::Entity, CatState)> = sim
        .cats()
        .into_iter()
        .map(|e| (e, *world.get::<&CatState>(e).unwrap()))
        .collect();

    // Chase links point at live, unclaimed balls, and only chasers hold one.
    for (_, cat) in &cats {
        prop_assert_eq!(cat.chase.is_some(), cat.state == BehaviorState::Chasing);
        if let Some(ball) = cat.chase {
            let live = world.get::<&Ball>(ball).map(|b| !b.claimed).unwrap_or(false);
            prop_assert!(live, "chase points at a dead or claimed ball");
        }
    }

    // One follower at most, and it holds the slot.
    let following: Vec<hecs::Entity> = cats
        .iter()
        .filter(|(_, c)| c.state == BehaviorState::FollowingPointer)
        .map(|(e, _)| *e)
        .collect();
    prop_assert!(following.len() <= 1);
    for e in &following {
        prop_assert_eq!(sim.shared().follower, Some(*e));
    }

    // Partner links are symmetric or absent.
    for (e, cat) in &cats {
        if let Some(partner) = cat.partner {
            let back = world.get::<&CatState>(partner).map(|p| p.partner).ok().flatten();
            prop_assert_eq!(back, Some(*e));
            prop_assert!(cat.state.is_paired());
        }
    }

    // Nobody leaves the screen.
    let vp = sim.config().viewport;
    let half = vp.cat_half();
    for (e, _) in &cats {
        let pos = world.get::<&Position>(*e).unwrap().0;
        prop_assert!(pos.x >= half - 1e-3 && pos.x <= vp.width - half + 1e-3);
        prop_assert!(pos.y >= half - 1e-3 && pos.y <= vp.height - half + 1e-3);
    }

    // Cats keep their distance, except two spectators already in their seats.
    const SEPARATION_TOLERANCE: f32 = 0.5;
    let spectating = |c: &CatState| c.state == BehaviorState::Watch && c.settled;
    for (n, (a, cat_a)) in cats.iter().enumerate() {
        for (b, cat_b) in &cats[n + 1..] {
            if spectating(cat_a) && spectating(cat_b) {
                continue;
            }
            let pa = world.get::<&Position>(*a).unwrap().0;
            let pb = world.get::<&Position>(*b).unwrap().0;
            let d = pa.distance(pb);
            prop_assert!(
                d >= vp.min_cat_distance() - SEPARATION_TOLERANCE,
                "cats {:?} and {:?} only {} apart", a, b, d
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: the cross-entity invariants hold after every tick, whatever
    /// the host throws at the simulation in between.
    #[test]
    fn prop_invariants_hold_after_ticks(
        seed in any::<u64>(),
        cat_count in 1usize..6,
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let config = SimConfig {
            seed: Some(seed),
            cat_count: Some(cat_count),
            ..Default::default()
        };
        let mut sim = Sim::new(config, Capabilities::default()).unwrap();
        for op in &ops {
            if apply(&mut sim, op) > 0 {
                check_invariants(&sim)?;
            }
        }
    }

    /// Property: an untouched ball ages by exactly one per tick and is gone
    /// once its life runs out.
    #[test]
    fn prop_ball_life_runs_down(
        seed in any::<u64>(),
        x in 50.0f32..1200.0,
        y in 50.0f32..750.0,
        ticks in 1u32..balls::BALL_LIFE,
    ) {
        let config = SimConfig { seed: Some(seed), ..Default::default() };
        let mut sim = Sim::new(config, Capabilities::default()).unwrap();
        sim.mode_start(None);
        let ball = sim.spawn_ball(Vec2::new(x, y)).unwrap();

        for _ in 0..ticks {
            sim.tick();
        }
        let (state, _) = balls::lookup(sim.world(), ball).unwrap();
        prop_assert_eq!(state.life, balls::BALL_LIFE - ticks);

        for _ in ticks..balls::BALL_LIFE {
            sim.tick();
        }
        prop_assert!(balls::lookup(sim.world(), ball).is_none());
    }
}
