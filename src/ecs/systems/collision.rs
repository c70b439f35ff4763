use glam::Vec2;

use crate::cat;
use crate::config::Viewport;
use crate::ecs::components::{BehaviorState, CatState, Position};

/// Upper bound on relaxation passes per tick. Passes stop early once
/// a full sweep finds no overlapping pair.
const MAX_PASSES: usize = 48;
/// Each cat of an overlapping pair moves this fraction of the overlap.
const PUSH_SHARE: f32 = 0.6;
/// Pairs are pushed this far past the minimum so float error can't leave
/// them a hair short.
const SLACK: f32 = 1.0;
/// Below this squared distance the pair is treated as coincident.
const COINCIDENT_SQ: f32 = 1e-6;
/// Golden-ratio turn, so stacked pairs split along different axes.
const GOLDEN_TURN: f32 = 0.618_034;

struct Body {
    entity: hecs::Entity,
    pos: Vec2,
    exempt: bool,
}

/// Spectators already sitting at their seat don't shove each other.
fn settled_spectator(cat: &CatState) -> bool {
    cat.state == BehaviorState::Watch && cat.settled
}

/// Push overlapping cats apart after everyone has moved this tick.
/// O(n²·passes), fine for a handful of cats.
pub fn resolve(world: &mut hecs::World, viewport: Viewport) {
    let mut bodies: Vec<Body> = cat::cats_in_order(world)
        .into_iter()
        .filter_map(|entity| {
            let (cat, pos) = cat::load(world, entity)?;
            Some(Body {
                entity,
                pos,
                exempt: settled_spectator(&cat),
            })
        })
        .collect();
    if bodies.len() < 2 {
        return;
    }

    separate(&mut bodies, viewport);

    for body in &bodies {
        if let Ok(mut pos) = world.get::<&mut Position>(body.entity) {
            pos.0 = body.pos;
        }
    }
}

fn separate(bodies: &mut [Body], viewport: Viewport) {
    let min_dist = viewport.min_cat_distance();
    for _ in 0..MAX_PASSES {
        if !relax_pass(bodies, viewport, min_dist) {
            break;
        }
    }
}

/// One sweep over every pair. Returns whether any pair overlapped.
fn relax_pass(bodies: &mut [Body], viewport: Viewport, min_dist: f32) -> bool {
    let min_dist_sq = min_dist * min_dist;
    let len = bodies.len();
    let mut overlapped = false;

    for i in 0..len {
        for j in (i + 1)..len {
            if bodies[i].exempt && bodies[j].exempt {
                continue;
            }
            let delta = bodies[i].pos - bodies[j].pos;
            let dist_sq = delta.length_squared();
            if dist_sq >= min_dist_sq {
                continue;
            }
            overlapped = true;

            let (dir, dist) = if dist_sq > COINCIDENT_SQ {
                let dist = dist_sq.sqrt();
                (delta / dist, dist)
            } else {
                // Stacked exactly: split along a per-pair axis.
                let turn = (i * 7 + j * 13) as f32 * GOLDEN_TURN;
                (Vec2::from_angle(turn * std::f32::consts::TAU), 0.0)
            };
            let push = dir * (min_dist + SLACK - dist) * PUSH_SHARE;

            // Whatever an edge stops one cat from taking, the other takes.
            let (a, b) = (bodies[i].pos, bodies[j].pos);
            let wanted_a = a + push;
            let moved_a = viewport.clamp_cat(wanted_a);
            let wanted_b = b - push - (wanted_a - moved_a);
            let moved_b = viewport.clamp_cat(wanted_b);
            bodies[i].pos = viewport.clamp_cat(moved_a - (wanted_b - moved_b));
            bodies[j].pos = moved_b;
        }
    }
    overlapped
}
