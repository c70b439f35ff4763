use glam::Vec2;

use crate::config::{SimConfig, Viewport};
use crate::ecs::components::{BehaviorState, CatState};
use crate::util::geometry::clamp;

/// Gap kept between a roaming target and the reserved content band.
const ZONE_GAP: f32 = 50.0;
/// Margin used when scattering to a corner.
const CORNER_INSET: f32 = 50.0;
/// Random spread around the chosen corner.
const CORNER_SPREAD: f32 = 50.0;

/// Move a cat up to `speed` pixels toward its target and keep it on screen.
/// `dist` is the current distance to the target and must be non-zero.
/// Returns the travel vector the step was taken along.
pub fn step_toward(cat: &mut CatState, pos: &mut Vec2, dist: f32, viewport: Viewport) -> Vec2 {
    let delta = cat.target - *pos;
    *pos += delta / dist * cat.speed.min(dist);
    *pos = viewport.clamp_cat(*pos);

    if cat.state == BehaviorState::Watch {
        cat.idle_time = 0;
        cat.settled = false;
    }
    delta
}

/// Anywhere on screen.
pub fn random_point(viewport: Viewport, rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::new(rng.f32() * viewport.width, rng.f32() * viewport.height)
}

/// One of the four corners, with some spread so cats don't pile up.
pub fn corner_target(viewport: Viewport, rng: &mut fastrand::Rng) -> Vec2 {
    let corners = [
        Vec2::new(CORNER_INSET, CORNER_INSET),
        Vec2::new(viewport.width - CORNER_INSET, CORNER_INSET),
        Vec2::new(CORNER_INSET, viewport.height - CORNER_INSET),
        Vec2::new(viewport.width - CORNER_INSET, viewport.height - CORNER_INSET),
    ];
    let corner = corners[rng.usize(0..corners.len())];
    corner
        + Vec2::new(
            rng.f32() * CORNER_SPREAD * 2.0 - CORNER_SPREAD,
            rng.f32() * CORNER_SPREAD * 2.0 - CORNER_SPREAD,
        )
}

/// Ordinary wander target. On phones anywhere on screen; on wide screens to
/// the left or right of the content band so cats don't sit on the text.
pub fn roam_target(config: &SimConfig, rng: &mut fastrand::Rng) -> Vec2 {
    let vp = config.viewport;
    let size = vp.cat_size();
    let half = vp.cat_half();

    if vp.is_compact() {
        return Vec2::new(
            rng.f32() * (vp.width - size) + half,
            rng.f32() * (vp.height - size) + half,
        );
    }

    let zone = config.content_zone();
    let go_left = rng.f32() > 0.5;
    let x = if go_left {
        rng.f32() * (zone.left - ZONE_GAP)
    } else {
        zone.right + ZONE_GAP + rng.f32() * (vp.width - zone.right - ZONE_GAP - half)
    };
    Vec2::new(
        clamp(x, half, vp.width - size),
        rng.f32() * (vp.height - size),
    )
}
