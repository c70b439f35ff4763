pub mod balls;
pub mod behavior;
pub mod click;
pub mod collision;
pub mod interaction;
pub mod mode;
pub mod mouse;
pub mod movement;

use crate::cat::sprite::SpriteSheet;
use crate::config::SimConfig;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::{Position, PrevPosition, Thought};
use crate::shared::SharedState;

/// Run all simulation systems for one fixed tick.
pub fn tick(
    world: &mut hecs::World,
    shared: &mut SharedState,
    config: &SimConfig,
    sheet: &SpriteSheet,
    rng: &mut fastrand::Rng,
    timers: &mut SystemTimers,
) {
    // 0. Remember where everything was for render interpolation.
    for (_, (pos, prev)) in world.query_mut::<(&Position, &mut PrevPosition)>() {
        prev.0 = pos.0;
    }

    // 1. Thought bubbles fade on the simulated clock.
    timers.begin();
    fade_thoughts(world, config.tick_ms);
    timers.end(SystemPhase::Cues);

    // 2. Balls roll, get caught or expire before anyone decides anything.
    timers.begin();
    balls::update(world, config);
    timers.end(SystemPhase::Balls);

    // 3. Maybe arrange a meeting.
    timers.begin();
    interaction::try_trigger_meeting(world, shared, config, rng);
    timers.end(SystemPhase::Social);

    // 4. Per-cat state machines.
    timers.begin();
    behavior::update(world, shared, config, sheet, rng);
    timers.end(SystemPhase::Behavior);

    // 5. Push overlapping cats apart, then react to the pointer.
    timers.begin();
    collision::resolve(world, config.viewport);
    mouse::update_hover(world, shared.pointer, config);
    timers.end(SystemPhase::Collision);

    // 6. No one-sided partner links survive the tick.
    interaction::repair_links(world);
}

/// Count every cue down by one tick; expired cues disappear.
pub fn fade_thoughts(world: &mut hecs::World, tick_ms: u64) {
    for (_, thought) in world.query_mut::<&mut Thought>() {
        if let Some(cue) = thought.0.as_mut() {
            cue.remaining_ms = u64::from(cue.remaining_ms).saturating_sub(tick_ms) as u32;
            if cue.remaining_ms == 0 {
                thought.0 = None;
            }
        }
    }
}
