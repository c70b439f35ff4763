pub mod animation;
pub mod sprite;

use glam::Vec2;

use crate::cat::sprite::SpriteName;
use crate::config::SimConfig;
use crate::ecs::components::*;

/// Skins handed out in spawn order on desktop; phones get the second one.
const SKIN_COUNT: u8 = 3;
const PHONE_SKIN: u8 = 1;
/// Cats spawn at least this far from the edges.
const SPAWN_MARGIN: f32 = 50.0;
/// First roam target keeps this far from the edges.
const FIRST_TARGET_MARGIN: f32 = 100.0;
/// Initial waits are staggered over this many ticks.
const INITIAL_WAIT_SPREAD: f32 = 20.0;

/// Spawn the starting cats with randomized positions and staggered timers.
pub fn spawn_cats(world: &mut hecs::World, config: &SimConfig, rng: &mut fastrand::Rng) {
    let vp = config.viewport;
    let count = config.initial_cat_count();

    for i in 0..count {
        let pos = Vec2::new(
            SPAWN_MARGIN + rng.f32() * (vp.width - SPAWN_MARGIN * 2.0),
            SPAWN_MARGIN + rng.f32() * (vp.height - SPAWN_MARGIN * 2.0),
        );
        let target = Vec2::new(
            FIRST_TARGET_MARGIN + rng.f32() * (vp.width - FIRST_TARGET_MARGIN * 2.0),
            FIRST_TARGET_MARGIN + rng.f32() * (vp.height - FIRST_TARGET_MARGIN * 2.0),
        );
        let skin = if vp.is_compact() {
            PHONE_SKIN
        } else {
            i as u8 % SKIN_COUNT
        };

        world.spawn((
            CatId(i as u32),
            Position(pos),
            PrevPosition(pos),
            CatState::new(target, config.base_speed, rng.f32() * INITIAL_WAIT_SPREAD),
            Appearance {
                skin,
                scale: vp.cat_scale(),
            },
            Sprite::default(),
            Thought::default(),
        ));
    }
}

/// All cats in ascending id order. This is the order every system visits them in.
pub fn cats_in_order(world: &hecs::World) -> Vec<hecs::Entity> {
    let mut cats: Vec<(CatId, hecs::Entity)> = world
        .query::<(&CatId, &CatState)>()
        .iter()
        .map(|(entity, (id, _))| (*id, entity))
        .collect();
    cats.sort_unstable_by_key(|(id, _)| *id);
    cats.into_iter().map(|(_, entity)| entity).collect()
}

/// Copy a cat's state and position out of the world.
pub fn load(world: &hecs::World, entity: hecs::Entity) -> Option<(CatState, Vec2)> {
    let cat = *world.get::<&CatState>(entity).ok()?;
    let pos = world.get::<&Position>(entity).ok()?.0;
    Some((cat, pos))
}

/// Write a cat's state and position back.
pub fn store(world: &hecs::World, entity: hecs::Entity, cat: CatState, pos: Vec2) {
    if let Ok(mut slot) = world.get::<&mut CatState>(entity) {
        *slot = cat;
    }
    if let Ok(mut slot) = world.get::<&mut Position>(entity) {
        slot.0 = pos;
    }
}

pub fn cat_id(world: &hecs::World, entity: hecs::Entity) -> u32 {
    world.get::<&CatId>(entity).map(|id| id.0).unwrap_or(0)
}

pub fn show_thought(world: &hecs::World, entity: hecs::Entity, glyph: &'static str, duration_ms: u32) {
    if let Ok(mut thought) = world.get::<&mut Thought>(entity) {
        thought.0 = Some(Cue {
            glyph,
            remaining_ms: duration_ms,
        });
    }
}

pub fn set_sprite(world: &hecs::World, entity: hecs::Entity, name: SpriteName, frame: u32) {
    if let Ok(mut sprite) = world.get::<&mut Sprite>(entity) {
        *sprite = Sprite { name, frame };
    }
}
