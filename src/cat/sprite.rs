use std::collections::HashMap;

use glam::Vec2;

use crate::config::SPRITE_CELL;
use crate::util::geometry::Direction;

/// Named sprite sequences in the cat sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteName {
    Idle,
    Alert,
    ScratchSelf,
    ScratchWallN,
    ScratchWallS,
    ScratchWallE,
    ScratchWallW,
    Tired,
    Sleeping,
    Walk(Direction),
}

/// Cell coordinates (in sprite cells, negated as background offsets) for the
/// stock 8x4 oneko sheet.
fn stock_frames(name: SpriteName) -> &'static [[i8; 2]] {
    match name {
        SpriteName::Idle => &[[-3, -3]],
        SpriteName::Alert => &[[-7, -3]],
        SpriteName::ScratchSelf => &[[-5, 0], [-6, 0], [-7, 0]],
        SpriteName::ScratchWallN => &[[0, 0], [0, -1]],
        SpriteName::ScratchWallS => &[[-7, -1], [-6, -2]],
        SpriteName::ScratchWallE => &[[-2, -2], [-2, -3]],
        SpriteName::ScratchWallW => &[[-4, 0], [-4, -1]],
        SpriteName::Tired => &[[-3, -2]],
        SpriteName::Sleeping => &[[-2, 0], [-2, -1]],
        SpriteName::Walk(Direction::N) => &[[-1, -2], [-1, -3]],
        SpriteName::Walk(Direction::NE) => &[[0, -2], [0, -3]],
        SpriteName::Walk(Direction::E) => &[[-3, 0], [-3, -1]],
        SpriteName::Walk(Direction::SE) => &[[-5, -1], [-5, -2]],
        SpriteName::Walk(Direction::S) => &[[-6, -3], [-7, -2]],
        SpriteName::Walk(Direction::SW) => &[[-5, -3], [-6, -1]],
        SpriteName::Walk(Direction::W) => &[[-4, -2], [-4, -3]],
        SpriteName::Walk(Direction::NW) => &[[-1, 0], [-1, -1]],
    }
}

const ALL_SPRITES: [SpriteName; 17] = [
    SpriteName::Idle,
    SpriteName::Alert,
    SpriteName::ScratchSelf,
    SpriteName::ScratchWallN,
    SpriteName::ScratchWallS,
    SpriteName::ScratchWallE,
    SpriteName::ScratchWallW,
    SpriteName::Tired,
    SpriteName::Sleeping,
    SpriteName::Walk(Direction::N),
    SpriteName::Walk(Direction::NE),
    SpriteName::Walk(Direction::E),
    SpriteName::Walk(Direction::SE),
    SpriteName::Walk(Direction::S),
    SpriteName::Walk(Direction::SW),
    SpriteName::Walk(Direction::W),
    SpriteName::Walk(Direction::NW),
];

/// Lookup table from sprite name to frame cells. Skins drawn without the
/// diagonal walk cycles drop those entries; walking then falls back to the
/// dominant axis.
pub struct SpriteSheet {
    frames: HashMap<SpriteName, &'static [[i8; 2]]>,
}

impl SpriteSheet {
    pub fn stock() -> Self {
        Self {
            frames: ALL_SPRITES.iter().map(|&n| (n, stock_frames(n))).collect(),
        }
    }

    /// Stock sheet minus the four diagonal walk cycles.
    pub fn cardinal_only() -> Self {
        let mut sheet = Self::stock();
        sheet
            .frames
            .retain(|name, _| !matches!(name, SpriteName::Walk(d) if d.is_diagonal()));
        sheet
    }

    pub fn has(&self, name: SpriteName) -> bool {
        self.frames.contains_key(&name)
    }

    /// Walk cycle for a travel vector, falling back to the dominant axis when
    /// the classified heading has no sprite.
    pub fn walk_sprite(&self, delta: Vec2) -> SpriteName {
        let heading = SpriteName::Walk(Direction::classify(delta));
        if self.has(heading) {
            heading
        } else {
            SpriteName::Walk(Direction::dominant_axis(delta))
        }
    }

    /// Background offset in source pixels. Frames loop; unknown names show idle.
    pub fn offset(&self, name: SpriteName, frame: u32) -> [f32; 2] {
        let frames = self
            .frames
            .get(&name)
            .or_else(|| self.frames.get(&SpriteName::Idle))
            .copied()
            .unwrap_or(&[[0, 0]]);
        let [cx, cy] = frames[frame as usize % frames.len()];
        [cx as f32 * SPRITE_CELL, cy as f32 * SPRITE_CELL]
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::stock()
    }
}
