use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::cat::sprite::SpriteSheet;
use crate::ecs::components::{Appearance, Ball, Cue, Position, PrevPosition, Sprite};

/// Balls are drawn as 10px discs.
pub const BALL_RADIUS: f32 = 5.0;

/// Per-cat draw data handed to the host each frame.
/// Stride = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CatInstance {
    /// Sprite center in viewport pixels (x, y).
    pub position: [f32; 2],
    /// Top-left of the current frame inside the sprite sheet, in pixels.
    pub sprite_offset: [f32; 2],
    /// Size multiplier (1.0 = 32px).
    pub scale: f32,
    /// Index of the sheet to sample.
    pub skin: u32,
}

impl CatInstance {
    /// Build from ECS components, interpolating between the last two ticks.
    pub fn from_components(
        pos: &Position,
        prev_pos: &PrevPosition,
        appearance: &Appearance,
        sprite: &Sprite,
        sheet: &SpriteSheet,
        alpha: f32,
    ) -> Self {
        let interp = Vec2::lerp(prev_pos.0, pos.0, alpha);
        Self {
            position: interp.into(),
            sprite_offset: sheet.offset(sprite.name, sprite.frame),
            scale: appearance.scale,
            skin: u32::from(appearance.skin),
        }
    }
}

/// Per-ball draw data.
/// Stride = 20 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub position: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// Fades from 1 to 0 over the ball's life.
    pub opacity: f32,
    pub radius: f32,
}

impl BallInstance {
    pub fn from_components(pos: &Position, prev_pos: &PrevPosition, ball: &Ball, alpha: f32) -> Self {
        Self {
            position: Vec2::lerp(prev_pos.0, pos.0, alpha).into(),
            color: ball.color,
            opacity: ball.opacity(),
            radius: BALL_RADIUS,
        }
    }
}

/// A thought bubble to draw above a cat. Not GPU data; the host lays out text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThoughtCue {
    pub cat_id: u32,
    pub position: [f32; 2],
    pub glyph: &'static str,
    pub remaining_ms: u32,
}

impl ThoughtCue {
    pub fn new(cat_id: u32, position: Vec2, cue: &Cue) -> Self {
        Self {
            cat_id,
            position: position.into(),
            glyph: cue.glyph,
            remaining_ms: cue.remaining_ms,
        }
    }
}
