use glam::Vec2;

use crate::cat::animation::AnimationState;
use crate::cat::sprite::SpriteName;

/// Current world position in viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Position at the end of the previous tick, for render interpolation.
#[derive(Debug, Clone, Copy)]
pub struct PrevPosition(pub Vec2);

/// Stable per-cat id. Orders cats within a tick and spreads chase offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Roam,
    Idle,
    Chasing,
    FollowingPointer,
    Meeting,
    Interacting,
    Watch,
    Zoomies,
}

impl BehaviorState {
    /// Free cats can be recruited for meetings and make their own plans.
    pub fn is_free(self) -> bool {
        matches!(self, BehaviorState::Roam | BehaviorState::Idle)
    }

    /// Paired cats are left alone by external events.
    pub fn is_paired(self) -> bool {
        matches!(self, BehaviorState::Meeting | BehaviorState::Interacting)
    }
}

/// Behavior state plus everything that belongs to it.
///
/// Timers count ticks. `chase` is set only while `Chasing`; `partner` is set
/// only while `Meeting`/`Interacting` and always points at a cat that points
/// back.
#[derive(Debug, Clone, Copy)]
pub struct CatState {
    pub state: BehaviorState,
    pub target: Vec2,
    /// Pixels per tick.
    pub speed: f32,
    pub wait_timer: f32,
    /// Ticks spent sitting at a watch seat.
    pub idle_time: u32,
    pub follow_timer: f32,
    pub chase: Option<hecs::Entity>,
    pub partner: Option<hecs::Entity>,
    pub interaction_timer: i32,
    /// Seat offset from the anchor's top-left, picked once per mode session.
    pub watch_seat: Option<Vec2>,
    pub animation: Option<AnimationState>,
    /// Spectating and sitting still at the seat.
    pub settled: bool,
    /// Pointer currently over the sprite.
    pub hovered: bool,
}

impl CatState {
    pub fn new(target: Vec2, speed: f32, wait_timer: f32) -> Self {
        Self {
            state: BehaviorState::Roam,
            target,
            speed,
            wait_timer,
            idle_time: 0,
            follow_timer: 0.0,
            chase: None,
            partner: None,
            interaction_timer: 0,
            watch_seat: None,
            animation: None,
            settled: false,
            hovered: false,
        }
    }
}

/// Skin and display scale handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Appearance {
    /// Index into the host's sprite sheet list.
    pub skin: u8,
    /// Size multiplier (1.0 = 32px).
    pub scale: f32,
}

/// Sprite currently shown for a cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub name: SpriteName,
    pub frame: u32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            name: SpriteName::Idle,
            frame: 0,
        }
    }
}

/// A short text cue floating above a cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub glyph: &'static str,
    pub remaining_ms: u32,
}

/// Thought bubble slot. At most one cue at a time; a new one replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thought(pub Option<Cue>);

/// A ball the cats can chase. Lives alongside `Position`/`PrevPosition`.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    /// Spawn order; balls are processed in ascending serial.
    pub serial: u64,
    /// Pixels per tick.
    pub velocity: Vec2,
    pub friction: f32,
    /// Ticks left before the ball fades out.
    pub life: u32,
    pub max_life: u32,
    pub claimed: bool,
    pub claimed_by: Option<hecs::Entity>,
    /// RGBA packed as u32.
    pub color: u32,
}
