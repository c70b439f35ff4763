use crate::cat::sprite::SpriteName;

/// Which wall a cat is scratching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    North,
    South,
    East,
    West,
}

/// One-shot animations a cat can play in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Idle,
    Alert,
    ScratchSelf,
    Tired,
    Sleeping,
    ScratchWall(Wall),
}

/// What happens when an animation runs past its frame limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Go back to roaming after a fresh wait.
    Resume,
    /// A free cat rolls straight into another animation, showing a cue.
    ChainInto(AnimationKind, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    /// Last frame index that still plays.
    pub frame_limit: u32,
    pub on_finish: Continuation,
}

impl AnimationKind {
    pub fn spec(self) -> AnimationSpec {
        match self {
            AnimationKind::Sleeping => AnimationSpec {
                frame_limit: 60,
                on_finish: Continuation::Resume,
            },
            AnimationKind::ScratchWall(_) => AnimationSpec {
                frame_limit: 10,
                on_finish: Continuation::Resume,
            },
            // Tired cats groom themselves afterwards.
            AnimationKind::Tired => AnimationSpec {
                frame_limit: 15,
                on_finish: Continuation::ChainInto(AnimationKind::ScratchSelf, "😸"),
            },
            AnimationKind::Idle | AnimationKind::Alert | AnimationKind::ScratchSelf => {
                AnimationSpec {
                    frame_limit: 15,
                    on_finish: Continuation::Resume,
                }
            }
        }
    }

    pub fn sprite(self) -> SpriteName {
        match self {
            AnimationKind::Idle => SpriteName::Idle,
            AnimationKind::Alert => SpriteName::Alert,
            AnimationKind::ScratchSelf => SpriteName::ScratchSelf,
            AnimationKind::Tired => SpriteName::Tired,
            AnimationKind::Sleeping => SpriteName::Sleeping,
            AnimationKind::ScratchWall(Wall::North) => SpriteName::ScratchWallN,
            AnimationKind::ScratchWall(Wall::South) => SpriteName::ScratchWallS,
            AnimationKind::ScratchWall(Wall::East) => SpriteName::ScratchWallE,
            AnimationKind::ScratchWall(Wall::West) => SpriteName::ScratchWallW,
        }
    }

    /// Bubble shown when a spectating cat starts this animation.
    pub fn spectator_glyph(self) -> Option<&'static str> {
        match self {
            AnimationKind::ScratchSelf => Some("😸"),
            AnimationKind::Sleeping => Some("💤"),
            AnimationKind::Tired => Some("😴"),
            AnimationKind::ScratchWall(_) => Some("🐾"),
            AnimationKind::Idle | AnimationKind::Alert => None,
        }
    }
}

/// A playing animation and how far into it the cat is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    pub kind: AnimationKind,
    pub frame: u32,
}

impl AnimationState {
    pub fn new(kind: AnimationKind) -> Self {
        Self { kind, frame: 0 }
    }
}
