use glam::Vec2;

use crate::util::geometry::Rect;

/// External "mode" session (a mini-game the cats gather around).
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeState {
    pub active: bool,
    /// On-screen box of the element being watched, if it could be found.
    pub anchor: Option<Rect>,
}

impl ModeState {
    /// Anchor to gather around, only while a session is running.
    pub fn watch_anchor(&self) -> Option<Rect> {
        if self.active {
            self.anchor
        } else {
            None
        }
    }
}

/// Process-wide state shared by every system during a tick.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// `None` while the pointer is outside the viewport.
    pub pointer: Option<Vec2>,
    pub mode: ModeState,
    /// The one cat allowed to follow the pointer.
    pub follower: Option<hecs::Entity>,
    /// When the last meeting was arranged. `None` until the first one.
    pub last_social_ms: Option<u64>,
    /// When the follower slot was last granted.
    pub last_follow_ms: Option<u64>,
    /// Simulated clock.
    pub now_ms: u64,
    pub tick: u64,
    pub next_ball_serial: u64,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position when it is inside the viewport with positive coordinates.
    pub fn pointer_on_screen(&self) -> Option<Vec2> {
        self.pointer.filter(|p| p.x > 0.0 && p.y > 0.0)
    }

    /// True once at least `cooldown_ms` of simulated time has passed since `stamp`.
    pub fn cooled_down(&self, stamp: Option<u64>, cooldown_ms: u64) -> bool {
        stamp.map_or(true, |at| self.now_ms.saturating_sub(at) >= cooldown_ms)
    }

    /// Free the follower slot if `entity` holds it.
    pub fn release_follower(&mut self, entity: hecs::Entity) {
        if self.follower == Some(entity) {
            self.follower = None;
        }
    }
}
