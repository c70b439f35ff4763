use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Clamp without the `min <= max` assertion of `f32::clamp`.
/// A viewport smaller than a cat must not bring the whole toy down.
#[inline]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    val.max(min).min(max)
}

/// Axis-aligned rectangle in viewport pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Eight-way compass heading. Screen space: +y points south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// Classify a travel vector. A component counts when it carries more than
    /// half of the unit vector, so shallow diagonals collapse onto an axis.
    pub fn classify(delta: Vec2) -> Self {
        let len = delta.length();
        if len <= f32::EPSILON {
            return Direction::E;
        }
        let n = delta / len;
        let north = n.y < -0.5;
        let south = n.y > 0.5;
        let east = n.x > 0.5;
        let west = n.x < -0.5;
        match (north, south, east, west) {
            (true, _, true, _) => Direction::NE,
            (true, _, _, true) => Direction::NW,
            (_, true, true, _) => Direction::SE,
            (_, true, _, true) => Direction::SW,
            (true, _, _, _) => Direction::N,
            (_, true, _, _) => Direction::S,
            (_, _, _, true) => Direction::W,
            _ => Direction::E,
        }
    }

    /// Collapse onto whichever axis dominates the travel vector.
    pub fn dominant_axis(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::E
            } else {
                Direction::W
            }
        } else if delta.y > 0.0 {
            Direction::S
        } else {
            Direction::N
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::SE | Direction::SW | Direction::NW
        )
    }
}
