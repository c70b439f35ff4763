use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::geometry::clamp;

/// Viewports narrower than this are treated as phones: one small cat, no
/// meetings, roaming anywhere on screen.
pub const COMPACT_WIDTH: f32 = 768.0;
/// Native sprite cell size in pixels.
pub const SPRITE_CELL: f32 = 32.0;
/// Collision radius as a fraction of the cat's half size.
const COLLISION_RADIUS_FACTOR: f32 = 0.9;
/// Smallest viewport edge we agree to simulate in.
const MIN_VIEWPORT_EDGE: f32 = 100.0;

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewport must be at least {min}x{min} pixels, got {width}x{height}")]
    ViewportTooSmall { width: f32, height: f32, min: f32 },
    #[error("tick interval must be non-zero")]
    ZeroTick,
    #[error("base speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
    #[error("content zone must satisfy 0 <= left < right <= width, got {left}..{right}")]
    InvalidContentZone { left: f32, right: f32 },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Size of the area the cats live in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_compact(&self) -> bool {
        self.width < COMPACT_WIDTH
    }

    /// Sprite scale: 1.5x on desktop, native size on phones.
    pub fn cat_scale(&self) -> f32 {
        if self.is_compact() {
            1.0
        } else {
            1.5
        }
    }

    pub fn cat_size(&self) -> f32 {
        SPRITE_CELL * self.cat_scale()
    }

    pub fn cat_half(&self) -> f32 {
        self.cat_size() * 0.5
    }

    /// Center-to-center distance two cats try to keep.
    pub fn min_cat_distance(&self) -> f32 {
        self.cat_half() * COLLISION_RADIUS_FACTOR * 2.0
    }

    /// Keep a cat's center far enough from the edges that the sprite stays visible.
    pub fn clamp_cat(&self, p: Vec2) -> Vec2 {
        let half = self.cat_half();
        Vec2::new(
            clamp(p.x, half, self.width - half),
            clamp(p.y, half, self.height - half),
        )
    }
}

/// Horizontal band reserved for page content; wide-screen cats roam beside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentZone {
    pub left: f32,
    pub right: f32,
}

/// Host capabilities checked once at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    /// The user asked the system for reduced motion.
    pub reduced_motion: bool,
}

/// Static configuration for a simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub viewport: Viewport,
    /// Milliseconds of simulated time per tick.
    pub tick_ms: u64,
    /// Cruising speed in pixels per tick; every boost is a multiple of it.
    pub base_speed: f32,
    /// Overrides the device-based cat count (1 on phones, 3 on desktop).
    pub cat_count: Option<usize>,
    /// Optional RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Reserved content band. Defaults to 15%..85% of the viewport width.
    pub content_zone: Option<ContentZone>,
    /// Picks the bright ball palette for dark page backgrounds.
    pub dark_background: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            tick_ms: 100,
            base_speed: 10.0,
            cat_count: None,
            seed: None,
            content_zone: None,
            dark_background: false,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_viewport(self.viewport)?;
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.base_speed));
        }
        if let Some(zone) = self.content_zone {
            if !(zone.left >= 0.0 && zone.left < zone.right && zone.right <= self.viewport.width) {
                return Err(ConfigError::InvalidContentZone {
                    left: zone.left,
                    right: zone.right,
                });
            }
        }
        Ok(())
    }

    /// Cat count for the configured viewport.
    pub fn initial_cat_count(&self) -> usize {
        self.cat_count
            .unwrap_or(if self.viewport.is_compact() { 1 } else { 3 })
    }

    pub fn content_zone(&self) -> ContentZone {
        self.content_zone.unwrap_or(ContentZone {
            left: self.viewport.width * 0.15,
            right: self.viewport.width * 0.85,
        })
    }
}

pub fn validate_viewport(viewport: Viewport) -> Result<(), ConfigError> {
    let ok = viewport.width.is_finite()
        && viewport.height.is_finite()
        && viewport.width >= MIN_VIEWPORT_EDGE
        && viewport.height >= MIN_VIEWPORT_EDGE;
    if ok {
        Ok(())
    } else {
        Err(ConfigError::ViewportTooSmall {
            width: viewport.width,
            height: viewport.height,
            min: MIN_VIEWPORT_EDGE,
        })
    }
}
