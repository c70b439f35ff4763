//! Desktop-pet cats that wander a viewport, chase balls, follow the pointer,
//! meet each other and gather around an on-screen mode session.
//!
//! The host feeds pointer and mode events into a [`Sim`], calls
//! [`Sim::tick`] at a fixed interval and draws what [`Sim::frame`] returns.

pub mod app;
pub mod cat;
pub mod click;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod render;
pub mod shared;
pub mod sim;
pub mod util;

pub use config::{Capabilities, ConfigError, SimConfig, Viewport};
pub use render::RenderFrame;
pub use sim::{InitError, Sim};
pub use util::geometry::Rect;
