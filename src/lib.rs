//! Birthday Party
//!
//! A scripted 3D birthday scene on wgpu and winit: a cake with flickering
//! candles, bobbing balloons, a confetti burst, camera moves and music, all
//! driven by a fixed timeline.

pub mod animation;
pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod gfx;
pub mod party;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{AppError, PartyApp};
pub use config::PartyConfig;
