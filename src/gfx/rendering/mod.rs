//! Core rendering functionality
//!
//! Render pipelines, the confetti billboards and frame rendering.

pub mod confetti_renderer;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use confetti_renderer::{ConfettiInstance, ConfettiRenderer};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameContent, RenderEngine, RenderError};
