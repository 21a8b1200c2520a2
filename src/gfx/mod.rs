//! # Graphics Module
//!
//! Everything between the party state and the GPU.
//!
//! - **Camera** ([`camera`]) - Perspective camera driven by the timeline
//! - **Geometry** ([`geometry`]) - Procedural spheres and planes
//! - **Rendering** ([`rendering`]) - Shadow-mapped forward renderer plus confetti billboards
//! - **Scene** ([`scene`]) - Objects, lights and the material set
//! - **Resources** ([`resources`]) - Materials, depth textures and global uniforms
//!
//! The [`RenderEngine`] draws a [`Scene`]; `party::Stage` keeps the scene in
//! step with the animation.
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use rendering::render_engine::{FrameContent, RenderEngine, RenderError};
