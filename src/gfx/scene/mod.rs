//! # Scene Management Module
//!
//! What the renderer draws each frame.
//!
//! ## Key Components
//!
//! - [`Scene`] - Camera, lights, objects and materials
//! - [`Object`] - Meshes with a transform, a material and shadow flags
//! - [`Lighting`] - Ambient, one shadow-casting spot light and point lights
//! - [`Vertex3D`] - GPU vertex format

pub mod lighting;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use lighting::{AmbientLight, Lighting, PointLight, SpotLight, MAX_POINT_LIGHTS};
pub use object::{DrawObject, Mesh, Object};
pub use scene::Scene;
pub use vertex::Vertex3D;
