//! # User Interface Module
//!
//! Dear ImGui overlay drawn over the party.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`overlay`] - The music toggle and the birthday message

pub mod manager;
pub mod overlay;

// Re-export main types
pub use manager::UiManager;
pub use overlay::{party_overlay, OverlayAction, OverlayState};
