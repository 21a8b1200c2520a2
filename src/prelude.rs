//! Commonly used types in one import
//!
//! ```no_run
//! use birthday_party::prelude::*;
//!
//! let app = PartyApp::new(PartyConfig::default())?;
//! app.run()?;
//! # Ok::<(), AppError>(())
//! ```

pub use crate::app::{AppError, PartyApp};
pub use crate::config::PartyConfig;

pub use crate::animation::{Clock, Ease, ManualClock, SystemClock, Timeline, Tween};
pub use crate::party::{Cue, Director, PartyRuntime, SceneSession, Stage};

pub use crate::gfx::scene::Scene;
pub use crate::gfx::{PerspectiveCamera, RenderEngine};

pub use cgmath::Vector3;
