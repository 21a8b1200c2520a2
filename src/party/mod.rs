//! # Party Module
//!
//! The birthday scene itself: what is on the table, how it moves and the
//! script that drives it.
//!
//! ## Key Components
//!
//! - [`SceneSession`] - Lit flag, candle lights, cake, balloons, confetti, camera and music
//! - [`Director`] - Replays the fixed party timeline into the session
//! - [`PartyRuntime`] - Per-frame driver: asset polling, timeline, animations
//! - [`Stage`] - Mirrors the session into the render scene

pub mod balloons;
pub mod candles;
pub mod confetti;
pub mod director;
pub mod runtime;
pub mod session;
pub mod stage;

pub use balloons::{spawn_balloons, Balloon};
pub use candles::{flicker_intensity, CandleLight};
pub use confetti::ConfettiCloud;
pub use director::{party_timeline, CameraGoal, Cue, Director};
pub use runtime::{Frame, PartyRuntime};
pub use session::{Effect, FlameState, SceneSession};
pub use stage::Stage;

/// Converts a `0xRRGGBB` colour to `[r, g, b]` in `0..=1`
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
