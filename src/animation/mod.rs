//! # Animation Module
//!
//! Time-driven building blocks for the party script. Every type here is driven
//! by an explicit clock time in seconds rather than by a global ticker, so the
//! whole sequence can be replayed in tests by feeding synthetic timestamps.
//!
//! ## Key Components
//!
//! - [`Ease`] - Easing curves applied to tween progress
//! - [`Tween`] - Interpolation with delay, repeat and yo-yo playback
//! - [`TimerQueue`] - One-shot timers outside the timeline
//! - [`Timeline`] / [`TimelinePlayer`] - Ordered single-pass step sequence
//! - [`Clock`] - Elapsed-time source (`SystemClock` or `ManualClock`)

pub mod clock;
pub mod ease;
pub mod timeline;
pub mod timer;
pub mod tween;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use ease::Ease;
pub use timeline::{FiredCue, Timeline, TimelinePlayer, TimelineStep};
pub use timer::TimerQueue;
pub use tween::{Repeat, Tween};
