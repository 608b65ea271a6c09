//! Frame timing.
//!
//! The runtime owns one `FrameClock` and ticks it once per drawn frame; the
//! resulting `FrameTime` reaches the app through `FrameCtx`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
