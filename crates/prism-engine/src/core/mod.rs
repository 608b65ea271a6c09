//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the programs it drives, together with the per-frame context and the
//! close-flag state machine.

mod app;
mod ctx;
mod frame_loop;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use frame_loop::{FrameLoop, LoopState};
