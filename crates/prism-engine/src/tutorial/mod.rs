//! Reusable tutorial harness.
//!
//! Every tutorial runs the same phases: open the window and device, compile
//! and link the shaders, upload static geometry, loop until closed, release.
//! Variants differ only in their [`TutorialConfig`].

mod config;
mod harness;

pub use config::{SceneConfig, TutorialConfig};
pub use harness::{EXIT_FAILURE, FrameHook, Scene, Tutorial};
