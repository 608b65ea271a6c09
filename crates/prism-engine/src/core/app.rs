use anyhow::Result;
use winit::event::WindowEvent;

use crate::input::InputState;
use crate::render::RenderCtx;

use super::ctx::FrameCtx;
use super::frame_loop::FrameLoop;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// Per frame the runtime calls [`on_input`](Self::on_input), then
/// [`on_frame`](Self::on_frame), then presents. An error from any callback
/// stops the loop and is returned from `Runtime::run`.
pub trait App {
    /// Called once after the window and device exist, before the first frame.
    fn on_setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Input processing for the frame. Escape requests close by default.
    fn on_input(&mut self, input: &InputState, frame_loop: &mut FrameLoop) {
        frame_loop.process_input(input);
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Updates state and records the frame's draw commands.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once after the last frame, before the window and device drop.
    fn on_exit(&mut self) {}
}
