use crate::input::{InputState, Key};

/// Lifecycle of the render loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// Close was requested during a frame; that frame still presents.
    CloseRequested,
    /// No further frames are drawn.
    Terminated,
}

/// Close-flag state machine driving the per-frame sequence.
///
/// Each frame is bracketed by [`begin_frame`](Self::begin_frame) and either
/// [`end_frame`](Self::end_frame), called after presentation, or
/// [`abandon_frame`](Self::abandon_frame) when nothing was presented.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    in_frame: bool,
    frames_presented: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            in_frame: false,
            frames_presented: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The close flag. True from the moment a close is requested.
    pub fn should_close(&self) -> bool {
        self.state != LoopState::Running
    }

    pub fn is_terminated(&self) -> bool {
        self.state == LoopState::Terminated
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Starts a frame. Returns `false` once the loop has terminated.
    ///
    /// A pending close still gets a frame so the one that requested it can
    /// present after an abandoned attempt.
    pub fn begin_frame(&mut self) -> bool {
        if self.state == LoopState::Terminated {
            return false;
        }
        self.in_frame = true;
        true
    }

    /// Marks the current frame as presented.
    pub fn end_frame(&mut self) {
        if !self.in_frame {
            return;
        }
        self.in_frame = false;
        self.frames_presented += 1;

        if self.state == LoopState::CloseRequested {
            self.state = LoopState::Terminated;
            log::debug!("render loop terminated after {} frames", self.frames_presented);
        }
    }

    /// Ends the current frame without presenting it. The state is kept, so
    /// a pending close waits for the next presented frame.
    pub fn abandon_frame(&mut self) {
        if self.in_frame {
            self.in_frame = false;
            log::debug!("frame abandoned ({:?})", self.state);
        }
    }

    /// Requests the loop to stop.
    ///
    /// Inside a frame the loop moves to `CloseRequested` and terminates once
    /// a frame presents. Between frames it terminates immediately.
    pub fn request_close(&mut self) {
        let next = match (self.state, self.in_frame) {
            (LoopState::Terminated, _) | (LoopState::CloseRequested, true) => return,
            (LoopState::Running, true) => LoopState::CloseRequested,
            (_, false) => LoopState::Terminated,
        };
        self.state = next;
        log::debug!("close requested ({next:?})");
    }

    /// Frame step (1): Escape held requests close.
    pub fn process_input(&mut self, input: &InputState) {
        if input.key_down(Key::Escape) {
            self.request_close();
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState, Modifiers};

    fn press(state: &mut InputState, key: Key) {
        state.apply_event(InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
        });
    }

    #[test]
    fn runs_until_closed() {
        let mut fl = FrameLoop::new();
        for _ in 0..3 {
            assert!(fl.begin_frame());
            fl.end_frame();
        }
        assert_eq!(fl.frames_presented(), 3);
        assert_eq!(fl.state(), LoopState::Running);
    }

    #[test]
    fn escape_finishes_current_frame_then_stops() {
        let mut fl = FrameLoop::new();
        let mut input = InputState::default();
        let mut draws = 0;

        assert!(fl.begin_frame());
        fl.process_input(&input);
        draws += 1;
        fl.end_frame();

        press(&mut input, Key::Escape);

        assert!(fl.begin_frame());
        fl.process_input(&input);
        assert!(fl.should_close());
        assert_eq!(fl.state(), LoopState::CloseRequested);
        draws += 1;
        fl.end_frame();

        assert_eq!(fl.state(), LoopState::Terminated);
        while fl.begin_frame() {
            draws += 1;
            fl.end_frame();
        }
        assert_eq!(draws, 2);
        assert_eq!(fl.frames_presented(), 2);
    }

    #[test]
    fn other_keys_do_not_close() {
        let mut fl = FrameLoop::new();
        let mut input = InputState::default();
        press(&mut input, Key::Q);

        assert!(fl.begin_frame());
        fl.process_input(&input);
        fl.end_frame();
        assert!(!fl.should_close());
    }

    #[test]
    fn window_close_between_frames_terminates_at_once() {
        let mut fl = FrameLoop::new();
        assert!(fl.begin_frame());
        fl.end_frame();

        fl.request_close();
        assert!(fl.is_terminated());
        assert!(!fl.begin_frame());
    }

    #[test]
    fn repeated_close_requests_are_harmless() {
        let mut fl = FrameLoop::new();
        assert!(fl.begin_frame());
        fl.request_close();
        fl.request_close();
        fl.end_frame();
        fl.request_close();
        fl.end_frame();
        assert!(fl.is_terminated());
        assert_eq!(fl.frames_presented(), 1);
    }

    #[test]
    fn skipped_frame_does_not_complete_close() {
        let mut fl = FrameLoop::new();
        let mut input = InputState::default();
        press(&mut input, Key::Escape);

        assert!(fl.begin_frame());
        fl.process_input(&input);
        fl.abandon_frame();
        assert_eq!(fl.state(), LoopState::CloseRequested);
        assert_eq!(fl.frames_presented(), 0);

        assert!(fl.begin_frame());
        fl.process_input(&input);
        fl.end_frame();
        assert!(fl.is_terminated());
        assert_eq!(fl.frames_presented(), 1);
    }

    #[test]
    fn window_close_after_skipped_frame_terminates() {
        let mut fl = FrameLoop::new();
        assert!(fl.begin_frame());
        fl.request_close();
        fl.abandon_frame();

        fl.request_close();
        assert!(fl.is_terminated());
        assert_eq!(fl.frames_presented(), 0);
    }

    #[test]
    fn skipped_frames_are_not_counted() {
        let mut fl = FrameLoop::new();
        assert!(fl.begin_frame());
        fl.abandon_frame();
        // No frame is open, so this is a no-op.
        fl.end_frame();
        assert_eq!(fl.frames_presented(), 0);
        assert_eq!(fl.state(), LoopState::Running);
    }
}
