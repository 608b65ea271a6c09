/// What the frame loop does after a failed surface acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface was reconfigured; the next frame can draw.
    Reconfigured,
    /// Timeout or a transient backend error; this frame is dropped.
    SkipFrame,
    /// Out of memory. The loop stops and the program exits with failure.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
