/// Opaque id of one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's frame scheduler (a display-refresh callback in a GUI).
pub trait FrameHost {
    /// Schedule one callback for the next frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Drop a scheduled callback; unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame host driven by hand: callers pop pending handles and deliver them.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    next: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Oldest scheduled callback, removed as if it had fired.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(pos) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(pos);
            self.cancelled.push(handle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/host.rs"]
mod tests;
