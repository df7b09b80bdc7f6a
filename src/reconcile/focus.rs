//! Deferred focus requests for newly created directories.
//!
//! A created directory should get its rename prompt focused, but only after the
//! view has rendered the new row. Requests are parked here and handed out by
//! [`FocusQueue::after_render`], which the view calls once its render pass is
//! done. Event processing never waits on it.

#[derive(Debug, Default, Clone)]
pub struct FocusQueue {
    pending: Vec<String>,
}

impl FocusQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a focus request for the directory at `key`.
    pub fn request(&mut self, key: impl Into<String>) {
        self.pending.push(key.into());
    }

    /// Release every request made before the render pass that just finished.
    pub fn after_render(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
