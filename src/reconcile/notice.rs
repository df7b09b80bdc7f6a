//! Notice sinks: where recoverable reconcile failures are reported.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

/// Receives human-readable messages when an event cannot be applied.
pub trait NoticeSink {
    fn notice(&self, message: &str);
}

/// Reports notices as warnings in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
    fn notice(&self, message: &str) {
        warn!(notice = %message, "Reconcile notice");
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNoticeSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingNoticeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Return and clear the recorded notices.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl NoticeSink for RecordingNoticeSink {
    fn notice(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Adapts a closure into a sink.
pub struct FnNoticeSink<F>(pub F);

impl<F: Fn(&str)> NoticeSink for FnNoticeSink<F> {
    fn notice(&self, message: &str) {
        (self.0)(message)
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for Arc<T> {
    fn notice(&self, message: &str) {
        (**self).notice(message)
    }
}
