//! Tooling & Integration Layer
//!
//! Adapters that drive the mirror from outside sources.

pub mod watch;

pub use watch::{EventTranslator, WatchConfig, WatchSession};
