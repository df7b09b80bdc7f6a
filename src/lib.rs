//! dirmirror: Lazily-Loaded Directory Mirror
//!
//! Keeps an in-memory, sorted mirror of a directory tree in sync with a stream
//! of filesystem change events. Directories are listed only when expanded;
//! events for directories that were never expanded are skipped.
//!
//! The pieces, bottom up:
//! - [`tree`]: entries, the ordering function, binary search, path resolution,
//!   the directory cache and the filesystem loader
//! - [`events`]: the change-event schema
//! - [`reconcile`]: the dispatcher and per-operation handlers
//! - [`tooling`]: the live `notify` adapter
//! - [`cli`]: the `dirmirror` command line

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod reconcile;
pub mod tooling;
pub mod tree;
