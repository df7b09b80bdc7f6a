//! Directory Tree Mirror
//!
//! In-memory, partially loaded mirror of a directory tree. Each loaded
//! directory holds an ordered listing of its entries; the listings are kept in
//! order by binary insertion as change events arrive.

pub mod cache;
pub mod entry;
pub mod order;
pub mod path;
pub mod search;
pub mod walker;

pub use cache::DirectoryCache;
pub use entry::{Entry, EntryKind, FileCategory};
pub use search::{find_exact, find_insertion_index, InsertPosition};
pub use walker::{DirectoryLoader, FsDirectoryLoader, LoaderConfig};
