//! File I/O for documents.
//!
//! `format` converts between bytes and the node tree, `loader` reads documents
//! from files or stdin, and `saver` writes them back atomically.

pub mod format;
pub mod loader;
pub mod saver;

pub use format::Format;
