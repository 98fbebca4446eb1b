//! plistquill applies path-addressed edits to property-list documents.
//!
//! A document is loaded into a [`document::Document`], edited through a
//! [`keypath::Evaluator`] (directly or by running a [`script::Script`]), and
//! written back with [`file::saver`].

pub mod config;
pub mod document;
pub mod file;
pub mod helpers;
pub mod keypath;
pub mod script;
