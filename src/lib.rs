//! Bookshelf Application Library
//!
//! Domain modules for the bookshelf service; the HTTP facade, settings,
//! and storage live in the workspace crates.

pub mod books;
