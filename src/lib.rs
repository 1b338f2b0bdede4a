//! rolodex: contacts, their recurring occasions, and the plumbing around them.
//!
//! The models live in `rolodex-core`; this crate adds a file-backed store,
//! text rendering and configuration for the `rdx` binary.

pub mod config;
pub mod render;
pub mod store;

pub use rolodex_core::models;
pub use rolodex_core::ModelError;
