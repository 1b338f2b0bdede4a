//! Contact and objective models for rolodex.
//!
//! Storage and presentation live outside this crate; they hand loosely-shaped
//! [`Bag`]s in and read typed entities back out.

mod error;
pub mod models;

pub use error::ModelError;
pub use models::*;
