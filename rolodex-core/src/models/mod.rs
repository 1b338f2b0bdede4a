//! Domain models for rolodex.
//!
//! # Core Concepts
//!
//! - [`Contact`]: A person to stay in touch with. Owns an ordered list of objectives.
//! - [`Objective`]: A recurring occasion (a birthday, say) tied to one contact
//!   through the plain `contact_id` value.
//!
//! # Mounting
//!
//! Both entities are built from a [`Bag`], an open key/value map. Known fields
//! land in typed slots; everything else is kept verbatim in `extras` and written
//! back out on serialization. Mounting a contact re-stamps every objective's
//! `contact_id` with the contact's `id`, absent ids included.

mod bag;
mod contact;
mod objective;

pub use bag::*;
pub use contact::*;
pub use objective::*;
