//! Entity kinds persisted through the [`Store`](crate::store::Store).
//!
//! Each kind is a serde struct implementing [`Entity`](crate::store::Entity);
//! missing fields deserialize to the kind's defaults, so any field map
//! (including an empty one) produces a valid unsaved instance.

mod message;
mod todo;
mod user;

pub use message::{Message, MESSAGE_EXTRA};
pub use todo::Todo;
pub use user::User;
