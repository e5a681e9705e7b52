//! Domain Layer
//!
//! Contains entities, value objects, and store traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    user::{NewUser, UserRecord},
    verification::VerificationEntry,
};
pub use repository::{UserStore, VerificationStore};
