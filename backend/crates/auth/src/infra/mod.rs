//! Infrastructure Layer
//!
//! Store implementations.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryUserStore, InMemoryVerificationStore};
pub use postgres::PgUserStore;
