//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest vocabulary every backend crate agrees on:
//! - The unified [`error::app_error::AppError`] and its result alias
//! - [`error::kind::ErrorKind`], the HTTP-facing error classification
//!
//! Only things that are hard to change and mean the same thing in every
//! module belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
