//! Entity Module

pub mod user;
pub mod verification;
