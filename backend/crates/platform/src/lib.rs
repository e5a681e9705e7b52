//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA-512, base64url, random codes)
//! - Password hashing (Argon2id) behind the [`password::PasswordHasher`] capability
//! - Cookie header building and parsing

pub mod cookie;
pub mod crypto;
pub mod password;
