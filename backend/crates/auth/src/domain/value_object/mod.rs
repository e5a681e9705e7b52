//! Value Object Module

pub mod auth_user;
pub mod credentials;
pub mod email;
pub mod identity;
pub mod login_id;
pub mod nickname;
pub mod reissue_target;
pub mod token_pair;
