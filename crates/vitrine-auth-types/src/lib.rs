//! Authentication building blocks for the Vitrine store.
//!
//! Session JWTs and their cookies, the session extractors, password hashing
//! and TOTP verification for admin MFA.

pub mod cookie;
pub mod identity;
pub mod password;
pub mod token;
pub mod totp;
