//! Domain types shared across Vitrine crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod hook;
pub mod money;
pub mod order;
pub mod payment;
pub mod user;
