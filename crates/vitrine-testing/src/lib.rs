//! Test utilities for Vitrine services.
//!
//! Mock sessions, JSON fixture loading and an in-process HTTP server for
//! exercising outbound clients. Use from tests only.

pub mod auth;
pub mod fixture;
pub mod http;
