//! Outbound payment hook events and provider matching.

use std::fmt;

/// Provider value on a hook that matches every provider filter.
pub const CATCH_ALL_PROVIDER: &str = "outro";

/// Events fanned out to registered payment hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEvent {
    Created,
    Updated,
    Paid,
    Failed,
    Test,
}

impl PaymentEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "payment.created",
            Self::Updated => "payment.updated",
            Self::Paid => "payment.paid",
            Self::Failed => "payment.failed",
            Self::Test => "payment.test",
        }
    }
}

impl fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a hook registered for `hook_provider` accepts a dispatch filtered by `filter`.
///
/// No filter accepts every hook; otherwise the provider must match exactly
/// or the hook must be the catch-all.
pub fn provider_matches(hook_provider: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(p) => hook_provider == p || hook_provider == CATCH_ALL_PROVIDER,
    }
}
