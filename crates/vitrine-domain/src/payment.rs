//! Payment providers and checkout payment methods.

use serde::{Deserialize, Serialize};

/// Provider name stored on orders settled through Mercado Pago.
pub const PROVIDER_MERCADOPAGO: &str = "mercadopago";

/// Provider name stored on zero-total orders that never reach a provider.
pub const PROVIDER_FREE: &str = "free";

/// Payment method the buyer is restricted to at checkout.
///
/// `None` at the call sites means both methods are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Card,
}

impl PaymentMethod {
    /// Normalize a configured or submitted value. Unknown values mean "both".
    pub fn normalize(value: Option<&str>) -> Option<Self> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("pix") => Some(Self::Pix),
            Some("card") => Some(Self::Card),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Card => "card",
        }
    }
}

/// Payment types hidden from the hosted checkout for the chosen method.
///
/// Boleto (`ticket`) is never offered.
pub fn excluded_payment_types(method: Option<PaymentMethod>) -> &'static [&'static str] {
    match method {
        Some(PaymentMethod::Pix) => &["credit_card", "debit_card", "ticket"],
        Some(PaymentMethod::Card) => &["pix", "ticket"],
        None => &["ticket"],
    }
}
