use chrono::Utc;
use uuid::Uuid;

use vitrine_domain::money::format_brl;

use crate::domain::repository::{Mailer, OrderRepository};
use crate::domain::types::{OrderWithItems, OutgoingEmail};

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

pub fn receipt_subject(order_id: Uuid) -> String {
    format!("Comprovante de compra #{order_id}")
}

pub fn build_receipt_html(order: &OrderWithItems) -> String {
    let cell = r#"<td style="padding:6px 0;">"#;
    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr>{cell}{}</td>{cell}{}</td>{cell}{}</td></tr>",
                escape_html(&item.name),
                item.quantity,
                format_brl(item.unit_price_cents),
            )
        })
        .collect();

    format!(
        "<h2>Obrigado pela compra!</h2>\
         <p>Pedido #{id}</p>\
         <table style=\"width:100%; border-collapse:collapse;\">\
         <thead><tr><th align=\"left\">Item</th><th align=\"left\">Qtd</th><th align=\"left\">Valor</th></tr></thead>\
         <tbody>{rows}</tbody>\
         </table>\
         <p><strong>Total:</strong> {total}</p>",
        id = order.order.id,
        total = format_brl(order.order.total_cents),
    )
}

/// Emails the purchase receipt of an order.
pub struct ReceiptNotifier<O, M>
where
    O: OrderRepository,
    M: Mailer,
{
    pub orders: O,
    pub mailer: M,
}

impl<O, M> ReceiptNotifier<O, M>
where
    O: OrderRepository,
    M: Mailer,
{
    /// Send the receipt of `order_id` to `to` and stamp `receipt_sent_at`.
    ///
    /// Returns whether an email went out. Failures are logged, never returned.
    pub async fn send(&self, order_id: Uuid, to: &str) -> bool {
        if !self.mailer.is_configured() {
            tracing::debug!(order_id = %order_id, "mailer not configured, skipping receipt");
            return false;
        }

        let order = match self.orders.find_with_items(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                tracing::warn!(order_id = %order_id, "receipt requested for unknown order");
                return false;
            }
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "failed to load order for receipt");
                return false;
            }
        };

        let email = OutgoingEmail {
            to: to.to_owned(),
            subject: receipt_subject(order_id),
            html: build_receipt_html(&order),
        };
        if let Err(e) = self.mailer.send(&email).await {
            tracing::warn!(order_id = %order_id, error = %e, "failed to send receipt");
            return false;
        }

        if let Err(e) = self.orders.mark_receipt_sent(order_id, Utc::now()).await {
            tracing::warn!(order_id = %order_id, error = %e, "failed to stamp receipt");
        }
        tracing::info!(order_id = %order_id, "receipt sent");
        true
    }
}
