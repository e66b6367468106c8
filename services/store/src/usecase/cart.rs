use std::collections::HashMap;

use crate::domain::repository::{CartStore, ProductRepository};
use crate::domain::types::{CartLine, CartView, PricedLine, Product};
use crate::error::StoreError;

/// Most units of one product a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// Quantity of one line, rejected outside `1..=MAX_LINE_QUANTITY`.
pub fn line_quantity(quantity: i64) -> Result<u32, StoreError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
        .ok_or_else(|| {
            StoreError::Validation(format!(
                "quantity must be between 1 and {MAX_LINE_QUANTITY}"
            ))
        })
}

fn total_too_large() -> StoreError {
    StoreError::Validation("order total is too large".into())
}

pub fn line_total(price_cents: i64, quantity: u32) -> Result<i64, StoreError> {
    price_cents
        .checked_mul(i64::from(quantity))
        .ok_or_else(total_too_large)
}

/// Sum of line totals, failing instead of wrapping.
pub fn order_total(lines: &[PricedLine]) -> Result<i64, StoreError> {
    lines.iter().try_fold(0i64, |acc, l| {
        acc.checked_add(l.line_total_cents).ok_or_else(total_too_large)
    })
}

/// Price stored lines against the catalog, keeping cart order.
///
/// Lines whose product is unknown are skipped; `active_only` also skips
/// paused products. `total_items` always counts every stored line.
pub fn price_lines(
    lines: &[CartLine],
    products: Vec<Product>,
    active_only: bool,
) -> Result<CartView, StoreError> {
    let by_code: HashMap<String, Product> =
        products.into_iter().map(|p| (p.code.clone(), p)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(product) = by_code.get(&line.id) else {
            continue;
        };
        if active_only && !product.active {
            continue;
        }
        priced.push(PricedLine {
            product: product.clone(),
            quantity: line.quantity,
            line_total_cents: line_total(product.price_cents, line.quantity)?,
        });
    }

    Ok(CartView {
        total_cents: order_total(&priced)?,
        total_items: lines.iter().map(|l| u64::from(l.quantity)).sum(),
        lines: priced,
    })
}

fn require_code(code: &str) -> Result<&str, StoreError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(StoreError::Validation("id is required".into()));
    }
    Ok(code)
}

/// The cart of one visitor, keyed by the cart cookie.
pub struct CartService<C, P>
where
    C: CartStore,
    P: ProductRepository,
{
    pub store: C,
    pub products: P,
}

impl<C, P> CartService<C, P>
where
    C: CartStore,
    P: ProductRepository,
{
    pub async fn lines(&self, cart_id: &str) -> Result<Vec<CartLine>, StoreError> {
        self.store.load(cart_id).await
    }

    async fn priced(&self, cart_id: &str, active_only: bool) -> Result<CartView, StoreError> {
        let lines = self.store.load(cart_id).await?;
        if lines.is_empty() {
            return price_lines(&lines, vec![], active_only);
        }
        let codes: Vec<String> = lines.iter().map(|l| l.id.clone()).collect();
        let products = self.products.find_by_codes(&codes).await?;
        price_lines(&lines, products, active_only)
    }

    /// Cart as shown to the visitor.
    pub async fn view(&self, cart_id: &str) -> Result<CartView, StoreError> {
        self.priced(cart_id, false).await
    }

    /// Cart restricted to purchasable products.
    pub async fn checkout_view(&self, cart_id: &str) -> Result<CartView, StoreError> {
        self.priced(cart_id, true).await
    }

    /// Add at least one unit of `code`.
    pub async fn add(
        &self,
        cart_id: &str,
        code: &str,
        quantity: Option<i64>,
    ) -> Result<(), StoreError> {
        let code = require_code(code)?;
        let quantity = line_quantity(quantity.unwrap_or(1).max(1))?;
        let mut lines = self.store.load(cart_id).await?;
        match lines.iter_mut().find(|l| l.id == code) {
            Some(line) => {
                line.quantity = line_quantity(i64::from(line.quantity) + i64::from(quantity))?;
            }
            None => lines.push(CartLine {
                id: code.to_owned(),
                quantity,
            }),
        }
        self.store.save(cart_id, &lines).await
    }

    /// Set the quantity of `code`; zero or less removes the line.
    pub async fn set(&self, cart_id: &str, code: &str, quantity: i64) -> Result<(), StoreError> {
        let code = require_code(code)?;
        let mut lines = self.store.load(cart_id).await?;
        if quantity <= 0 {
            lines.retain(|l| l.id != code);
        } else {
            let quantity = line_quantity(quantity)?;
            match lines.iter_mut().find(|l| l.id == code) {
                Some(line) => line.quantity = quantity,
                None => lines.push(CartLine {
                    id: code.to_owned(),
                    quantity,
                }),
            }
        }
        self.store.save(cart_id, &lines).await
    }

    pub async fn remove(&self, cart_id: &str, code: &str) -> Result<(), StoreError> {
        let mut lines = self.store.load(cart_id).await?;
        lines.retain(|l| l.id != code);
        self.store.save(cart_id, &lines).await
    }

    pub async fn clear(&self, cart_id: &str) -> Result<(), StoreError> {
        self.store.clear(cart_id).await
    }
}
