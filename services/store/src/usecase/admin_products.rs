use chrono::Utc;
use uuid::Uuid;

use vitrine_domain::money::parse_price_to_cents;

use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::domain::types::{Order, Product};
use crate::error::StoreError;

const MAX_FIELD_LEN: usize = 255;

/// Editable product fields.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    /// Generated when omitted on create, kept when omitted on update.
    pub code: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub price_text: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub file_url: Option<String>,
    pub images: Vec<String>,
    pub active: bool,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn check_len(field: &str, value: Option<&str>) -> Result<(), StoreError> {
    match value {
        Some(v) if v.chars().count() > MAX_FIELD_LEN => Err(StoreError::Validation(format!(
            "{field} must be at most {MAX_FIELD_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// Validated and normalized input.
struct CleanProduct {
    code: Option<String>,
    title: String,
    description: Option<String>,
    price_text: Option<String>,
    price_cents: i64,
    cta_label: Option<String>,
    cta_href: Option<String>,
    file_url: Option<String>,
    images: Vec<String>,
    active: bool,
}

fn clean(input: ProductInput) -> Result<CleanProduct, StoreError> {
    let title = input.title.trim().to_owned();
    if title.is_empty() {
        return Err(StoreError::Validation("title is required".into()));
    }
    let code = trimmed(input.code);
    let price_text = trimmed(input.price_text);
    let cta_label = trimmed(input.cta_label);
    let cta_href = trimmed(input.cta_href);
    let file_url = trimmed(input.file_url);

    check_len("code", code.as_deref())?;
    check_len("title", Some(&title))?;
    check_len("price_text", price_text.as_deref())?;
    check_len("cta_label", cta_label.as_deref())?;
    check_len("cta_href", cta_href.as_deref())?;
    check_len("file_url", file_url.as_deref())?;

    Ok(CleanProduct {
        code,
        title,
        description: trimmed(input.description),
        price_cents: price_text.as_deref().map_or(0, parse_price_to_cents),
        price_text,
        cta_label,
        cta_href,
        file_url,
        images: input
            .images
            .into_iter()
            .map(|i| i.trim().to_owned())
            .filter(|i| !i.is_empty())
            .collect(),
        active: input.active,
    })
}

// ── Dashboard ────────────────────────────────────────────────────────────────

/// Orders shown on the admin dashboard.
pub const DASHBOARD_ORDERS: u64 = 5;

pub struct AdminDashboard {
    pub active: Vec<Product>,
    pub paused: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

pub struct AdminDashboardUseCase<P, O>
where
    P: ProductRepository,
    O: OrderRepository,
{
    pub products: P,
    pub orders: O,
}

impl<P, O> AdminDashboardUseCase<P, O>
where
    P: ProductRepository,
    O: OrderRepository,
{
    pub async fn execute(&self) -> Result<AdminDashboard, StoreError> {
        let (active, paused) = self
            .products
            .list_all()
            .await?
            .into_iter()
            .partition(|p| p.active);
        Ok(AdminDashboard {
            active,
            paused,
            recent_orders: self.orders.list_recent(DASHBOARD_ORDERS).await?,
        })
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct AdminListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> AdminListProductsUseCase<P> {
    pub async fn execute(&self, active: Option<bool>) -> Result<Vec<Product>, StoreError> {
        match active {
            Some(active) => self.products.list_by_active(active).await,
            None => self.products.list_all().await,
        }
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> CreateProductUseCase<P> {
    pub async fn execute(&self, input: ProductInput) -> Result<Product, StoreError> {
        let clean = clean(input)?;
        let code = clean.code.unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.products.find_by_code(&code).await?.is_some() {
            return Err(StoreError::ProductCodeTaken);
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            code,
            title: clean.title,
            description: clean.description,
            price_text: clean.price_text,
            price_cents: clean.price_cents,
            images: clean.images,
            cta_label: clean.cta_label,
            cta_href: clean.cta_href,
            file_url: clean.file_url,
            active: clean.active,
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await?;
        tracing::info!(code = %product.code, "product created");
        Ok(product)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> UpdateProductUseCase<P> {
    pub async fn execute(&self, code: &str, input: ProductInput) -> Result<Product, StoreError> {
        let existing = self
            .products
            .find_by_code(code)
            .await?
            .ok_or(StoreError::NotFound)?;
        let clean = clean(input)?;

        let code = match clean.code {
            Some(new_code) if new_code != existing.code => {
                if self.products.find_by_code(&new_code).await?.is_some() {
                    return Err(StoreError::ProductCodeTaken);
                }
                new_code
            }
            _ => existing.code.clone(),
        };

        let product = Product {
            code,
            title: clean.title,
            description: clean.description,
            price_text: clean.price_text,
            price_cents: clean.price_cents,
            images: clean.images,
            cta_label: clean.cta_label,
            cta_href: clean.cta_href,
            file_url: clean.file_url,
            active: clean.active,
            updated_at: Utc::now(),
            ..existing
        };
        self.products.update(&product).await?;
        Ok(product)
    }
}

// ── Toggle ───────────────────────────────────────────────────────────────────

pub struct ToggleProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ToggleProductUseCase<P> {
    /// Flip `active` and return the new value.
    pub async fn execute(&self, code: &str) -> Result<bool, StoreError> {
        let product = self
            .products
            .find_by_code(code)
            .await?
            .ok_or(StoreError::NotFound)?;
        let active = !product.active;
        self.products.set_active(product.id, active).await?;
        Ok(active)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> DeleteProductUseCase<P> {
    pub async fn execute(&self, code: &str) -> Result<(), StoreError> {
        let product = self
            .products
            .find_by_code(code)
            .await?
            .ok_or(StoreError::NotFound)?;
        if !self.products.delete(product.id).await? {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
