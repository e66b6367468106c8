use crate::domain::repository::ProductRepository;
use crate::domain::types::Product;
use crate::error::StoreError;

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<Product>, StoreError> {
        self.products.list_by_active(true).await
    }
}

// ── Show ─────────────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    /// Paused products are hidden from the storefront.
    pub async fn execute(&self, code: &str) -> Result<Product, StoreError> {
        self.products
            .find_by_code(code)
            .await?
            .filter(|p| p.active)
            .ok_or(StoreError::NotFound)
    }
}
