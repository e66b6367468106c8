use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::StoreError;
use crate::handlers::response::ProductResponse;
use crate::state::AppState;
use crate::usecase::catalog::{GetProductUseCase, ListProductsUseCase};

// ── GET /products ────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, StoreError> {
    let usecase = ListProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /products/{code} ─────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ProductResponse>, StoreError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
    };
    Ok(Json(usecase.execute(&code).await?.into()))
}
