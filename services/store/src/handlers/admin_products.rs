use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use vitrine_auth_types::identity::AdminSession;

use crate::error::StoreError;
use crate::handlers::response::AdminProductResponse;
use crate::state::AppState;
use crate::usecase::admin_products::{
    AdminListProductsUseCase, CreateProductUseCase, DeleteProductUseCase, ProductInput,
    ToggleProductUseCase, UpdateProductUseCase,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub code: Option<String>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub price_text: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub file_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ProductRequest> for ProductInput {
    fn from(r: ProductRequest) -> Self {
        Self {
            code: r.code,
            title: r.title,
            description: r.description,
            price_text: r.price_text,
            cta_label: r.cta_label,
            cta_href: r.cta_href,
            file_url: r.file_url,
            images: r.images,
            active: r.active,
        }
    }
}

// ── GET /admin/products ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListProductsQuery {
    pub active: Option<bool>,
}

pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<AdminProductResponse>>, StoreError> {
    let usecase = AdminListProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute(query.active).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── POST /admin/products ─────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    WithRejection(Json(body), _): WithRejection<Json<ProductRequest>, StoreError>,
) -> Result<(StatusCode, Json<AdminProductResponse>), StoreError> {
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase.execute(body.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PUT /admin/products/{code} ───────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(code): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<ProductRequest>, StoreError>,
) -> Result<Json<AdminProductResponse>, StoreError> {
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase.execute(&code, body.into()).await?;
    Ok(Json(product.into()))
}

// ── POST /admin/products/{code}/toggle ───────────────────────────────────────

#[derive(Serialize)]
pub struct ToggleResponse {
    pub active: bool,
}

pub async fn toggle_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(code): Path<String>,
) -> Result<Json<ToggleResponse>, StoreError> {
    let usecase = ToggleProductUseCase {
        products: state.product_repo(),
    };
    let active = usecase.execute(&code).await?;
    Ok(Json(ToggleResponse { active }))
}

// ── DELETE /admin/products/{code} ────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(code): Path<String>,
) -> Result<StatusCode, StoreError> {
    let usecase = DeleteProductUseCase {
        products: state.product_repo(),
    };
    usecase.execute(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
