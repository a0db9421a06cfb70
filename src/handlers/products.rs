//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{Product, CATEGORIES};
use crate::services::product::{CreateProductInput, ProductService, UpdateProductInput};
use crate::AppState;

/// List the catalog ordered by description
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list().await?;
    Ok(Json(products))
}

/// Fetch one product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Register a product and its initial stock entry
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db);
    let product = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Edit a product; quantity is not part of this surface
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .update(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Remove a product and its movement history
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(current_user.0.user_id, product_id).await?;
    Ok(Json(()))
}

/// Category choices offered to the presentation layer
pub async fn list_categories() -> Json<Vec<&'static str>> {
    Json(CATEGORIES.to_vec())
}
