//! HTTP handlers for inventory reporting

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::Product;
use crate::services::report::{InventoryOverview, ReportService};
use crate::AppState;

#[derive(Serialize)]
pub struct ValuationResponse {
    pub total_value: f64,
}

/// Total inventory valuation
pub async fn inventory_valuation(
    State(state): State<AppState>,
) -> AppResult<Json<ValuationResponse>> {
    let service = ReportService::new(state.db);
    let total_value = service.total_inventory_value().await?;
    Ok(Json(ValuationResponse { total_value }))
}

/// Products at or below their minimum stock
pub async fn low_stock_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ReportService::new(state.db);
    let products = service.low_stock_products().await?;
    Ok(Json(products))
}

/// Catalog, valuation and low-stock summary in one call
pub async fn inventory_overview(
    State(state): State<AppState>,
) -> AppResult<Json<InventoryOverview>> {
    let service = ReportService::new(state.db);
    let overview = service.overview().await?;
    Ok(Json(overview))
}
