//! Route definitions for the inventory backend

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - product catalog (also the read-only JSON API)
        .nest("/products", product_routes(state.clone()))
        // Protected routes - stock movement ledger
        .nest("/movements", movement_routes(state.clone()))
        // Protected routes - inventory reporting
        .nest("/reports", report_routes(state))
}

/// Authentication routes; login stays public, it is how an actor obtains a
/// token in the first place.
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route("/password", put(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .route("/login", post(handlers::login))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Movement ledger routes (protected)
fn movement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Reporting routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/overview", get(handlers::inventory_overview))
        .route("/valuation", get(handlers::inventory_valuation))
        .route("/low-stock", get(handlers::low_stock_products))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
