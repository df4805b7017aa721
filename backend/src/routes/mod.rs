//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppState;

/// All /api/v1 routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/stock-movements", movement_routes())
        .nest("/purchase-orders", purchase_order_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/companies", company_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/alerts", alert_routes())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::product::list).post(handlers::product::create))
        .route(
            "/:id",
            get(handlers::product::get)
                .put(handlers::product::update)
                .delete(handlers::product::delete),
        )
        .route("/:id/adjust-stock", post(handlers::product::adjust_stock))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list).post(handlers::category::create),
        )
        .route("/tree", get(handlers::category::tree))
        .route(
            "/:id",
            get(handlers::category::get)
                .put(handlers::category::update)
                .delete(handlers::category::delete),
        )
        .route(
            "/:id/assignable-parents",
            get(handlers::category::assignable_parents),
        )
}

fn movement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::movement::list).post(handlers::movement::create),
        )
        .route("/:id", get(handlers::movement::get))
}

fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::purchase_order::list).post(handlers::purchase_order::create),
        )
        .route(
            "/:id",
            get(handlers::purchase_order::get)
                .put(handlers::purchase_order::update)
                .delete(handlers::purchase_order::delete),
        )
        .route("/:id/totals", get(handlers::purchase_order::totals))
        .route(
            "/:id/items",
            get(handlers::purchase_order::list_items)
                .post(handlers::purchase_order::create_item),
        )
        .route(
            "/:id/items/:item_id",
            axum::routing::put(handlers::purchase_order::update_item)
                .delete(handlers::purchase_order::delete_item),
        )
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::supplier::list).post(handlers::supplier::create),
        )
        .route(
            "/:id",
            get(handlers::supplier::get)
                .put(handlers::supplier::update)
                .delete(handlers::supplier::delete),
        )
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::company::list).post(handlers::company::create),
        )
        .route(
            "/:id",
            get(handlers::company::get)
                .put(handlers::company::update)
                .delete(handlers::company::delete),
        )
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::dashboard::stats))
        .route(
            "/recent-movements",
            get(handlers::dashboard::recent_movements),
        )
}

fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/low-stock", get(handlers::alert::low_stock))
        .route("/low-stock/send", post(handlers::alert::send))
}
