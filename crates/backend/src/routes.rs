use std::sync::Arc;

use axum::{routing::get, Router};

use crate::api::handlers;
use crate::shared::data::store::DataStore;

/// Wire every route to its handler. The loaded store is injected as shared
/// state so handlers never touch a global.
pub fn configure_routes(store: Arc<DataStore>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        // Sales analytics
        .route(
            "/api/sales/filter-options",
            get(handlers::sales::filter_options),
        )
        .route("/api/sales/overview", get(handlers::sales::overview))
        .route("/api/sales/by-category", get(handlers::sales::by_category))
        .route("/api/sales/by-region", get(handlers::sales::by_region))
        .route("/api/sales/trends", get(handlers::sales::trends))
        .route(
            "/api/sales/profit-analysis",
            get(handlers::sales::profit_analysis),
        )
        .route(
            "/api/sales/segment-analysis",
            get(handlers::sales::segment_analysis),
        )
        .route("/api/sales/geo-sales", get(handlers::sales::geo_sales))
        .with_state(store)
}
