use std::sync::Arc;

use axum::{extract::State, Json};
use contracts::dashboards::sales::HealthResponse;

use crate::shared::data::store::DataStore;

/// GET /api/health
///
/// Liveness probe. The store is only reachable here after a successful
/// load, so a 200 also means the dataset is ready.
pub async fn health_check(State(store): State<Arc<DataStore>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Superstore Insights API is running".to_string(),
        rows: store.len(),
        loaded_at: store.loaded_at(),
    })
}
