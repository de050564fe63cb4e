use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Query;
use contracts::dashboards::sales::{
    CategorySales, ChartResponse, FilterOptions, OverviewMetrics, RegionSales, SalesFilter,
    SegmentSales, StateSales, SubCategoryProfit, TrendPoint,
};

use crate::dashboards::sales::filters::QueryError;
use crate::dashboards::sales::service;
use crate::shared::data::store::DataStore;

/// Map engine rejections to HTTP: validation problems become 400 with the
/// reason text, everything else is a 500.
fn reject(err: QueryError) -> (StatusCode, String) {
    if err.is_client_error() {
        tracing::warn!("Sales: query rejected: {err}");
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        tracing::error!("Sales: query failed: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    }
}

/// GET /api/sales/filter-options
///
/// Always answers from the full dataset, independent of any filter the
/// caller has applied elsewhere.
pub async fn filter_options(State(store): State<Arc<DataStore>>) -> Json<FilterOptions> {
    Json(service::filter_options(&store))
}

/// GET /api/sales/overview?start_date=...&regions=West&regions=East
pub async fn overview(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<OverviewMetrics>, (StatusCode, String)> {
    service::overview(&store, &filter).map(Json).map_err(reject)
}

/// GET /api/sales/by-category
pub async fn by_category(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<CategorySales>>, (StatusCode, String)> {
    service::by_category(&store, &filter)
        .map(Json)
        .map_err(reject)
}

/// GET /api/sales/by-region
pub async fn by_region(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<RegionSales>>, (StatusCode, String)> {
    service::by_region(&store, &filter)
        .map(Json)
        .map_err(reject)
}

/// GET /api/sales/trends
pub async fn trends(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<TrendPoint>>, (StatusCode, String)> {
    service::trends(&store, &filter).map(Json).map_err(reject)
}

/// GET /api/sales/profit-analysis
pub async fn profit_analysis(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<SubCategoryProfit>>, (StatusCode, String)> {
    service::profit_analysis(&store, &filter)
        .map(Json)
        .map_err(reject)
}

/// GET /api/sales/segment-analysis
pub async fn segment_analysis(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<SegmentSales>>, (StatusCode, String)> {
    service::segment_analysis(&store, &filter)
        .map(Json)
        .map_err(reject)
}

/// GET /api/sales/geo-sales
pub async fn geo_sales(
    State(store): State<Arc<DataStore>>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ChartResponse<StateSales>>, (StatusCode, String)> {
    service::geo_sales(&store, &filter)
        .map(Json)
        .map_err(reject)
}
