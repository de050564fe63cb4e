use contracts::dashboards::sales::{
    CategorySales, ChartResponse, FilterOptions, OverviewMetrics, RegionSales, SalesFilter,
    SegmentSales, StateSales, SubCategoryProfit, TrendPoint,
};
use contracts::shared::charts::ChartDescriptor;

use super::charts;
use super::filters::{self, QueryError};
use super::metrics::{self, AggregationResult, SalesView};
use crate::shared::data::store::DataStore;

/// Run one view end to end: validate the filter, select the matching rows,
/// aggregate, build the chart. Every endpoint goes through this single path
/// so the views can never drift apart.
fn run(
    store: &DataStore,
    filter: &SalesFilter,
    view: SalesView,
) -> Result<(AggregationResult, Option<ChartDescriptor>), QueryError> {
    let resolved = filters::resolve(filter)?;
    let rows = filters::apply(store, &resolved);
    let result = metrics::aggregate(view, &rows, store);
    let chart = charts::build_chart(&result);
    Ok((result, chart))
}

pub fn overview(store: &DataStore, filter: &SalesFilter) -> Result<OverviewMetrics, QueryError> {
    match run(store, filter, SalesView::Overview)? {
        (AggregationResult::Overview(metrics), _) => Ok(metrics),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn by_category(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<CategorySales>, QueryError> {
    match run(store, filter, SalesView::ByCategory)? {
        (AggregationResult::ByCategory(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn by_region(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<RegionSales>, QueryError> {
    match run(store, filter, SalesView::ByRegion)? {
        (AggregationResult::ByRegion(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn trends(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<TrendPoint>, QueryError> {
    match run(store, filter, SalesView::Trends)? {
        (AggregationResult::Trends(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn profit_analysis(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<SubCategoryProfit>, QueryError> {
    match run(store, filter, SalesView::ProfitAnalysis)? {
        (AggregationResult::ProfitAnalysis(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn segment_analysis(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<SegmentSales>, QueryError> {
    match run(store, filter, SalesView::BySegment)? {
        (AggregationResult::BySegment(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

pub fn geo_sales(
    store: &DataStore,
    filter: &SalesFilter,
) -> Result<ChartResponse<StateSales>, QueryError> {
    match run(store, filter, SalesView::GeoSales)? {
        (AggregationResult::GeoSales(data), Some(chart)) => Ok(ChartResponse { data, chart }),
        _ => Err(QueryError::ShapeMismatch),
    }
}

/// Filter-options ignores the caller's filter by contract: the UI needs
/// every valid choice no matter what is currently selected.
pub fn filter_options(store: &DataStore) -> FilterOptions {
    metrics::filter_options(store)
}
