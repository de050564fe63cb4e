use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::charts::ChartDescriptor;

/// Global filter accepted by every sales query.
///
/// Dates travel as ISO `YYYY-MM-DD` strings; the set-valued dimensions are
/// repeated query parameters (`regions=West&regions=East`). An empty vector
/// means "no restriction on this dimension" — it is never interpreted as
/// "match nothing".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesFilter {
    /// Include orders on or after this date
    pub start_date: Option<String>,
    /// Include orders on or before this date
    pub end_date: Option<String>,
    /// Regions to include (empty = all)
    #[serde(default)]
    pub regions: Vec<String>,
    /// Customer segments to include (empty = all)
    #[serde(default)]
    pub segments: Vec<String>,
    /// Product categories to include (empty = all)
    #[serde(default)]
    pub categories: Vec<String>,
}

impl SalesFilter {
    /// True when no dimension carries a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.regions.is_empty()
            && self.segments.is_empty()
            && self.categories.is_empty()
    }
}

/// High-level KPIs for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Distinct order count
    pub total_orders: u64,
    /// Distinct customer count
    pub total_customers: u64,
    /// total_sales / total_orders, 0 when there are no orders
    pub avg_order_value: f64,
    /// total_profit / total_sales in percent, 0 when sales are 0
    pub profit_margin: f64,
}

/// One row of the by-category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: u64,
}

/// One row of the by-region breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSales {
    pub region: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: u64,
}

/// One calendar-month bucket of the trends view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month bucket in format "YYYY-MM"
    pub month: String,
    pub sales: f64,
    pub profit: f64,
    pub orders: u64,
}

/// One (category, sub-category) row of the profit analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryProfit {
    pub category: String,
    pub sub_category: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: u64,
    /// profit / sales in percent, 0 when sales are 0
    pub profit_margin: f64,
}

/// One row of the customer-segment breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSales {
    pub segment: String,
    pub sales: f64,
    pub profit: f64,
    pub customers: u64,
    pub orders: u64,
}

/// One state row for the choropleth map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSales {
    /// Human-readable state name
    pub state: String,
    /// Two-letter state code
    pub state_code: String,
    pub sales: f64,
    pub profit: f64,
    pub orders: u64,
}

/// Inclusive date bounds of the loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    /// Earliest order date, serialized as "YYYY-MM-DD"
    pub min: NaiveDate,
    /// Latest order date, serialized as "YYYY-MM-DD"
    pub max: NaiveDate,
}

/// Valid filter choices, always derived from the full dataset
/// regardless of any currently-applied filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub categories: Vec<String>,
    pub date_range: DateBounds,
}

/// Tabular data plus its chart-ready descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse<T> {
    pub data: Vec<T>,
    pub chart: ChartDescriptor,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Number of order records currently loaded
    pub rows: usize,
    /// When the dataset was loaded
    pub loaded_at: DateTime<Utc>,
}
