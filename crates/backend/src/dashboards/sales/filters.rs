use chrono::NaiveDate;
use contracts::dashboards::sales::SalesFilter;
use thiserror::Error;

use crate::shared::data::store::{DataStore, OrderRecord};

/// Rejection reasons detected at the engine boundary, before any
/// aggregation runs.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid {field}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid date range: start_date {start} is after end_date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("aggregation produced an unexpected result shape")]
    ShapeMismatch,
}

impl QueryError {
    /// Errors the caller can fix map to a client-error response.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, QueryError::ShapeMismatch)
    }
}

/// A `SalesFilter` with its date strings parsed and its range validated
#[derive(Debug, Clone, Default)]
pub struct ResolvedFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub categories: Vec<String>,
}

/// Validate the wire filter. Malformed dates and inverted ranges are
/// rejected here with a descriptive reason, never silently corrected.
pub fn resolve(filter: &SalesFilter) -> Result<ResolvedFilter, QueryError> {
    let start_date = parse_bound("start_date", filter.start_date.as_deref())?;
    let end_date = parse_bound("end_date", filter.end_date.as_deref())?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(QueryError::InvalidRange { start, end });
        }
    }

    Ok(ResolvedFilter {
        start_date,
        end_date,
        regions: filter.regions.clone(),
        segments: filter.segments.clone(),
        categories: filter.categories.clone(),
    })
}

fn parse_bound(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, QueryError> {
    match raw {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

/// Select the records matching every active constraint.
///
/// Pure and order-stable: the result preserves the store's record order,
/// and identical inputs always yield the identical subset. An empty
/// dimension vector imposes no constraint; an unknown value simply matches
/// zero records. Date bounds are inclusive.
pub fn apply<'a>(store: &'a DataStore, filter: &ResolvedFilter) -> Vec<&'a OrderRecord> {
    store
        .records()
        .iter()
        .filter(|r| matches(r, filter))
        .collect()
}

fn matches(record: &OrderRecord, filter: &ResolvedFilter) -> bool {
    if let Some(start) = filter.start_date {
        if record.order_date < start {
            return false;
        }
    }
    if let Some(end) = filter.end_date {
        if record.order_date > end {
            return false;
        }
    }
    in_set(&filter.regions, &record.region)
        && in_set(&filter.segments, &record.segment)
        && in_set(&filter.categories, &record.category)
}

/// Empty set means "unfiltered on this dimension", not "exclude all"
fn in_set(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|v| v == value)
}
