use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;

/// State name -> two-letter postal code, used to key the choropleth view
static STATE_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Alabama", "AL"),
        ("Alaska", "AK"),
        ("Arizona", "AZ"),
        ("Arkansas", "AR"),
        ("California", "CA"),
        ("Colorado", "CO"),
        ("Connecticut", "CT"),
        ("Delaware", "DE"),
        ("Florida", "FL"),
        ("Georgia", "GA"),
        ("Hawaii", "HI"),
        ("Idaho", "ID"),
        ("Illinois", "IL"),
        ("Indiana", "IN"),
        ("Iowa", "IA"),
        ("Kansas", "KS"),
        ("Kentucky", "KY"),
        ("Louisiana", "LA"),
        ("Maine", "ME"),
        ("Maryland", "MD"),
        ("Massachusetts", "MA"),
        ("Michigan", "MI"),
        ("Minnesota", "MN"),
        ("Mississippi", "MS"),
        ("Missouri", "MO"),
        ("Montana", "MT"),
        ("Nebraska", "NE"),
        ("Nevada", "NV"),
        ("New Hampshire", "NH"),
        ("New Jersey", "NJ"),
        ("New Mexico", "NM"),
        ("New York", "NY"),
        ("North Carolina", "NC"),
        ("North Dakota", "ND"),
        ("Ohio", "OH"),
        ("Oklahoma", "OK"),
        ("Oregon", "OR"),
        ("Pennsylvania", "PA"),
        ("Rhode Island", "RI"),
        ("South Carolina", "SC"),
        ("South Dakota", "SD"),
        ("Tennessee", "TN"),
        ("Texas", "TX"),
        ("Utah", "UT"),
        ("Vermont", "VT"),
        ("Virginia", "VA"),
        ("Washington", "WA"),
        ("West Virginia", "WV"),
        ("Wisconsin", "WI"),
        ("Wyoming", "WY"),
        ("District of Columbia", "DC"),
    ])
});

/// Look up the postal code for a state name. Empty string for unknown states.
pub fn state_code_for(state: &str) -> &'static str {
    STATE_CODES.get(state).copied().unwrap_or("")
}

/// One order line item, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub customer_id: String,
    pub segment: String,
    pub region: String,
    pub state: String,
    /// Two-letter code derived from `state` at load time, empty if unknown
    pub state_code: String,
    pub category: String,
    pub sub_category: String,
    pub sales: f64,
    pub quantity: u32,
    pub profit: f64,
}

/// CSV row as it appears in the Superstore export
#[derive(Debug, Deserialize)]
struct RawOrderRow {
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Segment")]
    segment: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub-Category")]
    sub_category: String,
    #[serde(rename = "Sales")]
    sales: f64,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Profit")]
    profit: f64,
}

impl RawOrderRow {
    fn into_record(self, line: u64) -> Result<OrderRecord> {
        let order_date = parse_order_date(&self.order_date)
            .with_context(|| format!("line {}: unparseable Order Date '{}'", line, self.order_date))?;
        if self.sales < 0.0 {
            bail!("line {}: negative Sales {}", line, self.sales);
        }
        if self.quantity == 0 {
            bail!("line {}: Quantity must be at least 1", line);
        }
        let state_code = state_code_for(&self.state).to_string();
        Ok(OrderRecord {
            order_id: self.order_id,
            order_date,
            customer_id: self.customer_id,
            segment: self.segment,
            region: self.region,
            state: self.state,
            state_code,
            category: self.category,
            sub_category: self.sub_category,
            sales: self.sales,
            quantity: self.quantity,
            profit: self.profit,
        })
    }
}

/// The dataset exports dates either as ISO or as US-style "M/D/YYYY"
fn parse_order_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(Into::into)
}

/// Immutable in-memory order dataset.
///
/// Loaded exactly once at startup and shared read-only with every request
/// handler via `Arc<DataStore>`. Distinct dimension values and the date
/// bounds are precomputed here so the filter-options view never has to
/// rescan the records.
#[derive(Debug)]
pub struct DataStore {
    records: Vec<OrderRecord>,
    min_date: NaiveDate,
    max_date: NaiveDate,
    regions: Vec<String>,
    segments: Vec<String>,
    categories: Vec<String>,
    loaded_at: DateTime<Utc>,
}

impl DataStore {
    /// Load and validate the dataset. Any failure here is startup-fatal:
    /// the process must not serve queries over a partial or invalid dataset.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open dataset at {}", path.display()))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut records = Vec::new();
        for row in reader.deserialize::<RawOrderRow>() {
            let line = records.len() as u64 + 2; // header is line 1
            let raw = row.with_context(|| format!("line {}: malformed CSV row", line))?;
            records.push(raw.into_record(line)?);
        }

        let store = Self::from_records(records)?;
        tracing::info!(
            "DataStore: loaded {} records, {} to {}",
            store.records.len(),
            store.min_date,
            store.max_date
        );
        Ok(store)
    }

    /// Build a store from already-parsed records, precomputing the
    /// dimension values and date bounds. Used by `load` and by tests
    /// with synthetic datasets.
    pub fn from_records(records: Vec<OrderRecord>) -> Result<Self> {
        let (min_date, max_date) = match (
            records.iter().map(|r| r.order_date).min(),
            records.iter().map(|r| r.order_date).max(),
        ) {
            (Some(min), Some(max)) => (min, max),
            _ => bail!("dataset contains no records"),
        };

        let mut regions = BTreeSet::new();
        let mut segments = BTreeSet::new();
        let mut categories = BTreeSet::new();
        for record in &records {
            regions.insert(record.region.clone());
            segments.insert(record.segment.clone());
            categories.insert(record.category.clone());
        }

        Ok(Self {
            records,
            min_date,
            max_date,
            regions: regions.into_iter().collect(),
            segments: segments.into_iter().collect(),
            categories: categories.into_iter().collect(),
            loaded_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// Distinct region names, sorted
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct segment names, sorted
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
