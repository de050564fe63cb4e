use std::collections::{BTreeMap, HashSet};

use contracts::dashboards::sales::{
    CategorySales, DateBounds, FilterOptions, OverviewMetrics, RegionSales, SegmentSales,
    StateSales, SubCategoryProfit, TrendPoint,
};

use crate::shared::data::store::{DataStore, OrderRecord};

/// The seven supported query views, dispatched through one engine so every
/// view derives from the same filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesView {
    Overview,
    ByCategory,
    ByRegion,
    Trends,
    ProfitAnalysis,
    BySegment,
    GeoSales,
    FilterOptions,
}

/// Result of running one view over a filtered subset
#[derive(Debug, Clone)]
pub enum AggregationResult {
    Overview(OverviewMetrics),
    ByCategory(Vec<CategorySales>),
    ByRegion(Vec<RegionSales>),
    Trends(Vec<TrendPoint>),
    ProfitAnalysis(Vec<SubCategoryProfit>),
    BySegment(Vec<SegmentSales>),
    GeoSales(Vec<StateSales>),
    FilterOptions(FilterOptions),
}

/// Compute one view. `rows` is the already-filtered subset; the store is
/// only consulted for filter-options, which is always computed from the
/// full dataset regardless of the caller's filter.
pub fn aggregate(view: SalesView, rows: &[&OrderRecord], store: &DataStore) -> AggregationResult {
    match view {
        SalesView::Overview => AggregationResult::Overview(overview(rows)),
        SalesView::ByCategory => AggregationResult::ByCategory(by_category(rows)),
        SalesView::ByRegion => AggregationResult::ByRegion(by_region(rows)),
        SalesView::Trends => AggregationResult::Trends(trends(rows)),
        SalesView::ProfitAnalysis => AggregationResult::ProfitAnalysis(profit_analysis(rows)),
        SalesView::BySegment => AggregationResult::BySegment(segment_analysis(rows)),
        SalesView::GeoSales => AggregationResult::GeoSales(geo_sales(rows)),
        SalesView::FilterOptions => AggregationResult::FilterOptions(filter_options(store)),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Running totals for one grouping key
#[derive(Default)]
struct GroupAcc<'a> {
    sales: f64,
    profit: f64,
    quantity: u64,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
}

impl<'a> GroupAcc<'a> {
    fn add(&mut self, record: &'a OrderRecord) {
        self.sales += record.sales;
        self.profit += record.profit;
        self.quantity += u64::from(record.quantity);
        self.orders.insert(record.order_id.as_str());
        self.customers.insert(record.customer_id.as_str());
    }
}

fn group_by<'a, K: Ord>(
    rows: &[&'a OrderRecord],
    key: impl Fn(&'a OrderRecord) -> K,
) -> BTreeMap<K, GroupAcc<'a>> {
    let mut groups: BTreeMap<K, GroupAcc<'a>> = BTreeMap::new();
    for &record in rows {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

pub fn overview(rows: &[&OrderRecord]) -> OverviewMetrics {
    let total_sales: f64 = rows.iter().map(|r| r.sales).sum();
    let total_profit: f64 = rows.iter().map(|r| r.profit).sum();
    let orders: HashSet<&str> = rows.iter().map(|r| r.order_id.as_str()).collect();
    let customers: HashSet<&str> = rows.iter().map(|r| r.customer_id.as_str()).collect();
    let total_orders = orders.len() as u64;

    let avg_order_value = if total_orders > 0 {
        total_sales / total_orders as f64
    } else {
        0.0
    };
    let profit_margin = if total_sales > 0.0 {
        total_profit / total_sales * 100.0
    } else {
        0.0
    };

    OverviewMetrics {
        total_sales: round2(total_sales),
        total_profit: round2(total_profit),
        total_orders,
        total_customers: customers.len() as u64,
        avg_order_value: round2(avg_order_value),
        profit_margin: round2(profit_margin),
    }
}

pub fn by_category(rows: &[&OrderRecord]) -> Vec<CategorySales> {
    let mut result: Vec<CategorySales> = group_by(rows, |r| r.category.clone())
        .into_iter()
        .map(|(category, acc)| CategorySales {
            category,
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            quantity: acc.quantity,
            orders: acc.orders.len() as u64,
        })
        .collect();
    result.sort_by(|a, b| {
        b.sales
            .partial_cmp(&a.sales)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    result
}

pub fn by_region(rows: &[&OrderRecord]) -> Vec<RegionSales> {
    let mut result: Vec<RegionSales> = group_by(rows, |r| r.region.clone())
        .into_iter()
        .map(|(region, acc)| RegionSales {
            region,
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            quantity: acc.quantity,
            orders: acc.orders.len() as u64,
        })
        .collect();
    result.sort_by(|a, b| {
        b.sales
            .partial_cmp(&a.sales)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    result
}

/// Month buckets come out of the BTreeMap already chronological because
/// "YYYY-MM" sorts lexicographically in date order.
pub fn trends(rows: &[&OrderRecord]) -> Vec<TrendPoint> {
    group_by(rows, |r| r.order_date.format("%Y-%m").to_string())
        .into_iter()
        .map(|(month, acc)| TrendPoint {
            month,
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            orders: acc.orders.len() as u64,
        })
        .collect()
}

pub fn profit_analysis(rows: &[&OrderRecord]) -> Vec<SubCategoryProfit> {
    group_by(rows, |r| (r.category.clone(), r.sub_category.clone()))
        .into_iter()
        .map(|((category, sub_category), acc)| {
            let profit_margin = if acc.sales != 0.0 {
                round2(acc.profit / acc.sales * 100.0)
            } else {
                0.0
            };
            SubCategoryProfit {
                category,
                sub_category,
                sales: round2(acc.sales),
                profit: round2(acc.profit),
                quantity: acc.quantity,
                profit_margin,
            }
        })
        .collect()
}

pub fn segment_analysis(rows: &[&OrderRecord]) -> Vec<SegmentSales> {
    let mut result: Vec<SegmentSales> = group_by(rows, |r| r.segment.clone())
        .into_iter()
        .map(|(segment, acc)| SegmentSales {
            segment,
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            customers: acc.customers.len() as u64,
            orders: acc.orders.len() as u64,
        })
        .collect();
    result.sort_by(|a, b| {
        b.sales
            .partial_cmp(&a.sales)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    result
}

/// States without a known two-letter code are skipped: the map renderer
/// cannot place them anyway.
pub fn geo_sales(rows: &[&OrderRecord]) -> Vec<StateSales> {
    group_by(rows, |r| (r.state.clone(), r.state_code.clone()))
        .into_iter()
        .filter(|((_, code), _)| !code.is_empty())
        .map(|((state, state_code), acc)| StateSales {
            state,
            state_code,
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            orders: acc.orders.len() as u64,
        })
        .collect()
}

/// Always computed from the full store so the UI can offer every valid
/// choice regardless of the currently-applied filter.
pub fn filter_options(store: &DataStore) -> FilterOptions {
    FilterOptions {
        regions: store.regions().to_vec(),
        segments: store.segments().to_vec(),
        categories: store.categories().to_vec(),
        date_range: DateBounds {
            min: store.min_date(),
            max: store.max_date(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Seed {
        order_id: &'static str,
        date: &'static str,
        customer_id: &'static str,
        segment: &'static str,
        region: &'static str,
        state: &'static str,
        category: &'static str,
        sub_category: &'static str,
        sales: f64,
        quantity: u32,
        profit: f64,
    }

    fn build(seed: Seed) -> OrderRecord {
        let state_code = crate::shared::data::store::state_code_for(seed.state).to_string();
        OrderRecord {
            order_id: seed.order_id.to_string(),
            order_date: NaiveDate::parse_from_str(seed.date, "%Y-%m-%d").unwrap(),
            customer_id: seed.customer_id.to_string(),
            segment: seed.segment.to_string(),
            region: seed.region.to_string(),
            state: seed.state.to_string(),
            state_code,
            category: seed.category.to_string(),
            sub_category: seed.sub_category.to_string(),
            sales: seed.sales,
            quantity: seed.quantity,
            profit: seed.profit,
        }
    }

    /// The two records from the acceptance scenario
    fn scenario_records() -> Vec<OrderRecord> {
        vec![
            build(Seed {
                order_id: "O1",
                date: "2016-03-05",
                customer_id: "C1",
                segment: "Consumer",
                region: "West",
                state: "California",
                category: "Furniture",
                sub_category: "Chairs",
                sales: 100.0,
                quantity: 2,
                profit: 20.0,
            }),
            build(Seed {
                order_id: "O2",
                date: "2016-07-10",
                customer_id: "C2",
                segment: "Corporate",
                region: "East",
                state: "New York",
                category: "Technology",
                sub_category: "Phones",
                sales: 300.0,
                quantity: 1,
                profit: -10.0,
            }),
        ]
    }

    fn refs(records: &[OrderRecord]) -> Vec<&OrderRecord> {
        records.iter().collect()
    }

    #[test]
    fn test_overview_concrete_scenario() {
        let records = scenario_records();
        let metrics = overview(&refs(&records));
        assert_eq!(metrics.total_sales, 400.0);
        assert_eq!(metrics.total_profit, 10.0);
        assert_eq!(metrics.total_orders, 2);
        assert_eq!(metrics.total_customers, 2);
        assert_eq!(metrics.avg_order_value, 200.0);
        assert_eq!(metrics.profit_margin, 2.5);
    }

    #[test]
    fn test_overview_empty_subset_is_all_zero() {
        let metrics = overview(&[]);
        assert_eq!(metrics.total_sales, 0.0);
        assert_eq!(metrics.total_profit, 0.0);
        assert_eq!(metrics.total_orders, 0);
        assert_eq!(metrics.total_customers, 0);
        assert_eq!(metrics.avg_order_value, 0.0);
        assert_eq!(metrics.profit_margin, 0.0);
    }

    #[test]
    fn test_overview_counts_distinct_orders() {
        // Two line items of the same order
        let mut records = scenario_records();
        records[1].order_id = "O1".to_string();
        records[1].customer_id = "C1".to_string();
        let metrics = overview(&refs(&records));
        assert_eq!(metrics.total_orders, 1);
        assert_eq!(metrics.total_customers, 1);
        assert_eq!(metrics.avg_order_value, 400.0);
    }

    #[test]
    fn test_by_category_sorted_by_descending_sales() {
        let records = scenario_records();
        let result = by_category(&refs(&records));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, "Technology");
        assert_eq!(result[0].sales, 300.0);
        assert_eq!(result[1].category, "Furniture");
        assert_eq!(result[1].quantity, 2);
    }

    #[test]
    fn test_category_totals_match_overview() {
        let records = scenario_records();
        let rows = refs(&records);
        let total: f64 = by_category(&rows).iter().map(|c| c.sales).sum();
        assert_eq!(total, overview(&rows).total_sales);
    }

    #[test]
    fn test_region_and_segment_totals_match_overview() {
        let records = scenario_records();
        let rows = refs(&records);
        let by_region_total: f64 = by_region(&rows).iter().map(|r| r.sales).sum();
        let by_segment_total: f64 = segment_analysis(&rows).iter().map(|s| s.sales).sum();
        let expected = overview(&rows).total_sales;
        assert_eq!(by_region_total, expected);
        assert_eq!(by_segment_total, expected);
    }

    #[test]
    fn test_trends_chronological_with_only_populated_months() {
        let records = scenario_records();
        let result = trends(&refs(&records));
        let months: Vec<&str> = result.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(months, ["2016-03", "2016-07"]);
        assert_eq!(result[0].sales, 100.0);
        assert_eq!(result[1].orders, 1);
    }

    #[test]
    fn test_profit_analysis_margin_and_zero_sales_guard() {
        let mut records = scenario_records();
        records.push(build(Seed {
            order_id: "O3",
            date: "2016-08-01",
            customer_id: "C3",
            segment: "Consumer",
            region: "West",
            state: "California",
            category: "Furniture",
            sub_category: "Tables",
            sales: 0.0,
            quantity: 1,
            profit: -5.0,
        }));
        let result = profit_analysis(&refs(&records));
        // BTreeMap order: (Furniture, Chairs), (Furniture, Tables), (Technology, Phones)
        assert_eq!(result[0].sub_category, "Chairs");
        assert_eq!(result[0].profit_margin, 20.0);
        assert_eq!(result[1].sub_category, "Tables");
        assert_eq!(result[1].profit_margin, 0.0);
        assert_eq!(result[2].sub_category, "Phones");
        assert!((result[2].profit_margin - (-3.33)).abs() < 1e-9);
    }

    #[test]
    fn test_segment_analysis_counts_distinct_customers() {
        let mut records = scenario_records();
        records.push(build(Seed {
            order_id: "O3",
            date: "2016-09-01",
            customer_id: "C1",
            segment: "Consumer",
            region: "West",
            state: "California",
            category: "Furniture",
            sub_category: "Chairs",
            sales: 50.0,
            quantity: 1,
            profit: 5.0,
        }));
        let result = segment_analysis(&refs(&records));
        let consumer = result.iter().find(|s| s.segment == "Consumer").unwrap();
        assert_eq!(consumer.customers, 1);
        assert_eq!(consumer.orders, 2);
        assert_eq!(consumer.sales, 150.0);
    }

    #[test]
    fn test_geo_sales_skips_unknown_state() {
        let mut records = scenario_records();
        records.push(build(Seed {
            order_id: "O3",
            date: "2016-09-01",
            customer_id: "C3",
            segment: "Consumer",
            region: "West",
            state: "Atlantis",
            category: "Furniture",
            sub_category: "Chairs",
            sales: 50.0,
            quantity: 1,
            profit: 5.0,
        }));
        let result = geo_sales(&refs(&records));
        let codes: Vec<&str> = result.iter().map(|s| s.state_code.as_str()).collect();
        assert_eq!(codes, ["CA", "NY"]);
        assert_eq!(result[0].state, "California");
    }

    #[test]
    fn test_filter_options_come_from_full_store() {
        let store = DataStore::from_records(scenario_records()).unwrap();
        let options = filter_options(&store);
        assert_eq!(options.regions, ["East", "West"]);
        assert_eq!(options.segments, ["Consumer", "Corporate"]);
        assert_eq!(options.categories, ["Furniture", "Technology"]);
        assert_eq!(options.date_range.min.to_string(), "2016-03-05");
        assert_eq!(options.date_range.max.to_string(), "2016-07-10");
    }

    #[test]
    fn test_aggregate_dispatches_every_view() {
        let store = DataStore::from_records(scenario_records()).unwrap();
        let rows: Vec<&OrderRecord> = store.records().iter().collect();
        assert!(matches!(
            aggregate(SalesView::Overview, &rows, &store),
            AggregationResult::Overview(_)
        ));
        assert!(matches!(
            aggregate(SalesView::Trends, &rows, &store),
            AggregationResult::Trends(_)
        ));
        assert!(matches!(
            aggregate(SalesView::FilterOptions, &rows, &store),
            AggregationResult::FilterOptions(_)
        ));
    }

    #[test]
    fn test_rounding_to_cents() {
        let mut records = scenario_records();
        records[0].sales = 100.006;
        let metrics = overview(&refs(&records));
        assert_eq!(metrics.total_sales, 400.01);
    }
}
