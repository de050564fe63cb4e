use contracts::shared::charts::{ChartDescriptor, ChartSeries, SeriesKind};

use super::metrics::AggregationResult;

/// Map an aggregation result to its chart descriptor.
///
/// Overview and filter-options carry no chart (the UI renders KPI cards and
/// input widgets for those). Empty input yields a descriptor with empty
/// series so the caller can render an empty-state chart instead of an error.
pub fn build_chart(result: &AggregationResult) -> Option<ChartDescriptor> {
    match result {
        AggregationResult::Overview(_) | AggregationResult::FilterOptions(_) => None,
        AggregationResult::ByCategory(data) => Some(category_chart(data)),
        AggregationResult::ByRegion(data) => Some(region_chart(data)),
        AggregationResult::Trends(data) => Some(trends_chart(data)),
        AggregationResult::ProfitAnalysis(data) => Some(profit_chart(data)),
        AggregationResult::BySegment(data) => Some(segment_chart(data)),
        AggregationResult::GeoSales(data) => Some(geo_chart(data)),
    }
}

fn category_chart(data: &[contracts::dashboards::sales::CategorySales]) -> ChartDescriptor {
    let categories: Vec<String> = data.iter().map(|d| d.category.clone()).collect();
    let sales: Vec<f64> = data.iter().map(|d| d.sales).collect();
    let profit: Vec<f64> = data.iter().map(|d| d.profit).collect();

    let mut chart = ChartDescriptor::new("Sales and Profit by Category")
        .with_axes("Category", "Amount")
        .push_series(ChartSeries::new(
            "Sales",
            SeriesKind::Bar,
            categories.clone(),
            sales,
        ))
        .push_series(ChartSeries::new("Profit", SeriesKind::Bar, categories, profit));
    chart.layout.show_legend = true;
    chart
        .layout
        .extra
        .insert("barmode".to_string(), "group".into());
    chart
}

fn region_chart(data: &[contracts::dashboards::sales::RegionSales]) -> ChartDescriptor {
    let regions: Vec<String> = data.iter().map(|d| d.region.clone()).collect();
    let sales: Vec<f64> = data.iter().map(|d| d.sales).collect();

    let mut chart = ChartDescriptor::new("Sales Distribution by Region")
        .push_series(ChartSeries::new("Sales", SeriesKind::Pie, regions, sales));
    chart.layout.show_legend = true;
    chart
}

fn trends_chart(data: &[contracts::dashboards::sales::TrendPoint]) -> ChartDescriptor {
    let months: Vec<String> = data.iter().map(|d| d.month.clone()).collect();
    let sales: Vec<f64> = data.iter().map(|d| d.sales).collect();
    let profit: Vec<f64> = data.iter().map(|d| d.profit).collect();

    let mut chart = ChartDescriptor::new("Monthly Sales and Profit Trends")
        .with_axes("Month", "Amount")
        .push_series(ChartSeries::new(
            "Sales",
            SeriesKind::Line,
            months.clone(),
            sales,
        ))
        .push_series(ChartSeries::new("Profit", SeriesKind::Line, months, profit));
    chart.layout.show_legend = true;
    chart
}

/// Horizontal profit bars, worst sub-category first (ascending by profit)
fn profit_chart(data: &[contracts::dashboards::sales::SubCategoryProfit]) -> ChartDescriptor {
    let mut sorted: Vec<&contracts::dashboards::sales::SubCategoryProfit> = data.iter().collect();
    sorted.sort_by(|a, b| {
        a.profit
            .partial_cmp(&b.profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let sub_categories: Vec<String> = sorted.iter().map(|d| d.sub_category.clone()).collect();
    let profit: Vec<f64> = sorted.iter().map(|d| d.profit).collect();

    let mut chart = ChartDescriptor::new("Profit by Sub-Category")
        .with_axes("Profit", "Sub-Category")
        .push_series(ChartSeries::new(
            "Profit",
            SeriesKind::HorizontalBar,
            sub_categories,
            profit,
        ));
    chart.layout.height = Some(520);
    chart
}

fn segment_chart(data: &[contracts::dashboards::sales::SegmentSales]) -> ChartDescriptor {
    let segments: Vec<String> = data.iter().map(|d| d.segment.clone()).collect();
    let sales: Vec<f64> = data.iter().map(|d| d.sales).collect();
    let customers: Vec<f64> = data.iter().map(|d| d.customers as f64).collect();

    let mut chart = ChartDescriptor::new("Sales and Customers by Segment")
        .with_axes("Segment", "Sales")
        .push_series(ChartSeries::new(
            "Sales",
            SeriesKind::Bar,
            segments.clone(),
            sales,
        ))
        .push_series(ChartSeries::new(
            "Customers",
            SeriesKind::Line,
            segments,
            customers,
        ));
    chart.layout.show_legend = true;
    // Customer counts live on their own scale
    chart
        .layout
        .extra
        .insert("secondary_y".to_string(), vec!["Customers"].into());
    chart
}

fn geo_chart(data: &[contracts::dashboards::sales::StateSales]) -> ChartDescriptor {
    let codes: Vec<String> = data.iter().map(|d| d.state_code.clone()).collect();
    let sales: Vec<f64> = data.iter().map(|d| d.sales).collect();

    ChartDescriptor::new("Sales by State").push_series(ChartSeries::new(
        "Sales",
        SeriesKind::Choropleth,
        codes,
        sales,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::sales::{
        CategorySales, OverviewMetrics, SubCategoryProfit, TrendPoint,
    };

    #[test]
    fn test_overview_has_no_chart() {
        let result = AggregationResult::Overview(OverviewMetrics {
            total_sales: 0.0,
            total_profit: 0.0,
            total_orders: 0,
            total_customers: 0,
            avg_order_value: 0.0,
            profit_margin: 0.0,
        });
        assert!(build_chart(&result).is_none());
    }

    #[test]
    fn test_empty_input_yields_empty_series_not_error() {
        let chart = build_chart(&AggregationResult::ByCategory(Vec::new())).unwrap();
        assert_eq!(chart.series.len(), 2);
        assert!(chart.series[0].x.is_empty());
        assert!(chart.series[0].y.is_empty());
    }

    #[test]
    fn test_category_chart_shape() {
        let data = vec![CategorySales {
            category: "Furniture".to_string(),
            sales: 100.0,
            profit: 20.0,
            quantity: 2,
            orders: 1,
        }];
        let chart = build_chart(&AggregationResult::ByCategory(data)).unwrap();
        assert_eq!(chart.title, "Sales and Profit by Category");
        assert_eq!(chart.series[0].kind, SeriesKind::Bar);
        assert_eq!(chart.series[0].x, ["Furniture"]);
        assert_eq!(chart.series[1].name, "Profit");
        assert_eq!(chart.layout.extra["barmode"], "group");
    }

    #[test]
    fn test_profit_chart_sorted_ascending_by_profit() {
        let data = vec![
            SubCategoryProfit {
                category: "Furniture".to_string(),
                sub_category: "Chairs".to_string(),
                sales: 100.0,
                profit: 20.0,
                quantity: 2,
                profit_margin: 20.0,
            },
            SubCategoryProfit {
                category: "Technology".to_string(),
                sub_category: "Phones".to_string(),
                sales: 300.0,
                profit: -10.0,
                quantity: 1,
                profit_margin: -3.33,
            },
        ];
        let chart = build_chart(&AggregationResult::ProfitAnalysis(data)).unwrap();
        assert_eq!(chart.series[0].kind, SeriesKind::HorizontalBar);
        assert_eq!(chart.series[0].x, ["Phones", "Chairs"]);
        assert_eq!(chart.series[0].y, [-10.0, 20.0]);
        assert_eq!(chart.layout.height, Some(520));
    }

    #[test]
    fn test_trends_chart_keeps_month_order() {
        let data = vec![
            TrendPoint {
                month: "2016-03".to_string(),
                sales: 100.0,
                profit: 20.0,
                orders: 1,
            },
            TrendPoint {
                month: "2016-07".to_string(),
                sales: 300.0,
                profit: -10.0,
                orders: 1,
            },
        ];
        let chart = build_chart(&AggregationResult::Trends(data)).unwrap();
        assert_eq!(chart.series[0].kind, SeriesKind::Line);
        assert_eq!(chart.series[0].x, ["2016-03", "2016-07"]);
    }
}
