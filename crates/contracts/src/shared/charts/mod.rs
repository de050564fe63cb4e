use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Renderer-agnostic description of a single chart.
///
/// The backend never talks to a plotting library; it emits this declarative
/// structure and the UI decides how to turn it into pixels. Rebuilt fresh on
/// every query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub layout: LayoutHints,
}

impl ChartDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            x_axis: AxisSpec::default(),
            y_axis: AxisSpec::default(),
            layout: LayoutHints::default(),
        }
    }

    pub fn with_axes(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_axis = AxisSpec {
            title: x_title.into(),
        };
        self.y_axis = AxisSpec {
            title: y_title.into(),
        };
        self
    }

    pub fn push_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }
}

/// One plottable series: parallel x labels and y values plus a rendering tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub kind: SeriesKind,
    /// Category labels / month buckets / state codes
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, kind: SeriesKind, x: Vec<String>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            x,
            y,
        }
    }
}

/// Closed set of rendering shapes understood by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    Bar,
    HorizontalBar,
    Line,
    Pie,
    Choropleth,
}

/// Axis metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
}

/// Layout metadata plus a free-form bag of rendering hints
/// (bar mode, secondary axis assignment, fixed height and the like)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutHints {
    pub height: Option<u32>,
    pub show_legend: bool,
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}
