use serde_json::{json, Value};

const BLUE: &str = "#3b82f6";
const GREEN: &str = "#10b981";
const PURPLE: &str = "#8b5cf6";
const AMBER: &str = "#f59e0b";
const GRID_COLOR: &str = "rgba(0, 0, 0, 0.05)";

/// A Chart.js configuration bound to the canvas it draws on.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub canvas_id: &'static str,
    pub config: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(label: &str, labels: &[&str], values: &[f64]) -> Self {
        Self {
            label: label.to_string(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
            values: values.to_vec(),
        }
    }
}

fn cartesian_options() -> Value {
    json!({
        "responsive": true,
        "plugins": { "legend": { "display": false } },
        "scales": {
            "y": { "beginAtZero": true, "grid": { "display": true, "color": GRID_COLOR } },
            "x": { "grid": { "display": false } }
        }
    })
}

pub fn visitor_chart(series: &Series) -> ChartSpec {
    ChartSpec {
        canvas_id: "visitorChart",
        config: json!({
            "type": "line",
            "data": {
                "labels": series.labels,
                "datasets": [{
                    "label": series.label,
                    "data": series.values,
                    "borderColor": BLUE,
                    "backgroundColor": "rgba(59, 130, 246, 0.1)",
                    "borderWidth": 2,
                    "fill": true,
                    "tension": 0.4
                }]
            },
            "options": cartesian_options()
        }),
    }
}

pub fn revenue_chart(series: &Series) -> ChartSpec {
    ChartSpec {
        canvas_id: "revenueChart",
        config: json!({
            "type": "bar",
            "data": {
                "labels": series.labels,
                "datasets": [{
                    "label": series.label,
                    "data": series.values,
                    "backgroundColor": GREEN,
                    "borderColor": GREEN,
                    "borderWidth": 1
                }]
            },
            "options": cartesian_options()
        }),
    }
}

pub fn content_chart(series: &Series) -> ChartSpec {
    ChartSpec {
        canvas_id: "contentChart",
        config: json!({
            "type": "doughnut",
            "data": {
                "labels": series.labels,
                "datasets": [{
                    "data": series.values,
                    "backgroundColor": [BLUE, GREEN, PURPLE, AMBER],
                    "borderWidth": 2,
                    "borderColor": "#ffffff"
                }]
            },
            "options": {
                "responsive": true,
                "plugins": { "legend": { "position": "bottom" } }
            }
        }),
    }
}

/// The dashboard's sample charts.
pub fn dashboard_charts() -> Vec<ChartSpec> {
    let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
    vec![
        visitor_chart(&Series::new(
            "Visitors",
            &months,
            &[1200.0, 1900.0, 1500.0, 2500.0, 2200.0, 3000.0],
        )),
        revenue_chart(&Series::new(
            "Revenue",
            &months,
            &[5000.0, 7000.0, 6500.0, 8000.0, 9000.0, 12000.0],
        )),
        content_chart(&Series::new(
            "Content",
            &["Courses", "Articles", "Books", "Scholarships"],
            &[40.0, 25.0, 20.0, 15.0],
        )),
    ]
}
