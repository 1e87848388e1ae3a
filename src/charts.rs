//! Placeholder chart specifications for the right-hand dashboard column.
//!
//! Both charts carry hardcoded constant data unrelated to the grid
//! aggregation; they exist only to fill out the page layout.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Static text block rendered below the charts.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub heading: String,
    pub body: String,
}

pub fn placeholder_bar_chart() -> BarChart {
    BarChart {
        title: "Bar Chart".to_string(),
        x_title: "Categories".to_string(),
        y_title: "Values".to_string(),
        categories: vec![
            "Category A".to_string(),
            "Category B".to_string(),
            "Category C".to_string(),
        ],
        values: vec![100.0, 150.0, 200.0],
    }
}

pub fn placeholder_pie_chart() -> PieChart {
    PieChart {
        title: "Pie Chart".to_string(),
        labels: vec![
            "Category A".to_string(),
            "Category B".to_string(),
            "Category C".to_string(),
        ],
        values: vec![30.0, 50.0, 20.0],
    }
}

pub fn analysis_description() -> Description {
    Description {
        heading: "Analysis Description".to_string(),
        body: "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
               Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua."
            .to_string(),
    }
}
