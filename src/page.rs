//! Dashboard assembly and HTML rendering.
//!
//! The dashboard is a serializable artifact: map overlay on the left, two
//! placeholder charts and a description block on the right. `render_html`
//! turns it into a self-contained page that draws the map with Leaflet and
//! the charts with Plotly, both loaded from CDN. No aggregation logic lives
//! here; the page only draws what the artifact already contains.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::charts::{
    BarChart, Description, PieChart, analysis_description, placeholder_bar_chart,
    placeholder_pie_chart,
};
use crate::grid::types::{CellResult, RunSummary};

/// Base map position for the Philadelphia view.
pub const MAP_CENTER: [f64; 2] = [39.9526, -75.1652];
pub const MAP_ZOOM: u8 = 12;

/// The map widget's input: center, zoom, and rectangle-draw commands.
#[derive(Debug, Clone, Serialize)]
pub struct MapSpec {
    pub center: [f64; 2],
    pub zoom: u8,
    pub rectangles: Vec<CellResult>,
}

/// Complete render artifact for one page load.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub map: MapSpec,
    pub bar_chart: BarChart,
    pub pie_chart: PieChart,
    pub description: Description,
    pub summary: RunSummary,
}

impl Dashboard {
    /// Wraps aggregation output into the full page artifact, attaching the
    /// static chart and description blocks.
    pub fn new(cells: Vec<CellResult>, summary: RunSummary) -> Self {
        Self {
            generated_at: Utc::now(),
            map: MapSpec {
                center: MAP_CENTER,
                zoom: MAP_ZOOM,
                rectangles: cells,
            },
            bar_chart: placeholder_bar_chart(),
            pie_chart: placeholder_pie_chart(),
            description: analysis_description(),
            summary,
        }
    }
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Restaurant Rating Heat-Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<style>
  body { margin: 0; font-family: sans-serif; }
  .columns { display: flex; position: relative; gap: 16px; padding: 16px; }
  .col { flex: 1 1 50%; }
  .vertical-divider {
    height: 100%;
    width: 2px;
    background-color: #ccc;
    position: absolute;
    left: 50%;
    top: 0;
  }
  .horizontal-line { border: 2px solid #ccc; margin: 20px 0; }
  .chart-row { display: flex; gap: 16px; }
  .chart-row > div { flex: 1 1 50%; height: 360px; }
  #map { height: 800px; }
</style>
</head>
<body>
<div class="columns">
  <div class="vertical-divider"></div>
  <div class="col"><div id="map"></div></div>
  <div class="col">
    <div class="chart-row">
      <div id="bar-chart"></div>
      <div id="pie-chart"></div>
    </div>
    <div class="horizontal-line"></div>
    <p><strong id="description-heading"></strong></p>
    <p id="description-body"></p>
  </div>
</div>
<script>
  const dashboard = __DASHBOARD_JSON__;

  const map = L.map("map").setView(dashboard.map.center, dashboard.map.zoom);
  L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
    attribution: "&copy; OpenStreetMap contributors",
  }).addTo(map);

  for (const rect of dashboard.map.rectangles) {
    L.rectangle(rect.bounds, {
      color: rect.color,
      fill: true,
      fillColor: rect.fillColor,
      fillOpacity: rect.fillOpacity,
    })
      .bindTooltip(rect.tooltip)
      .addTo(map);
  }

  Plotly.newPlot("bar-chart", [{
    type: "bar",
    x: dashboard.bar_chart.categories,
    y: dashboard.bar_chart.values,
  }], {
    title: dashboard.bar_chart.title,
    xaxis: { title: dashboard.bar_chart.x_title },
    yaxis: { title: dashboard.bar_chart.y_title },
  });

  Plotly.newPlot("pie-chart", [{
    type: "pie",
    labels: dashboard.pie_chart.labels,
    values: dashboard.pie_chart.values,
  }], { title: dashboard.pie_chart.title });

  document.getElementById("description-heading").textContent =
    dashboard.description.heading;
  document.getElementById("description-body").textContent =
    dashboard.description.body;
</script>
</body>
</html>
"#;

/// Renders the dashboard as a standalone HTML page.
pub fn render_html(dashboard: &Dashboard) -> Result<String> {
    // keep "</" out of the inline <script> payload
    let json = serde_json::to_string(dashboard)?.replace("</", "<\\/");
    Ok(PAGE_TEMPLATE.replace("__DASHBOARD_JSON__", &json))
}
