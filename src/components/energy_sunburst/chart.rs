//! Declarative Plotly figure for a sunburst view.
//!
//! Everything here is plain data. The figure serializes to the JSON shape
//! `Plotly.newPlot` / `Plotly.react` accept; drawing is left to Plotly.

use serde::Serialize;

use super::hierarchy::ViewRows;
use super::theme::{
	ColorMap, SEGMENT_BORDER_COLOR, SEGMENT_BORDER_WIDTH, default_colorway, segment_colors,
};

const INSIDE_TEXT_TEMPLATE: &str = "%{label}<br>%{text}<br>%{percentParent:.1%}";
const TRANSPARENT: &str = "rgba(0,0,0,0)";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerLine {
	pub width: f64,
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
	pub colors: Vec<String>,
	pub line: MarkerLine,
}

/// A single `sunburst` trace.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SunburstTrace {
	#[serde(rename = "type")]
	pub kind: &'static str,
	pub labels: Vec<String>,
	pub parents: Vec<String>,
	pub values: Vec<f64>,
	pub branchvalues: &'static str,
	pub textinfo: &'static str,
	/// Per-segment value text, e.g. `"12.50 kWh"`.
	pub text: Vec<String>,
	pub insidetexttemplate: &'static str,
	pub marker: Marker,
	pub hoverinfo: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Margin {
	pub t: u32,
	pub l: u32,
	pub r: u32,
	pub b: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UniformText {
	pub minsize: u32,
	pub mode: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
	pub duration: u32,
	pub easing: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathBar {
	pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
	pub margin: Margin,
	pub uniformtext: UniformText,
	pub paper_bgcolor: &'static str,
	pub plot_bgcolor: &'static str,
	pub transition: Transition,
	pub showlegend: bool,
	pub pathbar: PathBar,
	pub sunburstcolorway: Vec<String>,
}

impl Default for Layout {
	fn default() -> Self {
		Self {
			margin: Margin {
				t: 0,
				l: 0,
				r: 0,
				b: 0,
			},
			uniformtext: UniformText {
				minsize: 10,
				mode: "hide",
			},
			paper_bgcolor: TRANSPARENT,
			plot_bgcolor: TRANSPARENT,
			transition: Transition {
				duration: 200,
				easing: "cubic-in-out",
			},
			showlegend: false,
			pathbar: PathBar { visible: false },
			sunburstcolorway: default_colorway(),
		}
	}
}

/// Plotly interaction options.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
	pub static_plot: bool,
	pub scroll_zoom: bool,
	pub editable: bool,
	pub display_mode_bar: bool,
}

impl Default for PlotConfig {
	fn default() -> Self {
		Self {
			static_plot: false,
			scroll_zoom: true,
			editable: false,
			display_mode_bar: true,
		}
	}
}

/// Data, layout and config for one render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SunburstFigure {
	pub data: Vec<SunburstTrace>,
	pub layout: Layout,
	pub config: PlotConfig,
}

impl SunburstFigure {
	/// Build the figure for an already-filtered view.
	pub fn new(view: &ViewRows, colors: &ColorMap, unit: &str) -> Self {
		let labels = view.labels();
		let values = view.values();
		let text = values.iter().map(|v| format_value(*v, unit)).collect();
		let colors = segment_colors(labels.iter().map(String::as_str), colors);

		let trace = SunburstTrace {
			kind: "sunburst",
			labels,
			parents: view.parents(),
			values,
			branchvalues: "total",
			textinfo: "label+text+percent",
			text,
			insidetexttemplate: INSIDE_TEXT_TEMPLATE,
			marker: Marker {
				colors,
				line: MarkerLine {
					width: SEGMENT_BORDER_WIDTH,
					color: SEGMENT_BORDER_COLOR.to_string(),
				},
			},
			hoverinfo: "label+text",
		};

		Self {
			data: vec![trace],
			layout: Layout::default(),
			config: PlotConfig::default(),
		}
	}

	pub fn data_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(&self.data)
	}

	pub fn layout_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(&self.layout)
	}

	pub fn config_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(&self.config)
	}
}

/// Segment text: the value to two decimals followed by the unit.
pub fn format_value(value: f64, unit: &str) -> String {
	if unit.is_empty() {
		format!("{:.2}", value)
	} else {
		format!("{:.2} {}", value, unit)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::energy_sunburst::hierarchy::HierarchyRow;
	use crate::components::energy_sunburst::theme::default_energy_colors;

	fn view() -> ViewRows {
		ViewRows {
			rows: vec![
				HierarchyRow::new("Grid", "", 100.0),
				HierarchyRow::new("Solar", "Grid", 40.0),
				HierarchyRow::new("Heat pump", "Grid", 60.0),
			],
		}
	}

	#[test]
	fn trace_carries_the_view_columns() {
		let figure = SunburstFigure::new(&view(), &default_energy_colors(), "kWh");
		let trace = &figure.data[0];
		assert_eq!(trace.labels, ["Grid", "Solar", "Heat pump"]);
		assert_eq!(trace.parents, ["", "Grid", "Grid"]);
		assert_eq!(trace.values, [100.0, 40.0, 60.0]);
		assert_eq!(trace.text, ["100.00 kWh", "40.00 kWh", "60.00 kWh"]);
		assert_eq!(trace.marker.colors, ["#FF6347", "#FFD700", "#CCCCCC"]);
	}

	#[test]
	fn serializes_to_plotly_shape() {
		let figure = SunburstFigure::new(&view(), &default_energy_colors(), "kWh");
		let data: serde_json::Value = serde_json::from_str(&figure.data_json().unwrap()).unwrap();
		assert_eq!(data[0]["type"], json!("sunburst"));
		assert_eq!(data[0]["branchvalues"], json!("total"));
		assert_eq!(data[0]["marker"]["line"], json!({"width": 0.5, "color": "#ffffff"}));

		let config: serde_json::Value =
			serde_json::from_str(&figure.config_json().unwrap()).unwrap();
		assert_eq!(
			config,
			json!({"staticPlot": false, "scrollZoom": true, "editable": false, "displayModeBar": true})
		);

		let layout: serde_json::Value =
			serde_json::from_str(&figure.layout_json().unwrap()).unwrap();
		assert_eq!(layout["pathbar"]["visible"], json!(false));
		assert_eq!(layout["sunburstcolorway"].as_array().map(Vec::len), Some(9));
	}

	#[test]
	fn value_text_respects_unit() {
		assert_eq!(format_value(3.14159, "kWh"), "3.14 kWh");
		assert_eq!(format_value(2.0, ""), "2.00");
	}
}
