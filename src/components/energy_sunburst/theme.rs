//! Category colors for sunburst segments.

use std::collections::HashMap;

/// Color used for any label without an entry in the active color map.
pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// Default energy categories, in colorway order.
pub const DEFAULT_ENERGY_COLORS: [(&str, &str); 9] = [
	("Solar", "#FFD700"),
	("Wind", "#87CEEB"),
	("Grid", "#FF6347"),
	("Battery", "#32CD32"),
	("Other", "#8A2BE2"),
	("Household", "#FFA07A"),
	("Lighting", "#FFDAB9"),
	("Heating", "#FF4500"),
	("Cooling", "#ADD8E6"),
];

/// Segment border drawn between arcs.
pub const SEGMENT_BORDER_COLOR: &str = "#ffffff";
pub const SEGMENT_BORDER_WIDTH: f64 = 0.5;

/// Mapping from category label to CSS color.
pub type ColorMap = HashMap<String, String>;

/// Default color map covering the built-in energy categories.
pub fn default_energy_colors() -> ColorMap {
	DEFAULT_ENERGY_COLORS
		.into_iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

/// Default palette colors in order, used as the chart colorway.
pub fn default_colorway() -> Vec<String> {
	DEFAULT_ENERGY_COLORS
		.iter()
		.map(|(_, v)| v.to_string())
		.collect()
}

/// Color for a label, or [`FALLBACK_COLOR`] when the map has none.
pub fn color_for<'a>(label: &str, colors: &'a ColorMap) -> &'a str {
	colors.get(label).map(String::as_str).unwrap_or(FALLBACK_COLOR)
}

/// Colors for a sequence of labels.
pub fn segment_colors<'a, I>(labels: I, colors: &ColorMap) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	labels
		.into_iter()
		.map(|label| color_for(label, colors).to_string())
		.collect()
}
