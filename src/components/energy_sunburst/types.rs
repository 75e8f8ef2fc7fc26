//! Card configuration as supplied by the dashboard host.

use serde::Deserialize;
use thiserror::Error;

use super::drilldown::FocusClick;
use super::hierarchy::DrilldownDepth;
use super::theme::{ColorMap, default_energy_colors};
use super::values::RawValue;

/// Default location of the Plotly bootstrap script on the dashboard host.
pub const DEFAULT_PLOTLY_URL: &str = "/local/plotly.min.js";
/// Default unit appended to segment values.
pub const DEFAULT_UNIT: &str = "kWh";

/// The dataset: three positionally aligned columns.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SunburstData {
	pub labels: Vec<String>,
	pub parents: Vec<String>,
	pub values: Vec<RawValue>,
	/// Color overrides, accepted here as well as at the top level.
	#[serde(default)]
	pub energycolors: Option<ColorMap>,
}

/// Configuration exactly as deserialized, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
struct RawConfig {
	data: Option<SunburstData>,
	#[serde(default)]
	energycolors: Option<ColorMap>,
	#[serde(default)]
	debug: bool,
	#[serde(default)]
	drilldown_depth: DrilldownDepth,
	#[serde(default)]
	focus_click: FocusClick,
	#[serde(default)]
	unit: Option<String>,
	#[serde(default)]
	plotly_url: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("You must define 'data' for the Energy Sunburst chart.")]
	MissingData,
	#[error(
		"'data' columns must be the same length (labels: {labels}, parents: {parents}, values: {values})"
	)]
	MisalignedData {
		labels: usize,
		parents: usize,
		values: usize,
	},
	#[error("invalid card configuration: {0}")]
	Parse(String),
}

/// Validated card configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SunburstConfig {
	pub data: SunburstData,
	/// Active color map: the override if one was given, else the defaults.
	pub colors: ColorMap,
	pub debug: bool,
	pub drilldown_depth: DrilldownDepth,
	pub focus_click: FocusClick,
	pub unit: String,
	pub plotly_url: String,
}

impl SunburstConfig {
	/// Parse and validate a JSON configuration.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let raw: RawConfig =
			serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
		Self::validate(raw)
	}

	/// Validate an already-parsed JSON value.
	pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		let raw: RawConfig =
			serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
		Self::validate(raw)
	}

	/// Build a configuration around `data` with every option at its default.
	pub fn new(data: SunburstData) -> Result<Self, ConfigError> {
		Self::validate(RawConfig {
			data: Some(data),
			..RawConfig::default()
		})
	}

	fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
		let mut data = raw.data.ok_or(ConfigError::MissingData)?;

		let (labels, parents, values) = (data.labels.len(), data.parents.len(), data.values.len());
		if labels != parents || labels != values {
			return Err(ConfigError::MisalignedData {
				labels,
				parents,
				values,
			});
		}

		let colors = raw
			.energycolors
			.or_else(|| data.energycolors.take())
			.unwrap_or_else(default_energy_colors);

		Ok(Self {
			data,
			colors,
			debug: raw.debug,
			drilldown_depth: raw.drilldown_depth,
			focus_click: raw.focus_click,
			unit: raw.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
			plotly_url: raw
				.plotly_url
				.unwrap_or_else(|| DEFAULT_PLOTLY_URL.to_string()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::energy_sunburst::hierarchy::rows_from_columns;

	#[test]
	fn missing_data_is_rejected() {
		let err = SunburstConfig::from_json(r#"{"debug": true}"#).unwrap_err();
		assert_eq!(err, ConfigError::MissingData);
		assert!(err.to_string().contains("'data'"));
	}

	#[test]
	fn misaligned_columns_are_rejected() {
		let err = SunburstConfig::from_json(
			r#"{"data": {"labels": ["A", "B"], "parents": [""], "values": [1, 2]}}"#,
		)
		.unwrap_err();
		assert_eq!(
			err,
			ConfigError::MisalignedData {
				labels: 2,
				parents: 1,
				values: 2
			}
		);
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(
			SunburstConfig::from_json("{"),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn defaults_apply() {
		let config = SunburstConfig::from_json(
			r#"{"data": {"labels": ["Solar"], "parents": [""], "values": ["sensor.solar"]}}"#,
		)
		.unwrap();
		assert!(!config.debug);
		assert_eq!(config.drilldown_depth, DrilldownDepth::TwoLevel);
		assert_eq!(config.focus_click, FocusClick::StepUp);
		assert_eq!(config.unit, "kWh");
		assert_eq!(config.plotly_url, DEFAULT_PLOTLY_URL);
		assert_eq!(config.colors.get("Solar").map(String::as_str), Some("#FFD700"));
		assert_eq!(config.data.values, [RawValue::from("sensor.solar")]);
	}

	#[test]
	fn policies_and_colors_are_read() {
		let config = SunburstConfig::from_json(
			r##"{
				"data": {
					"labels": ["Grid"], "parents": [""], "values": [null],
					"energycolors": {"Grid": "#000000"}
				},
				"drilldown_depth": "children",
				"focus_click": "reset",
				"unit": "W"
			}"##,
		)
		.unwrap();
		assert_eq!(config.drilldown_depth, DrilldownDepth::Children);
		assert_eq!(config.focus_click, FocusClick::Reset);
		assert_eq!(config.unit, "W");
		assert_eq!(config.colors.get("Grid").map(String::as_str), Some("#000000"));
		assert!(config.colors.get("Solar").is_none());
		assert_eq!(config.data.values, [RawValue::Missing]);
	}

	#[test]
	fn top_level_colors_win() {
		let config = SunburstConfig::from_json(
			r##"{
				"data": {
					"labels": [], "parents": [], "values": [],
					"energycolors": {"Grid": "#000000"}
				},
				"energycolors": {"Grid": "#111111"}
			}"##,
		)
		.unwrap();
		assert_eq!(config.colors.get("Grid").map(String::as_str), Some("#111111"));
	}

	#[test]
	fn non_numeric_literals_fall_back_to_zero() {
		let config = SunburstConfig::from_json(
			r#"{"data": {"labels": ["A", "B"], "parents": ["", "A"], "values": [true, {}]}}"#,
		)
		.unwrap();
		let rows = rows_from_columns(&config.data.labels, &config.data.parents, &config.data.values);
		let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
		assert_eq!(values, [0.0, 0.0]);
	}
}
