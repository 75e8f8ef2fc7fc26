//! Headless card controller.
//!
//! Owns the validated configuration, the latest resolved values and the
//! drill-down focus. The Leptos component drives it from reactive signals and
//! Plotly click events; it never touches the DOM itself.

use log::{debug, info};
use thiserror::Error;

use super::chart::SunburstFigure;
use super::drilldown::FocusState;
use super::hierarchy::{HierarchyRow, ViewError, ViewRows, prepare_view, rows_from_columns};
use super::types::{ConfigError, SunburstConfig};
use super::values::{StateProvider, StateSnapshot, resolve_values};

/// Grid size hint reported to the dashboard host.
pub const CARD_SIZE: u32 = 4;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CardError {
	#[error("card has no configuration")]
	NotConfigured,
	#[error(transparent)]
	View(#[from] ViewError),
}

#[derive(Clone, Debug, Default)]
pub struct SunburstCard {
	config: Option<SunburstConfig>,
	states: StateSnapshot,
	/// Rows built from the configuration with live values resolved.
	rows: Vec<HierarchyRow>,
	focus: FocusState,
}

impl SunburstCard {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn card_size(&self) -> u32 {
		CARD_SIZE
	}

	pub fn config(&self) -> Option<&SunburstConfig> {
		self.config.as_ref()
	}

	pub fn rows(&self) -> &[HierarchyRow] {
		&self.rows
	}

	pub fn focus(&self) -> &FocusState {
		&self.focus
	}

	/// Install a new configuration and return to the overview.
	pub fn set_config(&mut self, config: SunburstConfig) {
		info!(
			"energy-sunburst: configured with {} nodes",
			config.data.labels.len()
		);
		self.config = Some(config);
		self.focus = FocusState::Overview;
		self.refresh();
	}

	/// Parse, validate and install a JSON configuration.
	///
	/// On error the previous configuration stays in place.
	pub fn set_config_json(&mut self, json: &str) -> Result<(), ConfigError> {
		let config = SunburstConfig::from_json(json)?;
		self.set_config(config);
		Ok(())
	}

	/// Take a new snapshot of the host's state and re-resolve live values.
	pub fn on_external_state_update(&mut self, snapshot: StateSnapshot) {
		self.states = snapshot;
		self.refresh();
	}

	/// Re-resolve live values against an arbitrary provider.
	pub fn resolve_with<P: StateProvider + ?Sized>(&mut self, provider: &P) {
		let Some(config) = &self.config else {
			return;
		};
		let values = resolve_values(&config.data.values, provider, config.debug);
		self.rows = rows_from_columns(&config.data.labels, &config.data.parents, &values);
	}

	fn refresh(&mut self) {
		let states = std::mem::take(&mut self.states);
		self.resolve_with(&states);
		self.states = states;
	}

	/// Handle a click on a rendered segment, `None` for clicks off the chart.
	pub fn click(&mut self, label: Option<&str>) {
		let Some(config) = &self.config else {
			return;
		};
		self.focus.click(label, &self.rows, config.focus_click);
		if config.debug {
			debug!("energy-sunburst: drill-down state {:?}", self.focus);
		}
	}

	pub fn reset_focus(&mut self) {
		self.focus = FocusState::Overview;
	}

	/// Rows visible at the current focus.
	pub fn view(&self) -> Result<ViewRows, CardError> {
		let config = self.config.as_ref().ok_or(CardError::NotConfigured)?;
		let view = prepare_view(&self.rows, self.focus.label(), config.drilldown_depth)?;
		if config.debug {
			debug!(
				"energy-sunburst: processed data labels={:?} parents={:?} values={:?}",
				view.labels(),
				view.parents(),
				view.values()
			);
		}
		Ok(view)
	}

	/// Plotly figure for the current view.
	pub fn figure(&self) -> Result<SunburstFigure, CardError> {
		let config = self.config.as_ref().ok_or(CardError::NotConfigured)?;
		let view = self.view()?;
		Ok(SunburstFigure::new(&view, &config.colors, &config.unit))
	}
}
