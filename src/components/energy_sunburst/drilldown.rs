//! Click-driven drill-down state.
//!
//! Two states: the full overview, or a focused node acting as the chart root.
//! Clicking a segment focuses it; clicking the focused segment again either
//! steps up to its parent or resets to the overview, depending on
//! [`FocusClick`].

use log::warn;
use serde::Deserialize;

use super::hierarchy::{HierarchyRow, find_row};

/// What clicking the already-focused node does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusClick {
	/// Move focus to the node's parent, or to the overview at the top.
	#[default]
	StepUp,
	/// Always return to the overview.
	Reset,
}

/// Which node, if any, is currently the root of the visible subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
	#[default]
	Overview,
	Focused(String),
}

impl FocusState {
	/// Label of the focused node, `None` in overview.
	pub fn label(&self) -> Option<&str> {
		match self {
			FocusState::Overview => None,
			FocusState::Focused(label) => Some(label),
		}
	}

	pub fn is_overview(&self) -> bool {
		matches!(self, FocusState::Overview)
	}

	/// Apply a click on a rendered segment.
	///
	/// `None` means the click landed outside any segment. Labels missing from
	/// `rows` are ignored.
	pub fn click(&mut self, clicked: Option<&str>, rows: &[HierarchyRow], policy: FocusClick) {
		let Some(clicked) = clicked else {
			return;
		};
		let Some(row) = find_row(rows, clicked) else {
			warn!("energy-sunburst: ignoring click on unknown segment `{}`", clicked);
			return;
		};

		let next = match self.label() {
			Some(current) if current == clicked => match policy {
				FocusClick::Reset => FocusState::Overview,
				FocusClick::StepUp
					if row.is_top_level() || find_row(rows, &row.parent).is_none() =>
				{
					FocusState::Overview
				}
				FocusClick::StepUp => FocusState::Focused(row.parent.clone()),
			},
			_ => FocusState::Focused(clicked.to_string()),
		};
		*self = next;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rows() -> Vec<HierarchyRow> {
		vec![
			HierarchyRow::new("Grid", "", 100.0),
			HierarchyRow::new("Solar", "Grid", 40.0),
			HierarchyRow::new("Wind", "Grid", 60.0),
			HierarchyRow::new("Lighting", "Solar", 15.0),
		]
	}

	#[test]
	fn overview_click_focuses() {
		let mut state = FocusState::Overview;
		state.click(Some("Solar"), &rows(), FocusClick::StepUp);
		assert_eq!(state, FocusState::Focused("Solar".into()));
	}

	#[test]
	fn clicking_another_segment_moves_focus() {
		let mut state = FocusState::Focused("Solar".into());
		state.click(Some("Lighting"), &rows(), FocusClick::StepUp);
		assert_eq!(state.label(), Some("Lighting"));
	}

	#[test]
	fn step_up_walks_to_the_parent_then_overview() {
		let rows = rows();
		let mut state = FocusState::Focused("Lighting".into());
		state.click(Some("Lighting"), &rows, FocusClick::StepUp);
		assert_eq!(state.label(), Some("Solar"));
		state.click(Some("Solar"), &rows, FocusClick::StepUp);
		assert_eq!(state.label(), Some("Grid"));
		state.click(Some("Grid"), &rows, FocusClick::StepUp);
		assert!(state.is_overview());
	}

	#[test]
	fn reset_policy_returns_to_overview() {
		let mut state = FocusState::Focused("Lighting".into());
		state.click(Some("Lighting"), &rows(), FocusClick::Reset);
		assert!(state.is_overview());
	}

	#[test]
	fn step_up_from_a_dangling_parent_returns_to_overview() {
		let rows = vec![HierarchyRow::new("Solar", "Grid", 40.0)];
		let mut state = FocusState::Overview;
		state.click(Some("Solar"), &rows, FocusClick::StepUp);
		state.click(Some("Solar"), &rows, FocusClick::StepUp);
		assert!(state.is_overview());
	}

	#[test]
	fn stray_clicks_are_noops() {
		let mut state = FocusState::Focused("Solar".into());
		state.click(None, &rows(), FocusClick::StepUp);
		state.click(Some("Battery"), &rows(), FocusClick::StepUp);
		assert_eq!(state.label(), Some("Solar"));
	}
}
