//! Hierarchy filtering for drill-down views.
//!
//! The dataset is a flat table of `(label, parent, value)` rows. In overview
//! mode the whole table is shown as-is. When a node is focused, it becomes the
//! visual root (its parent is blanked) and only its descendants, down to the
//! configured depth, follow it.

use serde::Deserialize;
use thiserror::Error;

use super::values::{RawValue, coerce_value};

/// One node of the hierarchy with its value already coerced.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyRow {
	pub label: String,
	/// Label of the containing node, empty for top-level nodes.
	pub parent: String,
	pub value: f64,
}

impl HierarchyRow {
	pub fn new(label: impl Into<String>, parent: impl Into<String>, value: f64) -> Self {
		Self {
			label: label.into(),
			parent: parent.into(),
			value,
		}
	}

	pub fn is_top_level(&self) -> bool {
		self.parent.is_empty()
	}
}

/// How many levels below the focused node are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrilldownDepth {
	/// Focused node plus its direct children.
	Children,
	/// Focused node, its children and their children.
	#[default]
	TwoLevel,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ViewError {
	#[error("focus label `{0}` does not exist in the dataset")]
	InvalidFocusLabel(String),
}

/// Rows visible at the current drill-down level, in renderer order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewRows {
	pub rows: Vec<HierarchyRow>,
}

impl ViewRows {
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn labels(&self) -> Vec<String> {
		self.rows.iter().map(|r| r.label.clone()).collect()
	}

	pub fn parents(&self) -> Vec<String> {
		self.rows.iter().map(|r| r.parent.clone()).collect()
	}

	pub fn values(&self) -> Vec<f64> {
		self.rows.iter().map(|r| r.value).collect()
	}
}

/// Zip the three aligned configuration columns into rows.
///
/// Columns are expected to be the same length; extra entries in a longer
/// column are ignored.
pub fn rows_from_columns(
	labels: &[String],
	parents: &[String],
	values: &[RawValue],
) -> Vec<HierarchyRow> {
	labels
		.iter()
		.zip(parents)
		.zip(values)
		.map(|((label, parent), value)| {
			HierarchyRow::new(label.as_str(), parent.as_str(), coerce_value(value))
		})
		.collect()
}

/// First row carrying `label`, by position.
pub fn find_row<'a>(rows: &'a [HierarchyRow], label: &str) -> Option<&'a HierarchyRow> {
	rows.iter().find(|r| r.label == label)
}

/// Build the view for `focus`, or the full dataset when there is none.
pub fn prepare_view(
	rows: &[HierarchyRow],
	focus: Option<&str>,
	depth: DrilldownDepth,
) -> Result<ViewRows, ViewError> {
	let Some(focus) = focus else {
		return Ok(ViewRows {
			rows: rows.to_vec(),
		});
	};

	let root =
		find_row(rows, focus).ok_or_else(|| ViewError::InvalidFocusLabel(focus.to_string()))?;

	let mut view = vec![HierarchyRow::new(root.label.as_str(), "", root.value)];
	let children: Vec<&HierarchyRow> = rows.iter().filter(|r| r.parent == focus).collect();
	view.extend(children.iter().map(|&r| r.clone()));

	if depth == DrilldownDepth::TwoLevel {
		for child in &children {
			view.extend(rows.iter().filter(|r| r.parent == child.label).cloned());
		}
	}

	Ok(ViewRows { rows: view })
}
