//! Value coercion and live-value resolution.
//!
//! Configured values are either literal numbers, numeric-looking strings, or
//! references to entities in the host's state object (`sensor.*`). References
//! are resolved against a [`StateProvider`] before every render; everything
//! else is coerced at filter time. Both paths share one recovery policy:
//! anything that is not a finite decimal number becomes `0.0`.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

/// Prefix that marks a configured value as a live-value reference.
pub const LIVE_VALUE_PREFIX: &str = "sensor.";

/// Value substituted for anything unavailable or non-numeric.
pub const FALLBACK_VALUE: f64 = 0.0;

/// A value as it appears in the card configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
	Number(f64),
	Text(String),
	/// `null` in the configuration.
	Missing,
	/// Booleans, arrays, objects: kept so they coerce to the fallback.
	Other(Value),
}

impl RawValue {
	/// The entity id if this value is a live-value reference.
	pub fn live_reference(&self) -> Option<&str> {
		match self {
			RawValue::Text(s) if s.starts_with(LIVE_VALUE_PREFIX) => Some(s),
			_ => None,
		}
	}
}

impl From<f64> for RawValue {
	fn from(v: f64) -> Self {
		RawValue::Number(v)
	}
}

impl From<&str> for RawValue {
	fn from(s: &str) -> Self {
		RawValue::Text(s.to_string())
	}
}

/// Strict decimal parse: the trimmed string must be a finite `f64`.
pub fn parse_decimal(s: &str) -> Option<f64> {
	s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a configured value to a number, falling back to `0.0`.
///
/// Unresolved live references coerce to the fallback as well, since
/// `"sensor.x"` is not a decimal.
pub fn coerce_value(value: &RawValue) -> f64 {
	match value {
		RawValue::Number(v) if v.is_finite() => *v,
		RawValue::Text(s) => parse_decimal(s).unwrap_or(FALLBACK_VALUE),
		_ => FALLBACK_VALUE,
	}
}

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
	(v * 100.0).round() / 100.0
}

/// Source of current entity states, keyed by entity id.
pub trait StateProvider {
	/// Raw `state` field of an entity, if the entity exists.
	fn raw_state(&self, entity_id: &str) -> Option<&Value>;
}

/// One entity record from the host's state object. Only `state` is read.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EntityState {
	#[serde(default)]
	pub state: Value,
}

/// A point-in-time copy of the host's state object.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
	pub entities: HashMap<String, EntityState>,
}

impl StateSnapshot {
	/// Parse the JSON form of the host's state object.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Set one entity's state, returning `self` for chaining.
	pub fn with_state(mut self, entity_id: &str, state: impl Into<Value>) -> Self {
		self.entities.insert(
			entity_id.to_string(),
			EntityState {
				state: state.into(),
			},
		);
		self
	}
}

impl StateProvider for StateSnapshot {
	fn raw_state(&self, entity_id: &str) -> Option<&Value> {
		self.entities.get(entity_id).map(|e| &e.state)
	}
}

impl StateProvider for HashMap<String, Value> {
	fn raw_state(&self, entity_id: &str) -> Option<&Value> {
		self.get(entity_id)
	}
}

/// Numeric reading of a state field, rounded to two decimals.
fn reading(state: &Value) -> Option<f64> {
	let v = match state {
		Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
		Value::String(s) => parse_decimal(s),
		_ => None,
	}?;
	Some(round2(v))
}

/// Resolve a single value against the provider.
///
/// Literals are returned unchanged. References resolve to their rounded
/// numeric state, or to `0.0` when the entity is missing or non-numeric.
pub fn resolve_value<P: StateProvider + ?Sized>(
	value: &RawValue,
	provider: &P,
	debug: bool,
) -> RawValue {
	let Some(entity_id) = value.live_reference() else {
		return value.clone();
	};

	let Some(state) = provider.raw_state(entity_id).filter(|s| !s.is_null()) else {
		if debug {
			warn!("energy-sunburst: {} is not available", entity_id);
		}
		return RawValue::Number(FALLBACK_VALUE);
	};

	if debug {
		debug!("energy-sunburst: fetched {} = {}", entity_id, state);
	}

	match reading(state) {
		Some(v) => RawValue::Number(v),
		None => {
			if debug {
				warn!("energy-sunburst: {} returned non-numeric state {}", entity_id, state);
			}
			RawValue::Number(FALLBACK_VALUE)
		}
	}
}

/// Resolve every value, producing a fresh snapshot for the next render.
pub fn resolve_values<P: StateProvider + ?Sized>(
	values: &[RawValue],
	provider: &P,
	debug: bool,
) -> Vec<RawValue> {
	values
		.iter()
		.map(|v| resolve_value(v, provider, debug))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coerces_strict_decimals_only() {
		assert_eq!(coerce_value(&RawValue::from(12.5)), 12.5);
		assert_eq!(coerce_value(&RawValue::from(" 3.25 ")), 3.25);
		assert_eq!(coerce_value(&RawValue::from("12abc")), 0.0);
		assert_eq!(coerce_value(&RawValue::from("")), 0.0);
		assert_eq!(coerce_value(&RawValue::from("NaN")), 0.0);
		assert_eq!(coerce_value(&RawValue::from("inf")), 0.0);
		assert_eq!(coerce_value(&RawValue::Missing), 0.0);
		assert_eq!(coerce_value(&RawValue::Number(f64::NAN)), 0.0);
		assert_eq!(coerce_value(&RawValue::Other(Value::Bool(true))), 0.0);
	}

	#[test]
	fn literals_pass_through_resolution() {
		let snapshot = StateSnapshot::default();
		let value = RawValue::from("42");
		assert_eq!(resolve_value(&value, &snapshot, false), value);
		assert_eq!(resolve_value(&RawValue::from(7.0), &snapshot, false), RawValue::Number(7.0));
	}

	#[test]
	fn references_round_to_two_decimals() {
		let snapshot = StateSnapshot::default()
			.with_state("sensor.solar", "3.14159")
			.with_state("sensor.grid", 12);
		assert_eq!(
			resolve_value(&RawValue::from("sensor.solar"), &snapshot, false),
			RawValue::Number(3.14)
		);
		assert_eq!(
			resolve_value(&RawValue::from("sensor.grid"), &snapshot, false),
			RawValue::Number(12.0)
		);
	}

	#[test]
	fn unavailable_references_fall_back_to_zero() {
		let snapshot = StateSnapshot::default()
			.with_state("sensor.offline", "unavailable")
			.with_state("sensor.null", Value::Null);
		for id in ["sensor.offline", "sensor.null", "sensor.missing"] {
			assert_eq!(
				resolve_value(&RawValue::from(id), &snapshot, true),
				RawValue::Number(0.0),
				"{id}"
			);
		}
	}

	#[test]
	fn resolution_is_idempotent() {
		let snapshot = StateSnapshot::default().with_state("sensor.wind", "7.777");
		let values = [RawValue::from("sensor.wind"), RawValue::from(1.0)];
		let once = resolve_values(&values, &snapshot, false);
		let twice = resolve_values(&once, &snapshot, false);
		assert_eq!(once, twice);
		assert_eq!(once[0], RawValue::Number(7.78));
	}

	#[test]
	fn snapshot_parses_host_state_shape() {
		let snapshot = StateSnapshot::from_json(
			r#"{"sensor.solar": {"state": "4.2", "attributes": {"unit_of_measurement": "kWh"}}}"#,
		)
		.unwrap();
		assert_eq!(snapshot.raw_state("sensor.solar"), Some(&Value::from("4.2")));
		assert_eq!(snapshot.raw_state("sensor.none"), None);
	}
}
