//! energy-sunburst: drill-down energy flow sunburst card.
//!
//! This crate provides a WASM-based dashboard card that renders hierarchical
//! energy data as a Plotly sunburst, resolves live sensor readings from the
//! host's state object, and lets users drill into the hierarchy by clicking.

use std::cell::RefCell;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::energy_sunburst::{
	CARD_SIZE, ConfigError, DrilldownDepth, EnergySunburstCard, FocusClick, FocusState,
	HierarchyRow, RawValue, StateProvider, StateSnapshot, SunburstCard, SunburstConfig,
	SunburstData, ViewRows, color_for, prepare_view,
};

/// Element id of the `<script type="application/json">` holding the card configuration.
const CONFIG_ELEMENT_ID: &str = "sunburst-config";
/// Element id of the optional initial host state snapshot.
const STATES_ELEMENT_ID: &str = "sunburst-states";

/// Signals the host writes through the exported functions below.
#[derive(Clone, Copy)]
struct HostSignals {
	config: RwSignal<Option<SunburstConfig>>,
	states: RwSignal<StateSnapshot>,
}

thread_local! {
	static HOST: RefCell<Option<HostSignals>> = const { RefCell::new(None) };
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("energy-sunburst: logging initialized");
}

/// Text of a script element by id, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load the card configuration from the script element with id="sunburst-config".
fn load_config() -> Option<SunburstConfig> {
	let json_text = script_text(CONFIG_ELEMENT_ID)?;

	match SunburstConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"energy-sunburst: loaded {} nodes",
				config.data.labels.len()
			);
			Some(config)
		}
		Err(e) => {
			warn!("energy-sunburst: {}", e);
			None
		}
	}
}

/// Load an initial state snapshot from the script element with id="sunburst-states".
fn load_states() -> StateSnapshot {
	let Some(json_text) = script_text(STATES_ELEMENT_ID) else {
		return StateSnapshot::default();
	};

	StateSnapshot::from_json(&json_text).unwrap_or_else(|e| {
		warn!("energy-sunburst: failed to parse state snapshot: {}", e);
		StateSnapshot::default()
	})
}

fn with_host(f: impl FnOnce(HostSignals)) -> Result<(), JsValue> {
	let host = HOST.with(|h| *h.borrow());
	let host = host.ok_or_else(|| JsValue::from_str("energy-sunburst is not mounted"))?;
	f(host);
	Ok(())
}

/// Replace the card configuration. Throws if the configuration is invalid,
/// leaving the current one in place.
#[wasm_bindgen(js_name = setConfig)]
pub fn set_config(json: &str) -> Result<(), JsValue> {
	let config = SunburstConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
	with_host(|host| host.config.set(Some(config)))
}

/// Push a new snapshot of the host's state object.
#[wasm_bindgen(js_name = updateStates)]
pub fn update_states(json: &str) -> Result<(), JsValue> {
	let snapshot = StateSnapshot::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
	with_host(|host| host.states.set(snapshot))
}

/// Grid size hint for the dashboard layout.
#[wasm_bindgen(js_name = getCardSize)]
pub fn get_card_size() -> u32 {
	CARD_SIZE
}

/// Main application component.
/// Loads configuration and initial state from the DOM and renders the card.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let host = HostSignals {
		config: RwSignal::new(load_config()),
		states: RwSignal::new(load_states()),
	};
	HOST.with(|h| *h.borrow_mut() = Some(host));

	view! {
		<Title text="Energy Sunburst" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="energy-sunburst-card">
			<EnergySunburstCard config=host.config states=host.states />
		</div>
	}
}
