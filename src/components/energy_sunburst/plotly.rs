//! Plotly.js bootstrap and the handful of calls the card makes into it.
//!
//! Plotly is loaded lazily by injecting a `<script>` tag. Only one load may be
//! in flight per page: callers that arrive while it is loading are queued and
//! run once the script fires `onload`. A failed load drops the queue and
//! returns the loader to idle so the next render attempt can retry.

use std::cell::RefCell;

use js_sys::{Array, Function, JSON, Promise, Reflect};
use log::{debug, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlScriptElement};

use super::chart::SunburstFigure;

/// Plotly event fired when a sunburst segment is clicked.
pub const SUNBURST_CLICK_EVENT: &str = "plotly_sunburstclick";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
	#[default]
	Idle,
	Loading,
	Ready,
}

/// Outcome of asking the loader for the resource.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadRequest<C> {
	/// Resource is available; run the callback now.
	RunNow(C),
	/// Caller must start the load; the callback was queued.
	Start,
	/// A load is already running; the callback was queued.
	Queued,
}

/// Single-flight load guard for a process-wide script resource.
#[derive(Debug)]
pub struct ScriptLoader<C> {
	state: LoadState,
	waiting: Vec<C>,
}

impl<C> Default for ScriptLoader<C> {
	fn default() -> Self {
		Self {
			state: LoadState::Idle,
			waiting: Vec::new(),
		}
	}
}

impl<C> ScriptLoader<C> {
	pub fn state(&self) -> LoadState {
		self.state
	}

	pub fn queued(&self) -> usize {
		self.waiting.len()
	}

	/// Request the resource. `available` reports whether it is already present
	/// on the page, e.g. loaded by another card.
	pub fn request(&mut self, available: bool, callback: C) -> LoadRequest<C> {
		if available {
			self.state = LoadState::Ready;
		}
		match self.state {
			LoadState::Ready => LoadRequest::RunNow(callback),
			LoadState::Loading => {
				self.waiting.push(callback);
				LoadRequest::Queued
			}
			LoadState::Idle => {
				self.state = LoadState::Loading;
				self.waiting.push(callback);
				LoadRequest::Start
			}
		}
	}

	/// Record the end of a load, returning the callbacks to run.
	pub fn finish(&mut self, loaded: bool) -> Vec<C> {
		let waiting = std::mem::take(&mut self.waiting);
		if loaded {
			self.state = LoadState::Ready;
			waiting
		} else {
			self.state = LoadState::Idle;
			Vec::new()
		}
	}
}

type ReadyCallback = Box<dyn FnOnce()>;

thread_local! {
	static LOADER: RefCell<ScriptLoader<ReadyCallback>> = RefCell::new(ScriptLoader::default());
}

#[derive(Debug, Error)]
pub enum PlotlyError {
	#[error("Plotly is not loaded")]
	NotLoaded,
	#[error("failed to serialize figure: {0}")]
	Serialize(#[from] serde_json::Error),
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for PlotlyError {
	fn from(value: JsValue) -> Self {
		PlotlyError::Js(format!("{:?}", value))
	}
}

fn plotly_global() -> Option<JsValue> {
	let window = web_sys::window()?;
	let plotly = Reflect::get(&window, &JsValue::from_str("Plotly")).ok()?;
	if plotly.is_undefined() || plotly.is_null() {
		None
	} else {
		Some(plotly)
	}
}

/// Run `callback` once Plotly is available, loading it from `url` if needed.
pub fn ensure_plotly(url: &str, callback: impl FnOnce() + 'static) {
	let available = plotly_global().is_some();
	let request = LOADER.with(|loader| loader.borrow_mut().request(available, Box::new(callback)));

	match request {
		LoadRequest::RunNow(callback) => callback(),
		LoadRequest::Queued => debug!("energy-sunburst: Plotly load already in flight"),
		LoadRequest::Start => {
			debug!("energy-sunburst: loading Plotly from {}", url);
			if let Err(e) = inject_script(url) {
				warn!("energy-sunburst: could not inject Plotly script: {}", e);
				finish_load(false);
			}
		}
	}
}

fn finish_load(loaded: bool) {
	let ready = LOADER.with(|loader| loader.borrow_mut().finish(loaded));
	if loaded {
		info!("energy-sunburst: Plotly loaded");
	} else {
		warn!("energy-sunburst: failed to load Plotly, chart rendering skipped");
	}
	for callback in ready {
		callback();
	}
}

fn inject_script(url: &str) -> Result<(), PlotlyError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| PlotlyError::Js("no document".into()))?;
	let head = document
		.head()
		.ok_or_else(|| PlotlyError::Js("document has no <head>".into()))?;

	let script: HtmlScriptElement = document
		.create_element("script")?
		.dyn_into()
		.map_err(|_| PlotlyError::Js("created element is not a <script>".into()))?;
	script.set_src(url);
	script.set_type("text/javascript");

	let onload = Closure::once_into_js(move || finish_load(true));
	let onerror = Closure::once_into_js(move || finish_load(false));
	script.set_onload(Some(onload.unchecked_ref()));
	script.set_onerror(Some(onerror.unchecked_ref()));

	head.append_child(&script)?;
	Ok(())
}

fn call_plotly(method: &str, args: &Array) -> Result<JsValue, PlotlyError> {
	let plotly = plotly_global().ok_or(PlotlyError::NotLoaded)?;
	let func: Function = Reflect::get(&plotly, &JsValue::from_str(method))?.dyn_into()?;
	Ok(func.apply(&plotly, args)?)
}

fn figure_args(container: &Element, figure: &SunburstFigure) -> Result<Array, PlotlyError> {
	let args = Array::new();
	args.push(container);
	args.push(&JSON::parse(&figure.data_json()?)?);
	args.push(&JSON::parse(&figure.layout_json()?)?);
	args.push(&JSON::parse(&figure.config_json()?)?);
	Ok(args)
}

fn log_rejection(promise: JsValue, method: &'static str) {
	let Ok(promise) = promise.dyn_into::<Promise>() else {
		return;
	};
	let on_error = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
		warn!("energy-sunburst: Plotly.{} failed: {:?}", method, e);
	});
	let _ = promise.catch(&on_error);
	on_error.forget();
}

/// Label of the first clicked point in a Plotly click event.
fn clicked_label(event: &JsValue) -> Option<String> {
	let points: Array = Reflect::get(event, &JsValue::from_str("points")).ok()?.dyn_into().ok()?;
	Reflect::get(&points.get(0), &JsValue::from_str("label"))
		.ok()?
		.as_string()
}

/// First draw into `container`, subscribing `on_click` to segment clicks.
///
/// `on_click` receives the clicked label, or `None` when the event carries no
/// point. The handler suppresses Plotly's own drill-down so the card's focus
/// state stays authoritative.
pub fn new_plot(
	container: &Element,
	figure: &SunburstFigure,
	mut on_click: impl FnMut(Option<String>) + 'static,
) -> Result<(), PlotlyError> {
	let promise = call_plotly("newPlot", &figure_args(container, figure)?)?;

	let handler = Closure::<dyn FnMut(JsValue) -> bool>::new(move |event: JsValue| {
		on_click(clicked_label(&event));
		false
	});
	let on: Function = Reflect::get(container, &JsValue::from_str("on"))?.dyn_into()?;
	on.call2(container, &JsValue::from_str(SUNBURST_CLICK_EVENT), handler.as_ref())?;
	handler.forget();

	log_rejection(promise, "newPlot");
	Ok(())
}

/// Redraw `container` in place with a new figure.
pub fn react(container: &Element, figure: &SunburstFigure) -> Result<(), PlotlyError> {
	let promise = call_plotly("react", &figure_args(container, figure)?)?;
	log_rejection(promise, "react");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_request_starts_a_load() {
		let mut loader = ScriptLoader::default();
		assert_eq!(loader.request(false, 1), LoadRequest::Start);
		assert_eq!(loader.state(), LoadState::Loading);
	}

	#[test]
	fn concurrent_requests_queue_behind_one_load() {
		let mut loader = ScriptLoader::default();
		assert_eq!(loader.request(false, 1), LoadRequest::Start);
		assert_eq!(loader.request(false, 2), LoadRequest::Queued);
		assert_eq!(loader.request(false, 3), LoadRequest::Queued);
		assert_eq!(loader.queued(), 3);
		assert_eq!(loader.finish(true), [1, 2, 3]);
		assert_eq!(loader.state(), LoadState::Ready);
		assert_eq!(loader.request(false, 4), LoadRequest::RunNow(4));
	}

	#[test]
	fn failure_drops_the_queue_and_allows_retry() {
		let mut loader = ScriptLoader::default();
		loader.request(false, 1);
		loader.request(false, 2);
		assert!(loader.finish(false).is_empty());
		assert_eq!(loader.state(), LoadState::Idle);
		assert_eq!(loader.queued(), 0);
		assert_eq!(loader.request(false, 3), LoadRequest::Start);
	}

	#[test]
	fn already_present_resource_runs_immediately() {
		let mut loader = ScriptLoader::default();
		assert_eq!(loader.request(true, 1), LoadRequest::RunNow(1));
		assert_eq!(loader.state(), LoadState::Ready);
	}
}
