//! Leptos component wrapping the Plotly sunburst.
//!
//! The component renders a single chart container. One effect installs each
//! configuration write into the headless [`SunburstCard`]; a second feeds it
//! host state and (re)draws through Plotly once the script is loaded.
//! Segment clicks update the card's focus and redraw in place.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use web_sys::Element;

use super::card::{CardError, SunburstCard};
use super::plotly;
use super::types::SunburstConfig;
use super::values::StateSnapshot;

const VERSION_LABEL: &str = concat!("Version ", env!("CARGO_PKG_VERSION"));

/// Card controller shared between the effect and Plotly callbacks.
#[derive(Clone)]
struct CardContext {
	card: Rc<RefCell<SunburstCard>>,
	/// Whether `newPlot` has run and the click handler is attached.
	plotted: Rc<Cell<bool>>,
}

impl CardContext {
	fn render(&self, container: &Element) {
		let figure = {
			let mut card = self.card.borrow_mut();
			match card.figure() {
				Ok(figure) => figure,
				Err(CardError::NotConfigured) => return,
				Err(e) => {
					warn!("energy-sunburst: {}, returning to overview", e);
					card.reset_focus();
					match card.figure() {
						Ok(figure) => figure,
						Err(_) => return,
					}
				}
			}
		};

		if self.plotted.get() {
			if let Err(e) = plotly::react(container, &figure) {
				warn!("energy-sunburst: chart update skipped: {}", e);
			}
			return;
		}

		let (ctx, click_container) = (self.clone(), container.clone());
		let on_click = move |label: Option<String>| {
			ctx.card.borrow_mut().click(label.as_deref());
			ctx.render(&click_container);
		};
		match plotly::new_plot(container, &figure, on_click) {
			Ok(()) => self.plotted.set(true),
			Err(e) => warn!("energy-sunburst: chart rendering skipped: {}", e),
		}
	}
}

/// Renders an energy sunburst card.
///
/// `config` carries the validated card configuration; `None` renders an empty
/// container. `states` is the host's latest state snapshot, used to resolve
/// `sensor.*` values. Every configuration write resets drill-down to the
/// overview, even when the new configuration equals the old one; a state
/// update keeps the current focus.
#[component]
pub fn EnergySunburstCard(
	#[prop(into)] config: Signal<Option<SunburstConfig>>,
	#[prop(into)] states: Signal<StateSnapshot>,
) -> impl IntoView {
	let chart_ref = NodeRef::<leptos::html::Div>::new();
	let context = CardContext {
		card: Rc::new(RefCell::new(SunburstCard::new())),
		plotted: Rc::new(Cell::new(false)),
	};

	// Bumped after every configuration install so redraws follow it.
	let revision = RwSignal::new(0u64);

	let config_ctx = context.clone();
	Effect::new(move |_| {
		if let Some(cfg) = config.get() {
			config_ctx.card.borrow_mut().set_config(cfg);
			revision.update(|r| *r += 1);
		}
	});

	Effect::new(move |_| {
		revision.track();
		let snapshot = states.get();
		context.card.borrow_mut().on_external_state_update(snapshot);

		let url = context.card.borrow().config().map(|cfg| cfg.plotly_url.clone());
		if let (Some(div), Some(url)) = (chart_ref.get(), url) {
			let container: Element = div.into();
			let ctx = context.clone();
			plotly::ensure_plotly(&url, move || ctx.render(&container));
		}
	});

	view! {
		<div
			class="sunburst-container"
			style="width: 100%; height: 100%; display: flex; justify-content: center; align-items: center; position: relative; overflow: hidden; background-color: transparent; border-radius: 12px; box-shadow: 0px 4px 6px rgba(0, 0, 0, 0.1);"
		>
			<div node_ref=chart_ref class="sunburst-chart" style="flex: 1; max-width: 100%; max-height: 100%; margin: 10px;" />
			<div
				class="version-label"
				style="position: absolute; bottom: 10px; right: 10px; font-size: 12px; color: #888; font-family: Arial, sans-serif; opacity: 0.8; background: rgba(255, 255, 255, 0.7); padding: 2px 6px; border-radius: 4px; box-shadow: 0px 2px 4px rgba(0, 0, 0, 0.1);"
			>
				{VERSION_LABEL}
			</div>
		</div>
	}
}
