//! Energy-flow sunburst card.
//!
//! Renders a hierarchical energy dataset as a Plotly sunburst with
//! click-driven drill-down:
//! - Flat `(label, parent, value)` configuration columns
//! - Live `sensor.*` values resolved from host state snapshots
//! - Focus on a segment to show it as the root with its descendants
//! - Category colors from a built-in energy palette or per-card overrides
//!
//! The pure pieces ([`hierarchy`], [`drilldown`], [`values`], [`theme`],
//! [`chart`]) are independent of the DOM and are driven by [`SunburstCard`].
//!
//! # Example
//!
//! ```ignore
//! use energy_sunburst::{EnergySunburstCard, StateSnapshot, SunburstConfig};
//!
//! let config = SunburstConfig::from_json(r#"{
//!     "data": {
//!         "labels": ["Grid", "Solar", "Wind"],
//!         "parents": ["", "Grid", "Grid"],
//!         "values": [100, "sensor.solar_energy", 60]
//!     }
//! }"#).ok();
//!
//! view! {
//!     <EnergySunburstCard config=Signal::derive(move || config.clone()) states=StateSnapshot::default() />
//! }
//! ```

mod card;
pub mod chart;
mod component;
pub mod drilldown;
pub mod hierarchy;
pub mod plotly;
pub mod theme;
mod types;
pub mod values;

pub use card::{CARD_SIZE, CardError, SunburstCard};
pub use component::EnergySunburstCard;
pub use drilldown::{FocusClick, FocusState};
pub use hierarchy::{DrilldownDepth, HierarchyRow, ViewError, ViewRows, prepare_view};
pub use theme::{ColorMap, color_for, default_energy_colors};
pub use types::{ConfigError, DEFAULT_PLOTLY_URL, DEFAULT_UNIT, SunburstConfig, SunburstData};
pub use values::{RawValue, StateProvider, StateSnapshot};
