//! UI components.

pub mod energy_sunburst;
