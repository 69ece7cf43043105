//! Charts module - chart rendering

mod plotter;

pub use plotter::{format_currency, ChartKind, ChartPlotter, ChartStyle};
