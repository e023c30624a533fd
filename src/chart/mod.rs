/// Declarative chart specifications built from the filtered subset.
///
/// `spec` holds the Vega-Lite shaped types, `compose` the three dashboard
/// charts. Rendering lives in `ui::charts`.

pub mod compose;
pub mod spec;

pub use compose::{bar_chart, line_chart, scatter_chart};
pub use spec::ChartSpec;
