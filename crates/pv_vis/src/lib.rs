//! Scatterplot of the corpus embedding: a precomputed 2D layout joined with item
//! metadata, rendered to SVG with tooltips and per-point links.

pub mod loader;
pub mod plot;
pub mod scale;

pub use loader::{FileSource, PlotLoader, PlotSource};
pub use plot::{PlacedPoint, ScatterPlot, Tooltip};
pub use scale::LinearScale;

pub mod prelude {
    pub use super::{FileSource, LinearScale, PlotLoader, PlotSource, ScatterPlot, Tooltip};
    pub use pv_core::{ItemInfo, PlotPoint, Result};
}
