//! Reply rendering
//!
//! Maps a message to narrative text plus an optional table or chart. The
//! result is plain data; the UI decides how to paint it.

pub mod renderer;
pub mod visual;

pub use renderer::ResponseRenderer;
pub use visual::{
    humanize, Column, PieChart, RenderedMessage, SeriesChart, SeriesPoint, Slice, TableView,
    VisualForm, PIE_PALETTE,
};
