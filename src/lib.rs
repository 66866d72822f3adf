//! scatter-rs: data-join and view-composition engine for scatterplots.
//!
//! Variables arrive as separate remote CSV resources. This crate fetches
//! only what is missing, joins the columns on their entity ids, maps a size
//! variable through an outlier-resistant scale, and composes the layered
//! series handed to an external chart renderer.

pub mod api;
pub mod core;
pub mod error;
pub mod fetch;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ScatterQuery, ScatterplotConfig, ScatterplotView};
pub use error::{ScatterError, ScatterResult};
