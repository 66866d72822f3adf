//! Caller-facing view facade.

mod config;
mod observer;
mod view;

pub use config::{ScatterQuery, ScatterplotConfig};
pub use observer::{NoopObserver, ScatterObserver};
pub use view::ScatterplotView;
