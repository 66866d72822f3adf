mod composer;
mod index;
mod layer_stack;
pub mod merge;
mod null_renderer;
mod series;

pub use composer::{CompositionInput, compose_render_options, compose_series};
pub use index::{SeriesLocation, locate_row};
pub use layer_stack::SeriesKind;
pub use null_renderer::NullRenderer;
pub use series::{
    EmphasisStyle, ItemStyle, LabelStyle, RenderOptions, ScatterOptions, Series, SeriesData,
    SeriesOverride, SeriesPoint, SeriesStyle,
};

use serde::{Deserialize, Serialize};

use crate::error::ScatterResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Highlight,
    Downplay,
}

/// Imperative highlight toggle dispatched to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightAction {
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub series_index: usize,
    pub data_index: usize,
}

/// Contract implemented by the external chart renderer.
///
/// The renderer receives a fully composed declarative `RenderOptions`, so
/// drawing stays isolated from data loading and joining.
pub trait ScatterRenderer {
    fn set_option(&mut self, options: &RenderOptions) -> ScatterResult<()>;

    /// Options most recently accepted by the renderer.
    fn option(&self) -> Option<&RenderOptions>;

    fn dispatch_action(&mut self, action: HighlightAction);

    fn set_loading(&mut self, loading: bool);
}
