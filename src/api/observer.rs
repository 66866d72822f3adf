use crate::core::VariableBatch;
use crate::error::ScatterError;
use crate::interaction::{LocationRecord, PointerEvent};

/// Caller callbacks for one view.
///
/// Every hook defaults to a no-op. Hooks may run from the async runtime
/// (delayed hover clears), so implementations must be `Send + Sync`.
pub trait ScatterObserver: Send + Sync {
    fn on_ready(&self) {}

    /// `None` reports that nothing is hovered any more.
    fn on_hover(&self, _location: Option<&LocationRecord>, _event: &PointerEvent) {}

    fn on_click(&self, _location: &LocationRecord, _event: &PointerEvent) {}

    fn on_mouse_move(&self, _event: &PointerEvent) {}

    fn on_error(&self, _error: &ScatterError) {}

    fn on_loading(&self, _loading: bool) {}

    fn on_data_loaded(&self, _collection: &str, _variables: &VariableBatch) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScatterObserver for NoopObserver {}
