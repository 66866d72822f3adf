use crate::error::{ScatterError, ScatterResult};
use crate::render::{HighlightAction, RenderOptions, ScatterRenderer};

/// Headless renderer used by tests and server-side composition.
///
/// It still serializes every options object so tests catch payloads the
/// external renderer could not accept.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_options: Option<RenderOptions>,
    pub last_json: Option<serde_json::Value>,
    pub actions: Vec<HighlightAction>,
    pub loading: bool,
    pub set_option_calls: usize,
}

impl ScatterRenderer for NullRenderer {
    fn set_option(&mut self, options: &RenderOptions) -> ScatterResult<()> {
        let json = options.to_json_value().map_err(|e| {
            ScatterError::InvalidData(format!("failed to serialize render options: {e}"))
        })?;
        self.last_json = Some(json);
        self.last_options = Some(options.clone());
        self.set_option_calls += 1;
        Ok(())
    }

    fn option(&self) -> Option<&RenderOptions> {
        self.last_options.as_ref()
    }

    fn dispatch_action(&mut self, action: HighlightAction) {
        self.actions.push(action);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
