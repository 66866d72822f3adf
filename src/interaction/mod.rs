use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::core::{CellValue, VariableStore};

/// Default delay before a cleared hover is reported.
pub const DEFAULT_HOVER_CLEAR_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    MouseOver,
    MouseOut,
    MouseMove,
    Click,
}

/// Row payload attached to a renderer pointer event.
///
/// Renderers report either the raw `[v1, .., id]` tuple or an item object
/// wrapping it under `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointerDatum {
    Wrapped { value: Vec<Value> },
    Row(Vec<Value>),
}

impl PointerDatum {
    #[must_use]
    pub fn tuple(&self) -> &[Value] {
        match self {
            Self::Wrapped { value } => value,
            Self::Row(values) => values,
        }
    }

    /// Entity id, always the last tuple position.
    #[must_use]
    pub fn row_id(&self) -> Option<String> {
        match self.tuple().last()? {
            Value::String(id) => Some(id.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    #[serde(rename = "type")]
    pub kind: PointerEventKind,
    #[serde(default)]
    pub data: Option<PointerDatum>,
    #[serde(default)]
    pub series_index: Option<usize>,
    #[serde(default)]
    pub data_index: Option<usize>,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerEventKind) -> Self {
        Self {
            kind,
            data: None,
            series_index: None,
            data_index: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: PointerDatum) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn row_id(&self) -> Option<String> {
        self.data.as_ref()?.row_id()
    }
}

/// Every resident value for one entity, keyed by variable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    #[serde(flatten)]
    pub values: IndexMap<String, CellValue>,
}

impl LocationRecord {
    /// Reverse-joins `id` over every variable of `collection` that holds it.
    #[must_use]
    pub fn from_store(id: &str, store: &VariableStore, collection: &str) -> Self {
        let values = store
            .collection(collection)
            .into_iter()
            .flat_map(|variables| variables.iter())
            .filter_map(|(name, variable)| {
                variable
                    .value(id)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();
        Self {
            id: id.to_owned(),
            values,
        }
    }

    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&CellValue> {
        self.values.get(variable)
    }
}

/// Delays "nothing hovered" notifications so moving between adjacent points
/// does not flicker.
///
/// At most one clear is pending; scheduling replaces it and a new hover
/// cancels it. Dropping the debouncer cancels the pending task.
#[derive(Debug)]
pub struct HoverDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for HoverDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_HOVER_CLEAR_DELAY)
    }
}

impl HoverDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels a pending clear; returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                if waiting {
                    trace!("cancelled pending hover clear");
                }
                waiting
            }
            None => false,
        }
    }

    /// Runs `on_clear` after the delay unless cancelled first.
    ///
    /// Outside a tokio runtime the clear runs immediately.
    pub fn schedule<F>(&mut self, on_clear: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let delay = self.delay;
                self.pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    on_clear();
                }));
                trace!(delay_ms = delay.as_millis() as u64, "scheduled hover clear");
            }
            Err(_) => {
                warn!("no async runtime; clearing hover immediately");
                on_clear();
            }
        }
    }
}

impl Drop for HoverDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
