use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{
    ColumnValues, JoinedRow, SharedVariableStore, SizeMapping, VariableBatch, VariableStore,
    join_columns,
};
use crate::error::{ScatterError, ScatterResult};
use crate::fetch::{DataSource, FetchCoordinator};
use crate::interaction::{HoverDebouncer, LocationRecord, PointerEvent, PointerEventKind};
use crate::render::{
    CompositionInput, HighlightAction, HighlightKind, RenderOptions, ScatterOptions,
    ScatterRenderer, Series, compose_render_options, locate_row,
};

use super::{NoopObserver, ScatterObserver, ScatterQuery, ScatterplotConfig};

/// Main orchestration facade consumed by host applications.
///
/// `ScatterplotView` owns the variable store for one plot, loads whatever
/// the current query is missing, composes the layered series, and routes
/// renderer pointer events back to the caller's observer.
pub struct ScatterplotView<R: ScatterRenderer> {
    renderer: R,
    config: ScatterplotConfig,
    store: SharedVariableStore,
    coordinator: FetchCoordinator,
    observer: Arc<dyn ScatterObserver>,
    hover: HoverDebouncer,
    query: ScatterQuery,
    selected: Vec<String>,
    highlighted: Vec<String>,
    hovered: Option<String>,
    overrides: ScatterOptions,
    composed: RenderOptions,
    frozen: bool,
    loading: bool,
    renderer_ready: bool,
    ready: bool,
    last_error: Option<ScatterError>,
}

impl<R: ScatterRenderer> ScatterplotView<R> {
    pub fn new(
        source: Arc<dyn DataSource>,
        renderer: R,
        config: ScatterplotConfig,
    ) -> ScatterResult<Self> {
        config.validate()?;
        let store = VariableStore::new().shared();
        let coordinator = FetchCoordinator::new(
            source,
            Arc::clone(&store),
            config.locator()?,
            config.wide_variables.clone(),
        );
        let hover = HoverDebouncer::new(config.hover_clear_delay());

        Ok(Self {
            renderer,
            config,
            store,
            coordinator,
            observer: Arc::new(NoopObserver),
            hover,
            query: ScatterQuery::default(),
            selected: Vec::new(),
            highlighted: Vec::new(),
            hovered: None,
            overrides: ScatterOptions::default(),
            composed: RenderOptions::default(),
            frozen: false,
            loading: false,
            renderer_ready: false,
            ready: false,
            last_error: None,
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScatterObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Arc<dyn ScatterObserver>) {
        self.observer = observer;
    }

    #[must_use]
    pub fn config(&self) -> &ScatterplotConfig {
        &self.config
    }

    #[must_use]
    pub fn query(&self) -> &ScatterQuery {
        &self.query
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn store(&self) -> &SharedVariableStore {
        &self.store
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Error of the last failed load; cleared by a successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<&ScatterError> {
        self.last_error.as_ref()
    }

    /// Options from the last composition pass.
    #[must_use]
    pub fn composed(&self) -> &RenderOptions {
        &self.composed
    }

    /// Composed series with the given id.
    #[must_use]
    pub fn data_series(&self, id: &str) -> Option<&Series> {
        self.composed.series_by_id(id)
    }

    /// Pre-populates a collection with caller supplied columns.
    pub fn seed(&mut self, collection: &str, columns: IndexMap<String, ColumnValues>) {
        self.store.write().seed(collection, columns);
    }

    /// Replaces the query; returns whether [`Self::load`] must run.
    pub fn set_query(&mut self, query: ScatterQuery) -> bool {
        let reload = self.query.needs_reload(&query);
        if reload {
            self.coordinator.advance_generation();
            debug!(
                collection = %query.collection,
                x = %query.x_var,
                y = %query.y_var,
                "query changed"
            );
        }
        self.query = query;
        reload
    }

    /// Loads every variable of the current query, then renders.
    ///
    /// Superseded loads resolve quietly without touching the view.
    pub async fn load(&mut self) -> ScatterResult<()> {
        if let Err(err) = self.query.validate() {
            self.fail(err.clone());
            return Err(err);
        }

        let variables = self.query.variables();
        let collection = self.query.collection.clone();
        let region = self.query.region.clone();
        let needs_fetch = !self
            .coordinator
            .is_resident(&variables, &collection, region.as_deref());
        if needs_fetch {
            self.set_loading(true);
        }

        let outcome = self
            .coordinator
            .ensure(&variables, &collection, region.as_deref())
            .await;
        match outcome {
            Ok(batch) => {
                self.last_error = None;
                if needs_fetch {
                    self.observer.on_data_loaded(&collection, &batch);
                    self.set_loading(false);
                }
                self.render()?;
                self.maybe_ready();
                Ok(())
            }
            Err(err) if err.is_superseded() => {
                debug!(error = %err, "load superseded");
                if needs_fetch {
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(err) => {
                if needs_fetch {
                    self.set_loading(false);
                }
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Re-runs the last load, typically after a fetch or parse failure.
    pub async fn retry(&mut self) -> ScatterResult<()> {
        self.load().await
    }

    /// Loads the reduced two-variable file for the x/y pair, then renders.
    pub async fn load_reduced_pair(&mut self) -> ScatterResult<VariableBatch> {
        self.query.validate()?;
        let batch = self
            .coordinator
            .fetch_reduced_pair(&self.query.collection, &self.query.x_var, &self.query.y_var)
            .await;
        if !batch.is_empty() {
            self.observer.on_data_loaded(&self.query.collection, &batch);
            self.render()?;
            self.maybe_ready();
        }
        Ok(batch)
    }

    pub fn set_selection(
        &mut self,
        selected: Vec<String>,
        highlighted: Vec<String>,
    ) -> ScatterResult<()> {
        if self.selected == selected && self.highlighted == highlighted {
            return Ok(());
        }
        self.selected = selected;
        self.highlighted = highlighted;
        self.render()
    }

    /// Replaces the caller's per-series overrides and passthrough options.
    pub fn set_overrides(&mut self, overrides: ScatterOptions) -> ScatterResult<()> {
        if self.overrides == overrides {
            return Ok(());
        }
        self.overrides = overrides;
        self.render()
    }

    /// Frozen views keep composing but stop pushing options to the renderer
    /// until unfrozen.
    pub fn set_frozen(&mut self, frozen: bool) -> ScatterResult<()> {
        let unfreeze = self.frozen && !frozen;
        self.frozen = frozen;
        if unfreeze {
            self.render()
        } else {
            Ok(())
        }
    }

    /// Joined rows for the current query, or `None` while a driving
    /// variable is not resident.
    pub fn joined_rows(&self) -> ScatterResult<Option<Vec<JoinedRow>>> {
        let query = &self.query;
        if !self
            .coordinator
            .is_active_scope(&query.collection, query.region.as_deref())
        {
            return Ok(None);
        }

        let store = self.store.read();
        let column = |name: &str| {
            store
                .get(&query.collection, name)
                .map(|variable| Arc::clone(&variable.values))
        };
        let (Some(x), Some(y)) = (column(&query.x_var), column(&query.y_var)) else {
            return Ok(None);
        };
        let z = match query.size_var() {
            Some(name) => match column(name) {
                Some(z) => Some(z),
                None => return Ok(None),
            },
            None => None,
        };
        drop(store);

        let mut columns: Vec<&ColumnValues> = vec![&*x, &*y];
        columns.extend(z.as_deref());
        join_columns(&columns).map(Some)
    }

    /// Composes the full options object for the current state.
    pub fn compose(&self) -> ScatterResult<RenderOptions> {
        let rows = self.joined_rows()?;
        let size_column = match (self.query.size_var(), rows.is_some()) {
            (Some(name), true) => self
                .store
                .read()
                .get(&self.query.collection, name)
                .map(|v| Arc::clone(&v.values)),
            _ => None,
        };
        let sizes = SizeMapping::from_column(
            size_column.as_deref(),
            self.config.scale_options(),
            self.config.fixed_marker_size,
        )?;

        Ok(compose_render_options(CompositionInput {
            rows: rows.as_deref(),
            sizes,
            selected: &self.selected,
            highlighted: &self.highlighted,
            options: &self.overrides,
        }))
    }

    /// Composes the current state and pushes it to the renderer unless frozen.
    pub fn render(&mut self) -> ScatterResult<()> {
        self.composed = self.compose()?;
        if self.frozen {
            debug!("view frozen; holding composed options");
            return Ok(());
        }
        self.renderer
            .set_loading(self.loading || self.composed.is_loading());
        self.renderer.set_option(&self.composed)
    }

    /// Marks the renderer ready; `on_ready` fires once data is also loaded.
    pub fn renderer_ready(&mut self) {
        self.renderer_ready = true;
        self.maybe_ready();
    }

    /// Routes a renderer pointer event to the observer.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let kind = event.kind;
        match kind {
            PointerEventKind::Click => {
                if let Some(id) = event.row_id() {
                    let location = self.location_record(&id);
                    self.observer.on_click(&location, &event);
                }
            }
            PointerEventKind::MouseMove => self.observer.on_mouse_move(&event),
            PointerEventKind::MouseOver | PointerEventKind::MouseOut => {
                let location = match kind {
                    PointerEventKind::MouseOver => event.row_id(),
                    _ => None,
                }
                .map(|id| self.location_record(&id));

                match location {
                    Some(location) => {
                        self.hover.cancel();
                        self.observer.on_hover(Some(&location), &event);
                    }
                    None => {
                        let observer = Arc::clone(&self.observer);
                        self.hover.schedule(move || observer.on_hover(None, &event));
                    }
                }
            }
        }
    }

    /// Moves the renderer highlight from the previous hovered id to `hovered`.
    pub fn set_hovered(&mut self, hovered: Option<String>) {
        if self.hovered == hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.toggle_highlight(&previous, HighlightKind::Downplay);
        }
        if let Some(next) = &hovered {
            self.toggle_highlight(next, HighlightKind::Highlight);
        }
        self.hovered = hovered;
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Every resident value for `id` in the active collection.
    #[must_use]
    pub fn location_record(&self, id: &str) -> LocationRecord {
        LocationRecord::from_store(id, &self.store.read(), &self.query.collection)
    }

    /// Cancels pending hover work; the view stays usable.
    pub fn teardown(&mut self) {
        self.hover.cancel();
    }

    fn toggle_highlight(&mut self, id: &str, kind: HighlightKind) {
        match locate_row(id, &self.composed.series).indices() {
            Some((series_index, data_index)) => self.renderer.dispatch_action(HighlightAction {
                kind,
                series_index,
                data_index,
            }),
            None => debug!(id, ?kind, "no plotted point to toggle"),
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.renderer.set_loading(loading);
        self.observer.on_loading(loading);
    }

    fn fail(&mut self, err: ScatterError) {
        warn!(error = %err, "scatterplot load failed");
        self.observer.on_error(&err);
        self.last_error = Some(err);
    }

    fn maybe_ready(&mut self) {
        if self.ready || !self.renderer_ready || self.loading || self.composed.is_loading() {
            return;
        }
        self.ready = true;
        self.observer.on_ready();
    }
}
