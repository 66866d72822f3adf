use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};
use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::core::{ParsedTable, SharedVariableStore, VariableBatch, parse_table_bytes};
use crate::error::{ScatterError, ScatterResult};
use crate::fetch::{DataSource, Resource, ResourceKind, ResourceLocator};

type SharedFetch = Shared<BoxFuture<'static, ScatterResult<Arc<ParsedTable>>>>;

/// Collection and region the cached columns currently belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchScope {
    pub collection: String,
    pub region: Option<String>,
}

#[derive(Default)]
struct CoordinatorState {
    scope: Option<FetchScope>,
    epoch: u64,
    in_flight: HashMap<String, SharedFetch>,
}

struct CoordinatorInner {
    source: Arc<dyn DataSource>,
    store: SharedVariableStore,
    locator: ResourceLocator,
    wide_variables: IndexMap<String, Vec<String>>,
    state: Mutex<CoordinatorState>,
}

/// Loads missing variables into the store, one request per resource.
///
/// Concurrent calls share in-flight resources, and a call commits either
/// every resource it needed or none of them. Changing scope, or calling
/// [`FetchCoordinator::advance_generation`], makes outstanding calls resolve
/// with [`ScatterError::Superseded`] instead of writing.
#[derive(Clone)]
pub struct FetchCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl FetchCoordinator {
    #[must_use]
    pub fn new(
        source: Arc<dyn DataSource>,
        store: SharedVariableStore,
        locator: ResourceLocator,
        wide_variables: IndexMap<String, Vec<String>>,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                source,
                store,
                locator,
                wide_variables,
                state: Mutex::new(CoordinatorState::default()),
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &SharedVariableStore {
        &self.inner.store
    }

    #[must_use]
    pub fn locator(&self) -> &ResourceLocator {
        &self.inner.locator
    }

    /// Current request generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.state.lock().epoch
    }

    #[must_use]
    pub fn scope(&self) -> Option<FetchScope> {
        self.inner.state.lock().scope.clone()
    }

    /// Declared wide-file columns for `collection`.
    #[must_use]
    pub fn wide_members(&self, collection: &str) -> &[String] {
        self.inner
            .wide_variables
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether cached columns belong to `collection`/`region`.
    ///
    /// Before the first call any seeded data counts as active.
    #[must_use]
    pub fn is_active_scope(&self, collection: &str, region: Option<&str>) -> bool {
        let scope = self.normalize_scope(collection, region);
        self.inner
            .state
            .lock()
            .scope
            .as_ref()
            .is_none_or(|active| *active == scope)
    }

    /// Whether `ensure` would resolve without any request.
    #[must_use]
    pub fn is_resident(&self, requested: &[String], collection: &str, region: Option<&str>) -> bool {
        if !self.is_active_scope(collection, region) {
            return false;
        }
        let store = self.inner.store.read();
        requested.iter().all(|name| store.has(collection, name))
    }

    /// Discards the results of every outstanding call without touching the cache.
    pub fn advance_generation(&self) -> u64 {
        let mut state = self.inner.state.lock();
        state.epoch += 1;
        state.in_flight.clear();
        trace!(epoch = state.epoch, "advanced request generation");
        state.epoch
    }

    /// Drops cached variables of `collection`.
    pub fn invalidate(&self, collection: &str) -> usize {
        self.inner.store.write().invalidate(collection)
    }

    /// Makes every variable of `requested` resident for `collection`.
    ///
    /// Resolves without any request when all of them are cached.
    pub async fn ensure(
        &self,
        requested: &[String],
        collection: &str,
        region: Option<&str>,
    ) -> ScatterResult<VariableBatch> {
        let requested: Vec<String> = requested
            .iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        self.inner.locator.required_region(collection, region)?;
        let scope = self.normalize_scope(collection, region);
        let region = scope.region.clone();

        let (epoch, pending) = {
            let mut state = self.inner.state.lock();
            let epoch = self.enter_scope(&mut state, &scope);

            let missing: Vec<String> = {
                let store = self.inner.store.read();
                requested
                    .iter()
                    .filter(|name| !store.has(collection, name))
                    .cloned()
                    .collect()
            };
            if missing.is_empty() {
                trace!(collection, variables = requested.len(), "all variables cached");
                return Ok(self.inner.store.read().snapshot(collection, &requested));
            }

            let resources = self.inner.locator.plan(
                collection,
                region.as_deref(),
                &missing,
                self.wide_members(collection),
            )?;
            let pending: Vec<(Resource, SharedFetch)> = resources
                .into_iter()
                .map(|resource| {
                    let fetch = match state.in_flight.get(&resource.url) {
                        Some(fetch) => {
                            debug!(url = %resource.url, "joining in-flight request");
                            fetch.clone()
                        }
                        None => {
                            let fetch = self.start_fetch(&resource);
                            state.in_flight.insert(resource.url.clone(), fetch.clone());
                            fetch
                        }
                    };
                    (resource, fetch)
                })
                .collect();
            debug!(
                collection,
                region = region.as_deref().unwrap_or(""),
                missing = missing.len(),
                resources = pending.len(),
                epoch,
                "dispatching fetches"
            );
            (epoch, pending)
        };

        let outcome = try_join_all(pending.iter().map(|(_, fetch)| fetch.clone())).await;

        let mut state = self.inner.state.lock();
        if state.epoch != epoch {
            debug!(
                collection,
                stale_epoch = epoch,
                epoch = state.epoch,
                "discarding superseded fetch"
            );
            return Err(ScatterError::Superseded { epoch: state.epoch });
        }
        for (resource, _) in &pending {
            state.in_flight.remove(&resource.url);
        }
        let tables = outcome?;

        let mut store = self.inner.store.write();
        for ((resource, _), table) in pending.iter().zip(&tables) {
            match &resource.kind {
                ResourceKind::Wide => {
                    store.put_wide(collection, table, self.wide_members(collection));
                }
                ResourceKind::Variable(name) => store.put(collection, name, table.column_at(1)),
                ResourceKind::ReducedPair(..) => {
                    store.put_wide(collection, table, &table.header);
                }
            }
        }
        drop(state);
        Ok(store.snapshot(collection, &requested))
    }

    /// Fetches the reduced two-variable file for `collection`.
    ///
    /// Failures are logged and yield an empty batch.
    pub async fn fetch_reduced_pair(
        &self,
        collection: &str,
        var_a: &str,
        var_b: &str,
    ) -> VariableBatch {
        let kind = ResourceKind::reduced_pair(var_a, var_b);
        let url = match self.inner.locator.resolve(collection, None, &kind) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, collection, "cannot resolve reduced pair");
                return VariableBatch::new();
            }
        };

        let table = match self.start_fetch(&Resource { kind, url }).await {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, collection, "reduced pair unavailable");
                return VariableBatch::new();
            }
        };

        let mut store = self.inner.store.write();
        let written = store.put_wide(collection, &table, &table.header);
        store.snapshot(collection, &written)
    }

    fn normalize_scope(&self, collection: &str, region: Option<&str>) -> FetchScope {
        let region = region
            .filter(|region| !region.is_empty() && self.inner.locator.is_regional(collection))
            .map(str::to_owned);
        FetchScope {
            collection: collection.to_owned(),
            region,
        }
    }

    /// Switches the active scope, invalidating the previous collection and
    /// starting a new generation when it changes.
    fn enter_scope(&self, state: &mut CoordinatorState, scope: &FetchScope) -> u64 {
        if state.scope.as_ref() == Some(scope) {
            return state.epoch;
        }
        if let Some(previous) = state.scope.take() {
            self.inner.store.write().invalidate(&previous.collection);
            state.epoch += 1;
            state.in_flight.clear();
            debug!(
                from = %previous.collection,
                to = %scope.collection,
                epoch = state.epoch,
                "fetch scope changed"
            );
        }
        state.scope = Some(scope.clone());
        state.epoch
    }

    fn start_fetch(&self, resource: &Resource) -> SharedFetch {
        let source = Arc::clone(&self.inner.source);
        let url = resource.url.clone();
        let schema = resource.schema();
        async move {
            let body = source.fetch_bytes(&url).await?;
            let table = parse_table_bytes(&body, schema)?;
            Ok(Arc::new(table))
        }
        .boxed()
        .shared()
    }
}
