//! In-memory blueprint store.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, RwLock},
};

use tracing::debug;

use trellis_core::{
    application::{ApplicationError, ports::BlueprintStore},
    domain::Blueprint,
    error::TrellisResult,
};

use crate::builtin_blueprints;

/// Thread-safe store keyed by blueprint name.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<String, Blueprint>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the built-in blueprints plus any found on disk.
    pub fn with_builtin(local_path: Option<&Path>) -> TrellisResult<Self> {
        let store = Self::new();
        for blueprint in builtin_blueprints::all_blueprints(local_path)? {
            store.insert(blueprint)?;
        }
        Ok(store)
    }

    /// Insert, replacing any blueprint with the same name.
    pub fn insert(&self, blueprint: Blueprint) -> TrellisResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        if let Some(previous) = inner.insert(blueprint.name().to_string(), blueprint) {
            debug!(name = %previous.name(), "replaced blueprint");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlueprintStore for InMemoryStore {
    fn get(&self, name: &str) -> TrellisResult<Blueprint> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::BlueprintNotFound {
                name: name.to_string(),
                available: inner.keys().cloned().collect(),
            }
            .into()
        })
    }

    fn list(&self) -> TrellisResult<Vec<Blueprint>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.values().cloned().collect())
    }
}
