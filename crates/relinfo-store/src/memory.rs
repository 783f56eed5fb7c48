//! In-memory parameter store.
//!
//! Keeps parameter sets in a `BTreeMap` behind an async `RwLock`. Ids are
//! handed out monotonically and never reused after a delete. The store can be
//! seeded from a JSON file so a fresh server has something to show.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use relinfo_common::{ExperimentId, Parameter, ParameterSet, ParameterSetId};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::parameter_store::ParameterStore;

/// On-disk seed format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub parameter_sets: Vec<SeedParameterSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedParameterSet {
    pub experiment_id: ExperimentId,
    pub schema: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Default)]
struct Inner {
    next_id: ParameterSetId,
    sets: BTreeMap<ParameterSetId, ParameterSet>,
}

#[derive(Default)]
pub struct MemoryParameterStore {
    inner: RwLock<Inner>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON seed file.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: SeedFile = serde_json::from_str(&raw)?;
        let store = Self::new();
        let count = store.load_seed(seed).await?;
        info!(path = %path.display(), count, "Seeded parameter store");
        Ok(store)
    }

    /// Insert every seeded parameter set, returning how many were added.
    pub async fn load_seed(&self, seed: SeedFile) -> Result<usize> {
        if let Some(bad) = seed.parameter_sets.iter().find(|s| s.schema.trim().is_empty()) {
            return Err(StoreError::InvalidSeed(format!(
                "parameter set for experiment {} has an empty schema",
                bad.experiment_id
            )));
        }
        let count = seed.parameter_sets.len();
        for set in seed.parameter_sets {
            self.create_parameter_set(set.experiment_id, &set.schema, set.parameters).await?;
        }
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn parameter_sets(
        &self,
        experiment_id: ExperimentId,
        schema: &str,
    ) -> Result<Vec<ParameterSet>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sets
            .values()
            .filter(|ps| ps.experiment_id == experiment_id && ps.schema == schema)
            .cloned()
            .collect())
    }

    async fn parameter_set(&self, id: ParameterSetId) -> Result<ParameterSet> {
        let inner = self.inner.read().await;
        inner.sets.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create_parameter_set(
        &self,
        experiment_id: ExperimentId,
        schema: &str,
        parameters: Vec<Parameter>,
    ) -> Result<ParameterSetId> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();
        inner.sets.insert(id, ParameterSet {
            id,
            experiment_id,
            schema: schema.to_string(),
            parameters,
            created: now,
            modified: now,
        });
        debug!(parameterset_id = id, experiment_id, schema, "Created parameter set");
        Ok(id)
    }

    async fn replace_parameters(
        &self,
        id: ParameterSetId,
        parameters: Vec<Parameter>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let ps = inner.sets.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        ps.parameters = parameters;
        ps.modified = Utc::now();
        debug!(parameterset_id = id, "Replaced parameters");
        Ok(())
    }

    async fn delete_parameter_set(&self, id: ParameterSetId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.sets.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!(parameterset_id = id, "Deleted parameter set");
        Ok(())
    }
}
