//! Shared application state for the web server.

use std::sync::Arc;

use relinfo_common::ExperimentId;
use relinfo_config::Config;
use relinfo_store::{MemoryParameterStore, ParameterStore, RelatedInfoHandler};
use tracing::info;

use crate::auth::{AclAuthorizer, AuthorizationProvider};
use crate::templates::Templates;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ParameterStore>,
    pub authz: Arc<dyn AuthorizationProvider>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ParameterStore>,
        authz: Arc<dyn AuthorizationProvider>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            store,
            authz,
            templates: Arc::new(Templates::new()?),
        })
    }

    /// Build state from configuration: in-memory store (seeded if configured)
    /// and ACLs from the `[auth]` section.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = match &config.store.seed_path {
            Some(path) => MemoryParameterStore::from_seed_file(path).await?,
            None => {
                info!("No seed file configured, starting with an empty store");
                MemoryParameterStore::new()
            }
        };
        let authz = AclAuthorizer::from_config(&config.auth);
        Self::new(config, Arc::new(store), Arc::new(authz))
    }

    /// Related-info handler scoped to one experiment.
    pub fn handler(&self, experiment_id: ExperimentId) -> RelatedInfoHandler {
        RelatedInfoHandler::new(self.store.clone(), self.config.schemas.clone(), experiment_id)
    }

    pub fn experiment_view_path(&self, experiment_id: ExperimentId) -> String {
        self.config.urls.experiment_view_path(experiment_id)
    }
}

pub type SharedState = Arc<AppState>;
