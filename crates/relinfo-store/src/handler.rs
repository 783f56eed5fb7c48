//! Related-info handler: one experiment's view of the parameter store.

use std::sync::Arc;

use relinfo_common::{
    AuxiliaryParameter, ExperimentId, ParameterSet, ParameterSetId, PublicationFormData,
    RelatedPublication, RelatedUri, SchemaNamespaces, UriFormData,
};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::parameter_store::ParameterStore;

/// Reads and writes related URIs and publications of a single experiment.
#[derive(Clone)]
pub struct RelatedInfoHandler {
    store: Arc<dyn ParameterStore>,
    schemas: SchemaNamespaces,
    experiment_id: ExperimentId,
}

impl RelatedInfoHandler {
    pub fn new(
        store: Arc<dyn ParameterStore>,
        schemas: SchemaNamespaces,
        experiment_id: ExperimentId,
    ) -> Self {
        Self { store, schemas, experiment_id }
    }

    pub fn experiment_id(&self) -> ExperimentId {
        self.experiment_id
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub async fn uris(&self) -> Result<Vec<RelatedUri>> {
        let sets = self.store.parameter_sets(self.experiment_id, &self.schemas.related_uri).await?;
        Ok(sets.iter().map(RelatedUri::from).collect())
    }

    pub async fn publications(&self) -> Result<Vec<RelatedPublication>> {
        let sets = self
            .store
            .parameter_sets(self.experiment_id, &self.schemas.related_publication)
            .await?;
        Ok(sets.iter().map(RelatedPublication::from).collect())
    }

    /// Every parameter of this experiment's sets under `namespace`.
    pub async fn auxiliary_parameters(&self, namespace: &str) -> Result<Vec<AuxiliaryParameter>> {
        let sets = self.store.parameter_sets(self.experiment_id, namespace).await?;
        Ok(sets
            .iter()
            .flat_map(|ps| {
                ps.parameters.iter().map(move |p| AuxiliaryParameter {
                    parameterset_id: ps.id,
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
            })
            .collect())
    }

    pub async fn uri_form_data(&self, id: ParameterSetId) -> Result<UriFormData> {
        let ps = self.owned_set(id, &self.schemas.related_uri).await?;
        Ok(UriFormData::from_parameters(&ps.parameters))
    }

    pub async fn publication_form_data(&self, id: ParameterSetId) -> Result<PublicationFormData> {
        let ps = self.owned_set(id, &self.schemas.related_publication).await?;
        Ok(PublicationFormData::from_parameters(&ps.parameters))
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    pub async fn add_uri(&self, data: &UriFormData) -> Result<ParameterSetId> {
        let id = self
            .store
            .create_parameter_set(self.experiment_id, &self.schemas.related_uri, data.to_parameters())
            .await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Added related URI");
        Ok(id)
    }

    pub async fn add_publication(&self, data: &PublicationFormData) -> Result<ParameterSetId> {
        let id = self
            .store
            .create_parameter_set(
                self.experiment_id,
                &self.schemas.related_publication,
                data.to_parameters(),
            )
            .await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Added related publication");
        Ok(id)
    }

    pub async fn edit_uri(&self, data: &UriFormData, id: ParameterSetId) -> Result<()> {
        self.owned_set(id, &self.schemas.related_uri).await?;
        self.store.replace_parameters(id, data.to_parameters()).await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Updated related URI");
        Ok(())
    }

    pub async fn edit_publication(&self, data: &PublicationFormData, id: ParameterSetId) -> Result<()> {
        self.owned_set(id, &self.schemas.related_publication).await?;
        self.store.replace_parameters(id, data.to_parameters()).await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Updated related publication");
        Ok(())
    }

    pub async fn delete_uri(&self, id: ParameterSetId) -> Result<()> {
        self.owned_set(id, &self.schemas.related_uri).await?;
        self.store.delete_parameter_set(id).await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Deleted related URI");
        Ok(())
    }

    pub async fn delete_publication(&self, id: ParameterSetId) -> Result<()> {
        self.owned_set(id, &self.schemas.related_publication).await?;
        self.store.delete_parameter_set(id).await?;
        info!(experiment_id = self.experiment_id, parameterset_id = id, "Deleted related publication");
        Ok(())
    }

    /// Fetch a set that belongs to this experiment and carries `schema`.
    /// Anything else is reported as not found.
    async fn owned_set(&self, id: ParameterSetId, schema: &str) -> Result<ParameterSet> {
        let ps = self.store.parameter_set(id).await?;
        if ps.experiment_id != self.experiment_id || ps.schema != schema {
            return Err(StoreError::NotFound(id));
        }
        Ok(ps)
    }
}
