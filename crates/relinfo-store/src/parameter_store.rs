//! Parameter store trait - the data-access seam behind the related-info handler.

use async_trait::async_trait;
use relinfo_common::{ExperimentId, Parameter, ParameterSet, ParameterSetId};
use crate::error::Result;

/// Generic experiment metadata store.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// All parameter sets of an experiment tagged with `schema`, ordered by id.
    async fn parameter_sets(
        &self,
        experiment_id: ExperimentId,
        schema: &str,
    ) -> Result<Vec<ParameterSet>>;

    /// Fetch one parameter set. Missing ids yield `StoreError::NotFound`.
    async fn parameter_set(&self, id: ParameterSetId) -> Result<ParameterSet>;

    /// Create a parameter set and return its new id.
    async fn create_parameter_set(
        &self,
        experiment_id: ExperimentId,
        schema: &str,
        parameters: Vec<Parameter>,
    ) -> Result<ParameterSetId>;

    /// Replace every parameter of an existing set.
    async fn replace_parameters(
        &self,
        id: ParameterSetId,
        parameters: Vec<Parameter>,
    ) -> Result<()>;

    async fn delete_parameter_set(&self, id: ParameterSetId) -> Result<()>;
}
