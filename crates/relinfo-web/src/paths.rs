//! Route patterns and the URLs built from them.

use relinfo_common::{ExperimentId, ParameterSetId};
use serde::Serialize;

pub const INDEX: &str = "/experiment/{experiment_id}/related-info/";
pub const ADD_URI: &str = "/experiment/{experiment_id}/related-info/uri/add/";
pub const ADD_PUBLICATION: &str = "/experiment/{experiment_id}/related-info/publication/add/";
pub const EDIT_URI: &str = "/experiment/{experiment_id}/related-info/uri/{parameterset_id}/edit/";
pub const EDIT_PUBLICATION: &str =
    "/experiment/{experiment_id}/related-info/publication/{parameterset_id}/edit/";
pub const DELETE_URI: &str = "/experiment/{experiment_id}/related-info/uri/{parameterset_id}/delete/";
pub const DELETE_PUBLICATION: &str =
    "/experiment/{experiment_id}/related-info/publication/{parameterset_id}/delete/";

fn base(experiment_id: ExperimentId) -> String {
    format!("/experiment/{}/related-info/", experiment_id)
}

pub fn index(experiment_id: ExperimentId) -> String {
    base(experiment_id)
}

pub fn add_uri(experiment_id: ExperimentId) -> String {
    format!("{}uri/add/", base(experiment_id))
}

pub fn add_publication(experiment_id: ExperimentId) -> String {
    format!("{}publication/add/", base(experiment_id))
}

pub fn edit_uri(experiment_id: ExperimentId, id: ParameterSetId) -> String {
    format!("{}uri/{}/edit/", base(experiment_id), id)
}

pub fn edit_publication(experiment_id: ExperimentId, id: ParameterSetId) -> String {
    format!("{}publication/{}/edit/", base(experiment_id), id)
}

pub fn delete_uri(experiment_id: ExperimentId, id: ParameterSetId) -> String {
    format!("{}uri/{}/delete/", base(experiment_id), id)
}

pub fn delete_publication(experiment_id: ExperimentId, id: ParameterSetId) -> String {
    format!("{}publication/{}/delete/", base(experiment_id), id)
}

/// Link prefixes handed to the index template.
#[derive(Debug, Clone, Serialize)]
pub struct IndexLinks {
    pub add_uri: String,
    pub add_publication: String,
    pub uri_base: String,
    pub publication_base: String,
}

impl IndexLinks {
    pub fn for_experiment(experiment_id: ExperimentId) -> Self {
        Self {
            add_uri: add_uri(experiment_id),
            add_publication: add_publication(experiment_id),
            uri_base: format!("{}uri/", base(experiment_id)),
            publication_base: format!("{}publication/", base(experiment_id)),
        }
    }
}
