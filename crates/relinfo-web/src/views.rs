//! View models handed to the templates.

use relinfo_common::{AuxiliaryParameter, ExperimentId, RelatedPublication, RelatedUri};
use serde::Serialize;

use crate::forms::FormContext;
use crate::paths::IndexLinks;

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub experiment_id: ExperimentId,
    pub has_write_permissions: bool,
    pub related_uris: Vec<RelatedUri>,
    pub related_publications: Vec<RelatedPublication>,
    pub other_info: Vec<AuxiliaryParameter>,
    pub links: IndexLinks,
}

/// Add/edit form page. `url` is where the form posts back to.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub url: String,
    pub form: FormContext,
}
