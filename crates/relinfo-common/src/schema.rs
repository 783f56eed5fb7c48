//! Schema namespaces that tag parameter sets in the metadata store.

use serde::{Deserialize, Serialize};

/// Experiment annotations shown read-only on the related-info index page.
pub const AUXILIARY_SCHEMA_NAMESPACE: &str =
    "http://www.tardis.edu.au/schemas/experiment/annotation/2011/07/07";

pub const RELATED_URI_SCHEMA_NAMESPACE: &str =
    "http://www.tardis.edu.au/schemas/related_info/uri/2011/11/10";

pub const RELATED_PUBLICATION_SCHEMA_NAMESPACE: &str =
    "http://www.tardis.edu.au/schemas/related_info/publication/2011/11/10";

/// The three namespaces the related-info views care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNamespaces {
    #[serde(default = "default_auxiliary")]
    pub auxiliary: String,
    #[serde(default = "default_related_uri")]
    pub related_uri: String,
    #[serde(default = "default_related_publication")]
    pub related_publication: String,
}

fn default_auxiliary()           -> String { AUXILIARY_SCHEMA_NAMESPACE.to_string() }
fn default_related_uri()         -> String { RELATED_URI_SCHEMA_NAMESPACE.to_string() }
fn default_related_publication() -> String { RELATED_PUBLICATION_SCHEMA_NAMESPACE.to_string() }

impl Default for SchemaNamespaces {
    fn default() -> Self {
        Self {
            auxiliary: default_auxiliary(),
            related_uri: default_related_uri(),
            related_publication: default_related_publication(),
        }
    }
}
