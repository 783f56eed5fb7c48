//! relinfo-common — Shared types used across all relinfo crates.

pub mod entities;
pub mod schema;
pub mod user;

// Re-export commonly used types
pub use entities::{
    AuxiliaryParameter, ExperimentId, Parameter, ParameterSet, ParameterSetId,
    PublicationFormData, RelatedPublication, RelatedUri, UriFormData,
};
pub use schema::SchemaNamespaces;
pub use user::User;
