//! relinfo-store — Parameter-set metadata store and the related-info handler.
//!
//! Related URIs and publications live as parameter sets tagged with a schema
//! namespace. [`RelatedInfoHandler`] scopes the store to one experiment and
//! maps between typed records and raw parameter sets.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relinfo_common::{SchemaNamespaces, UriFormData};
//! use relinfo_store::{MemoryParameterStore, RelatedInfoHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryParameterStore::new());
//!     let rih = RelatedInfoHandler::new(store, SchemaNamespaces::default(), 1);
//!     rih.add_uri(&UriFormData {
//!         uri: "https://example.org/beamline".to_string(),
//!         ..Default::default()
//!     }).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handler;
pub mod memory;
pub mod parameter_store;

pub use error::{StoreError, Result};
pub use handler::RelatedInfoHandler;
pub use memory::{MemoryParameterStore, SeedFile, SeedParameterSet};
pub use parameter_store::ParameterStore;
