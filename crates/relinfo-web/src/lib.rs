//! relinfo-web — Related-information pages for experiments.
//! Lets experiment writers attach related URIs and publication citations,
//! and lets readers browse them next to the experiment's annotations.

pub mod auth;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod paths;
pub mod router;
pub mod state;
pub mod templates;
pub mod views;
