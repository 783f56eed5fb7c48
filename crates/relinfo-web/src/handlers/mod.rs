//! HTTP handlers for all web routes.

pub mod related_info;
pub mod system;
