//! Authorization: who is asking, and may they read or write an experiment.

use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use relinfo_common::{ExperimentId, User};
use relinfo_config::{AuthConfig, ExperimentAcl};

use crate::state::SharedState;

/// Access checks keyed by (user, experiment id).
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    async fn has_read_access(&self, user: &User, experiment_id: ExperimentId) -> bool;

    async fn has_write_access(&self, user: &User, experiment_id: ExperimentId) -> bool;
}

/// Static access control lists loaded from configuration.
///
/// Owners and writers may read and write, readers may read, and anyone
/// (anonymous included) may read a public experiment. Experiments without an
/// entry grant nothing.
#[derive(Debug, Clone, Default)]
pub struct AclAuthorizer {
    acls: HashMap<ExperimentId, ExperimentAcl>,
}

impl AclAuthorizer {
    pub fn new(acls: impl IntoIterator<Item = ExperimentAcl>) -> Self {
        Self { acls: acls.into_iter().map(|acl| (acl.id, acl)).collect() }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.experiments.iter().cloned())
    }

    fn can_write(acl: &ExperimentAcl, name: &str) -> bool {
        acl.owners.iter().chain(&acl.writers).any(|u| u == name)
    }
}

#[async_trait]
impl AuthorizationProvider for AclAuthorizer {
    async fn has_read_access(&self, user: &User, experiment_id: ExperimentId) -> bool {
        let Some(acl) = self.acls.get(&experiment_id) else { return false };
        if acl.public {
            return true;
        }
        match user.username() {
            Some(name) => Self::can_write(acl, name) || acl.readers.iter().any(|u| u == name),
            None => false,
        }
    }

    async fn has_write_access(&self, user: &User, experiment_id: ExperimentId) -> bool {
        match (self.acls.get(&experiment_id), user.username()) {
            (Some(acl), Some(name)) => Self::can_write(acl, name),
            _ => false,
        }
    }
}

/// The acting user, read from the configured trusted header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub User);

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(state.config.auth.user_header.as_str())
            .and_then(|v| v.to_str().ok());
        Ok(CurrentUser(User::from_header_value(value)))
    }
}
