//! Identity-to-privilege mapping, injected wherever admin standing matters.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Explicit service tracking which identities hold admin standing. Seeded from
/// configuration at startup and owned by the process, not by any handler.
#[derive(Clone, Debug, Default)]
pub struct Privileges {
    admins: Arc<RwLock<BTreeSet<String>>>,
}

impl Privileges {
    #[must_use]
    pub fn with_admins(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            admins: Arc::new(RwLock::new(ids.into_iter().collect())),
        }
    }

    #[must_use]
    pub fn is_admin(&self, id: &str) -> bool {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Returns `false` when the identity already held admin standing.
    pub fn grant(&self, id: impl Into<String>) -> bool {
        self.admins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into())
    }

    /// Returns `false` when the identity held no admin standing.
    pub fn revoke(&self, id: &str) -> bool {
        self.admins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
