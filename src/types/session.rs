use serde::{Deserialize, Serialize};

use crate::db::BusinessCardRecord;

/// An authenticated caller. Absence of a session means anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub is_admin: bool,
}

impl Session {
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: true,
        }
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    /// Administrators see every record; everyone else only their own.
    pub fn can_view(&self, record: &BusinessCardRecord) -> bool {
        self.is_admin || record.owner == self.username
    }
}

/// Outcome of a login attempt. `Failed` deliberately carries no reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(Session),
    Failed,
}

impl AuthResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated(_))
    }
}
