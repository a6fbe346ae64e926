//! Who is editing.
//!
//! Authentication is an external collaborator reached through
//! [`AuthProvider`]. A [`Session`] is built from it once and then passed
//! explicitly to the operations that need it, so tests can hand in any
//! session they like.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl CurrentUser {
    /// Create a new user.
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Check if this role may create and edit surveys.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// Lookup of the current user and their role.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The error type for this provider.
    type Error: Into<anyhow::Error> + Send;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Result<Option<CurrentUser>, Self::Error>;

    /// The role of a user.
    async fn role(&self, user_id: Uuid) -> Result<Role, Self::Error>;
}

/// Error type for access checks.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Administrator access required (current role: {0:?})")]
    Forbidden(Role),

    #[error("Auth provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

/// The user and role an edit session runs as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<CurrentUser>,
    role: Role,
}

impl Session {
    /// Create a session for a known user.
    pub fn new(user: CurrentUser, role: Role) -> Self {
        Self {
            user: Some(user),
            role,
        }
    }

    /// A session without a signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Ask the provider who is signed in and what they may do.
    pub async fn establish<A: AuthProvider>(provider: &A) -> Result<Self, AccessError> {
        let user = provider
            .current_user()
            .await
            .map_err(|err| AccessError::Provider(err.into()))?;

        let Some(user) = user else {
            tracing::debug!("no signed-in user");
            return Ok(Self::anonymous());
        };

        let role = provider
            .role(user.id)
            .await
            .map_err(|err| AccessError::Provider(err.into()))?;
        tracing::debug!(user_id = %user.id, ?role, "session established");
        Ok(Self::new(user, role))
    }

    /// Get the signed-in user.
    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Get the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The signed-in administrator, or why there is none.
    pub fn require_admin(&self) -> Result<&CurrentUser, AccessError> {
        let user = self.user.as_ref().ok_or(AccessError::NotAuthenticated)?;
        if self.role.is_admin() {
            Ok(user)
        } else {
            Err(AccessError::Forbidden(self.role))
        }
    }
}
