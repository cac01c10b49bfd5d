//! Identity providers: who is signed in on this client session.

use std::sync::RwLock;

use taskboard_common::User;

/// Source of the current user for the synchronizer.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when logged out.
    fn current_user(&self) -> Option<User>;
}

/// A fixed identity, resolved once from configuration or flags.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user: Some(User::new(user_id)),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn from_option(user_id: Option<String>) -> Self {
        Self {
            user: user_id.filter(|id| !id.trim().is_empty()).map(User::new),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// A login session that can change while the client runs.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<User>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, user_id: impl Into<String>) {
        let mut guard = self.user.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(User::new(user_id));
    }

    pub fn logout(&self) {
        let mut guard = self.user.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
