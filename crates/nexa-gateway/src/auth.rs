// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login and admin checks.
//!
//! There are no tokens: `auth` returns the user record, and every
//! admin-only action carries the admin credentials again, which are
//! compared against the configured ones.

use nexa_config::model::AuthConfig;
use nexa_core::api::{AuthRequest, dicebear_avatar};
use nexa_core::{AdminCredentials, NexaError, Role, StorageAdapter, User, is_valid_email};
use tracing::{info, warn};

/// The configured admin account, if any.
#[derive(Clone, Default)]
pub struct AdminAuth {
    email: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl AdminAuth {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self {
            email: email.map(|e| e.trim().to_lowercase()),
            password,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.admin_email.clone(), config.admin_password.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|admin| admin == email.trim().to_lowercase())
    }

    /// Accept only the configured admin email with the configured password.
    pub fn verify(&self, credentials: &AdminCredentials) -> Result<(), NexaError> {
        let password_ok = self
            .password
            .as_deref()
            .is_some_and(|p| p == credentials.password);
        if self.is_admin_email(&credentials.email) && password_ok {
            Ok(())
        } else {
            warn!(email = %credentials.email, "admin check failed");
            Err(NexaError::Forbidden("ACCESS DENIED".to_string()))
        }
    }
}

/// Log a user in, registering them on first sight.
///
/// The admin email requires the admin password. Any other well-formed
/// email maps to a regular user whose id stays stable across logins.
pub async fn authenticate(
    storage: &dyn StorageAdapter,
    admin: &AdminAuth,
    request: &AuthRequest,
) -> Result<User, NexaError> {
    let email = request.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(NexaError::Validation("INVALID EMAIL FORMAT".to_string()));
    }
    if request.password.is_empty() {
        return Err(NexaError::Validation("PASSWORD REQUIRED".to_string()));
    }

    let role = if admin.is_admin_email(&email) {
        admin.verify(&AdminCredentials {
            email: email.clone(),
            password: request.password.clone(),
        })?;
        Role::Admin
    } else {
        Role::User
    };

    let mut user = match storage.find_user_by_email(&email).await? {
        Some(existing) => existing,
        None => {
            let name = email.split('@').next().unwrap_or_default().to_uppercase();
            let candidate = User {
                id: uuid::Uuid::new_v4().to_string(),
                avatar: dicebear_avatar("avataaars", &name),
                name,
                role,
                email: email.clone(),
            };
            let stored = storage.upsert_user(&candidate).await?;
            info!(id = %stored.id, "registered new user");
            stored
        }
    };
    user.role = role;
    Ok(user)
}
