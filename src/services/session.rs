// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: who is logged in, mirrored to durable storage.
//!
//! Credentials are NOT verified. `login` accepts any non-empty email and
//! password and produces a mock user; this is a demo stand-in for a real
//! identity provider and must stay visibly so.

use crate::db::{keys, KvStore, KvStoreExt, Store, StoreError};
use crate::models::{Profile, Role, Tier, User};
use serde::Deserialize;
use validator::Validate;

/// Identifier given to every mock login.
pub const MOCK_USER_ID: &str = "1";

/// Login form input.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration form input.
#[derive(Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Profile edit. Unset fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Holds the authenticated user for the current session.
pub struct SessionStore {
    store: Store,
    user: Option<User>,
}

impl SessionStore {
    /// Restore the session from storage.
    ///
    /// An unreadable session entry is removed and the session starts
    /// logged out.
    pub fn hydrate(store: Store) -> Self {
        let user = match store.get_json::<User>(keys::SESSION_USER) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = store.remove(keys::SESSION_USER) {
                    tracing::warn!(error = %e, "Failed to clear unreadable session");
                }
                None
            }
        };

        if let Some(user) = &user {
            tracing::info!(user_id = %user.id, "Session restored");
        }

        Self { store, user }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Mock login: any non-empty credentials succeed.
    pub fn login(&mut self, form: &LoginForm) -> Result<&User, SessionError> {
        form.validate()?;

        let name = form.email.split('@').next().unwrap_or(&form.email);
        let user = User {
            id: MOCK_USER_ID.to_string(),
            name: name.to_string(),
            email: form.email.clone(),
            role: Role::Athlete,
            subscription: Tier::Free,
            profile: None,
        };

        tracing::info!(user_id = %user.id, "User logged in");
        self.set_user(user)
    }

    /// Create a free-tier account and log it in.
    pub fn register(&mut self, form: &RegisterForm) -> Result<&User, SessionError> {
        form.validate()?;

        let user = User {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: form.name.clone(),
            email: form.email.clone(),
            role: form.role,
            subscription: Tier::Free,
            profile: None,
        };

        self.upsert_registered(&user)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "User registered");
        self.set_user(user)
    }

    /// Clear the session. Returns the user that was logged in, if any.
    pub fn logout(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Err(e) = self.store.remove(keys::SESSION_USER) {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        if let Some(user) = &user {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        user
    }

    /// Edit the current user's details.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User, SessionError> {
        update.validate()?;

        let mut user = self.user.clone().ok_or(SessionError::NotAuthenticated)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(profile) = update.profile {
            user.profile.get_or_insert_with(Profile::default).merge(profile);
        }

        self.upsert_registered(&user)?;
        self.set_user(user)
    }

    /// Remove the current user from the registry and end the session.
    ///
    /// Subscription data is owned by the resolver and removed there.
    pub fn delete_account(&mut self) -> Result<User, SessionError> {
        let user = self.user.clone().ok_or(SessionError::NotAuthenticated)?;

        let mut users = self.registered_users();
        users.retain(|u| u.id != user.id);
        self.store.set_json(keys::USERS, &users)?;

        tracing::info!(user_id = %user.id, "Account deleted");
        self.logout();
        Ok(user)
    }

    /// All registered users. An unreadable registry reads as empty.
    pub fn registered_users(&self) -> Vec<User> {
        match self.store.get_json::<Vec<User>>(keys::USERS) {
            Ok(users) => users.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable user registry");
                Vec::new()
            }
        }
    }

    fn upsert_registered(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.registered_users();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.store.set_json(keys::USERS, &users)
    }

    fn set_user(&mut self, user: User) -> Result<&User, SessionError> {
        self.store.set_json(keys::SESSION_USER, &user)?;
        Ok(self.user.insert(user))
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),
}
