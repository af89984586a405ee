// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value storage layer.

pub mod file;
pub mod store;

pub use file::FileStore;
pub use store::{KvStore, KvStoreExt, MemoryStore, Store, StoreError};

/// Storage keys as constants.
pub mod keys {
    /// Serialized user for the current session.
    pub const SESSION_USER: &str = "auth_user";
    /// Every registered user (profile edits and deletion write here).
    pub const USERS: &str = "users";
    /// Payment history for all users.
    pub const TRANSACTIONS: &str = "subscription_transactions";

    const SUBSCRIPTION_PREFIX: &str = "subscription_";

    /// Key of the subscription record owned by `user_id`.
    pub fn subscription(user_id: &str) -> String {
        format!("{}{}", SUBSCRIPTION_PREFIX, user_id)
    }
}
