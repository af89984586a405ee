// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription resolver: effective tier from the stored record.
//!
//! Renewal is lazy. Nothing runs in the background; an expired record is
//! renewed or discarded the next time the tier is resolved. The
//! read-modify-write against storage takes no lock, so two processes
//! sharing one data file can race (last write wins).

use crate::db::{keys, KvStore, KvStoreExt, Store, StoreError};
use crate::models::{SubscriptionRecord, Tier, Transaction, TransactionStatus, User};
use crate::time_utils::SharedClock;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// How long a resolved tier may be served from cache.
#[derive(Debug, Clone, Copy)]
enum Validity {
    /// Until the identity or the record changes.
    UntilChanged,
    /// Until the record's expiry instant.
    Until(DateTime<Utc>),
    /// Storage misbehaved; resolve again next time.
    Uncached,
}

#[derive(Debug, Clone)]
struct CachedTier {
    user_id: String,
    tier: Tier,
    validity: Validity,
}

impl CachedTier {
    fn serves(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        if self.user_id != user_id {
            return false;
        }
        match self.validity {
            Validity::UntilChanged => true,
            Validity::Until(expiry) => now <= expiry,
            Validity::Uncached => false,
        }
    }
}

/// Card details entered on the checkout form.
///
/// Only the shape is checked. No payment is taken.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[validate(custom(function = "validate_card_number"))]
    pub card_number: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub card_name: String,
    #[validate(custom(function = "validate_expiry"))]
    pub expiry: String,
    #[validate(custom(function = "validate_cvv"))]
    pub cvv: String,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("card_number", "Please enter a valid card number"));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("card_name", "Please enter the name on card"));
    }
    Ok(())
}

fn validate_expiry(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || !value.contains('/') {
        return Err(invalid("expiry", "Please enter a valid expiry date (MM/YY)"));
    }
    Ok(())
}

fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("cvv", "Please enter a valid CVV code"));
    }
    Ok(())
}

/// Resolves the effective plan tier for a user.
pub struct SubscriptionResolver {
    store: Store,
    clock: SharedClock,
    cached: Option<CachedTier>,
}

impl SubscriptionResolver {
    pub fn new(store: Store, clock: SharedClock) -> Self {
        Self {
            store,
            clock,
            cached: None,
        }
    }

    /// Effective tier for `user` right now.
    ///
    /// - no user, or no record: `free`
    /// - record not yet expired: its plan, record untouched
    /// - expired with auto-renew: record moved to a new 30-day window
    ///   starting now, plan returned
    /// - expired without auto-renew: record deleted, `free`
    pub fn resolve_tier(&mut self, user: Option<&User>) -> Tier {
        let Some(user) = user else {
            return Tier::Free;
        };

        let now = self.clock.now();
        if let Some(cached) = &self.cached {
            if cached.serves(&user.id, now) {
                return cached.tier;
            }
        }

        let (tier, validity) = self.resolve_from_store(&user.id, now);
        self.cached = Some(CachedTier {
            user_id: user.id.clone(),
            tier,
            validity,
        });
        tier
    }

    fn resolve_from_store(&self, user_id: &str, now: DateTime<Utc>) -> (Tier, Validity) {
        let key = keys::subscription(user_id);
        let mut record = match self.load_record(&key) {
            Ok(Some(record)) => record,
            Ok(None) => return (Tier::Free, Validity::UntilChanged),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to read subscription");
                return (Tier::Free, Validity::Uncached);
            }
        };

        if !record.is_expired(now) {
            return (record.plan_id, Validity::Until(record.expiry_date));
        }

        if record.auto_renew {
            record.renew(now);
            tracing::info!(
                user_id,
                plan = %record.plan_id,
                expiry = %record.expiry_date,
                "Subscription auto-renewed"
            );
            match self.store.set_json(&key, &record) {
                Ok(()) => (record.plan_id, Validity::Until(record.expiry_date)),
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Failed to persist renewal");
                    (record.plan_id, Validity::Uncached)
                }
            }
        } else {
            tracing::info!(user_id, plan = %record.plan_id, "Subscription expired");
            match self.store.remove(&key) {
                Ok(()) => (Tier::Free, Validity::UntilChanged),
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Failed to remove expired subscription");
                    (Tier::Free, Validity::Uncached)
                }
            }
        }
    }

    /// Read a record, discarding it if it does not parse.
    fn load_record(&self, key: &str) -> Result<Option<SubscriptionRecord>, StoreError> {
        match self.store.get_json::<SubscriptionRecord>(key) {
            Err(StoreError::Corrupt { reason, .. }) => {
                tracing::warn!(key, reason = %reason, "Discarding unreadable subscription");
                self.store.remove(key)?;
                Ok(None)
            }
            other => other,
        }
    }

    /// Forget the cached tier. Called on identity changes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Stored record for `user` as-is, without applying expiry rules.
    pub fn record(&self, user: &User) -> Result<Option<SubscriptionRecord>, StoreError> {
        self.load_record(&keys::subscription(&user.id))
    }

    /// Flip auto-renew on the stored record.
    ///
    /// Returns the new flag, or `None` when the user has no record.
    pub fn toggle_auto_renew(&mut self, user: &User) -> Result<Option<bool>, StoreError> {
        let key = keys::subscription(&user.id);
        let Some(mut record) = self.load_record(&key)? else {
            return Ok(None);
        };

        record.auto_renew = !record.auto_renew;
        self.store.set_json(&key, &record)?;
        self.invalidate();

        tracing::info!(
            user_id = %user.id,
            auto_renew = record.auto_renew,
            "Auto-renewal toggled"
        );
        Ok(Some(record.auto_renew))
    }

    /// Record a completed (mock) checkout for `plan`.
    ///
    /// Replaces any existing record with a fresh auto-renewing one and
    /// appends a completed transaction.
    pub fn complete_payment(
        &mut self,
        user: &User,
        plan: Tier,
        payment: &PaymentDetails,
    ) -> Result<SubscriptionRecord, SubscriptionError> {
        payment.validate()?;
        if !plan.is_paid() {
            return Err(SubscriptionError::NotPurchasable(plan));
        }

        let now = self.clock.now();
        let record = SubscriptionRecord::start(plan.plan(), now);
        self.store
            .set_json(&keys::subscription(&user.id), &record)?;

        let mut transactions = self.all_transactions();
        transactions.push(Transaction {
            id: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            plan_id: record.plan_id,
            plan_name: record.plan_name.clone(),
            amount: record.plan_price,
            status: TransactionStatus::Completed,
            date: now,
        });
        self.store.set_json(keys::TRANSACTIONS, &transactions)?;
        self.invalidate();

        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            plan = %plan,
            expiry = %record.expiry_date,
            "Payment completed, invoice issued"
        );
        Ok(record)
    }

    /// Payment history for `user`, oldest first.
    pub fn transactions(&self, user: &User) -> Vec<Transaction> {
        self.all_transactions()
            .into_iter()
            .filter(|t| t.user_id == user.id)
            .collect()
    }

    fn all_transactions(&self) -> Vec<Transaction> {
        match self.store.get_json::<Vec<Transaction>>(keys::TRANSACTIONS) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable transaction history");
                Vec::new()
            }
        }
    }

    /// Delete everything billing-related that belongs to `user`.
    pub fn remove_user_data(&mut self, user: &User) -> Result<(), StoreError> {
        self.store.remove(&keys::subscription(&user.id))?;

        let mut transactions = self.all_transactions();
        let before = transactions.len();
        transactions.retain(|t| t.user_id != user.id);
        if transactions.len() != before {
            self.store.set_json(keys::TRANSACTIONS, &transactions)?;
        }

        self.invalidate();
        Ok(())
    }
}

/// Errors from subscription changes.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Invalid payment details: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("The {0} plan cannot be purchased")]
    NotPurchasable(Tier),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),
}
