// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entitlements context: session, resolver, and gate wired together.
//!
//! One value per session, constructed explicitly and handed to whatever
//! needs it. `init` hydrates from storage; `logout` tears the identity
//! down. Every identity change drops the cached tier and any pending
//! upsell prompt.
//!
//! All gating here is advisory. Anything that can write the data file can
//! grant itself any tier; a real deployment needs a server-authoritative
//! check in front of paid features.

use crate::db::Store;
use crate::models::{Feature, SubscriptionRecord, Tier, Transaction, User};
use crate::services::gate::{self, FeatureGate};
use crate::services::session::{
    LoginForm, ProfileUpdate, RegisterForm, SessionError, SessionStore,
};
use crate::services::subscription::{PaymentDetails, SubscriptionError, SubscriptionResolver};
use crate::time_utils::SharedClock;

pub struct Entitlements {
    session: SessionStore,
    resolver: SubscriptionResolver,
    gate: FeatureGate,
}

impl Entitlements {
    /// Build the context and restore any stored session.
    pub fn init(store: Store, clock: SharedClock) -> Self {
        Self {
            session: SessionStore::hydrate(store.clone()),
            resolver: SubscriptionResolver::new(store, clock),
            gate: FeatureGate::new(),
        }
    }

    fn identity_changed(&mut self) {
        self.resolver.invalidate();
        self.gate.close_premium_modal();
    }

    // ─── Session ─────────────────────────────────────────────────

    pub fn user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn login(&mut self, form: &LoginForm) -> Result<User, SessionError> {
        let user = self.session.login(form)?.clone();
        self.identity_changed();
        Ok(user)
    }

    pub fn register(&mut self, form: &RegisterForm) -> Result<User, SessionError> {
        let user = self.session.register(form)?.clone();
        self.identity_changed();
        Ok(user)
    }

    pub fn logout(&mut self) -> Option<User> {
        let user = self.session.logout();
        self.identity_changed();
        user
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, SessionError> {
        Ok(self.session.update_profile(update)?.clone())
    }

    /// Delete the current account with its subscription and payment
    /// history, then log out.
    pub fn delete_account(&mut self) -> Result<User, SessionError> {
        let user = self
            .session
            .current_user()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;

        self.resolver.remove_user_data(&user)?;
        let deleted = self.session.delete_account()?;
        self.identity_changed();
        Ok(deleted)
    }

    // ─── Tier ────────────────────────────────────────────────────

    /// Effective tier of the current session (`free` when logged out).
    pub fn current_tier(&mut self) -> Tier {
        self.resolver.resolve_tier(self.session.current_user())
    }

    pub fn is_premium_user(&mut self) -> bool {
        self.current_tier().is_paid()
    }

    // ─── Feature Gate ────────────────────────────────────────────

    /// Pure access query; leaves the upsell prompt alone.
    pub fn is_feature_enabled(&mut self, feature: Feature) -> bool {
        gate::is_feature_enabled(self.current_tier(), feature)
    }

    /// Access query that drives the upsell prompt.
    pub fn check_feature_access(&mut self, feature: Feature) -> bool {
        let tier = self.current_tier();
        self.gate.check_feature_access(tier, feature)
    }

    /// Access query by identifier, for callers holding a string.
    ///
    /// Unknown identifiers are always denied. No plan unlocks them, so the
    /// prompt is hidden rather than left showing an earlier feature.
    pub fn check_feature_id(&mut self, feature_id: &str) -> bool {
        match feature_id.parse::<Feature>() {
            Ok(feature) => self.check_feature_access(feature),
            Err(e) => {
                tracing::warn!(error = %e, "Access check for unknown feature");
                self.gate.close_premium_modal();
                false
            }
        }
    }

    pub fn close_premium_modal(&mut self) {
        self.gate.close_premium_modal();
    }

    pub fn is_premium_modal_open(&self) -> bool {
        self.gate.is_premium_modal_open()
    }

    pub fn current_feature(&self) -> Option<Feature> {
        self.gate.current_feature()
    }

    // ─── Subscription Management ─────────────────────────────────

    fn require_user(&self) -> Result<User, SubscriptionError> {
        self.session
            .current_user()
            .cloned()
            .ok_or(SubscriptionError::NotAuthenticated)
    }

    /// Stored record after applying expiry rules, for the manage screen.
    pub fn subscription(&mut self) -> Result<Option<SubscriptionRecord>, SubscriptionError> {
        let user = self.require_user()?;
        self.resolver.resolve_tier(Some(&user));
        Ok(self.resolver.record(&user)?)
    }

    /// Complete a mock checkout for `plan`.
    pub fn subscribe(
        &mut self,
        plan: Tier,
        payment: &PaymentDetails,
    ) -> Result<SubscriptionRecord, SubscriptionError> {
        let user = self.require_user()?;
        let record = self.resolver.complete_payment(&user, plan, payment)?;
        self.gate.close_premium_modal();
        Ok(record)
    }

    /// Flip auto-renew; `None` when there is nothing to renew.
    pub fn toggle_auto_renew(&mut self) -> Result<Option<bool>, SubscriptionError> {
        let user = self.require_user()?;
        Ok(self.resolver.toggle_auto_renew(&user)?)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>, SubscriptionError> {
        let user = self.require_user()?;
        Ok(self.resolver.transactions(&user))
    }
}
