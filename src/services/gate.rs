// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feature gate: capability lookups and the upsell prompt.

use crate::models::{Feature, Tier};

/// Whether `tier` unlocks `feature`. The free tier unlocks nothing.
pub fn is_feature_enabled(tier: Tier, feature: Feature) -> bool {
    tier != Tier::Free && feature.allowed_tiers().contains(&tier)
}

/// Tracks the upsell prompt shown after a denied access check.
///
/// The prompt is either hidden or shown for exactly one feature.
#[derive(Debug, Default, Clone)]
pub struct FeatureGate {
    upsell: Option<Feature>,
}

impl FeatureGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate access and update the prompt from the outcome: a deny
    /// shows the prompt for `feature`, an allow hides it.
    pub fn check_feature_access(&mut self, tier: Tier, feature: Feature) -> bool {
        let allowed = is_feature_enabled(tier, feature);
        if allowed {
            self.upsell = None;
        } else {
            tracing::debug!(feature = %feature, tier = %tier, "Feature locked, prompting upsell");
            self.upsell = Some(feature);
        }
        allowed
    }

    /// Hide the prompt without touching access state.
    pub fn close_premium_modal(&mut self) {
        self.upsell = None;
    }

    pub fn is_premium_modal_open(&self) -> bool {
        self.upsell.is_some()
    }

    /// Feature the prompt is currently shown for.
    pub fn current_feature(&self) -> Option<Feature> {
        self.upsell
    }
}
