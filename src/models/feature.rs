// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gated features and the capability table.
//!
//! The table is closed: every gated capability is a [`Feature`] variant and
//! its allowed tiers come from [`Feature::allowed_tiers`]. A typo in a
//! feature name is a compile error rather than a silent deny.

use crate::models::Tier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const PAID: &[Tier] = &[Tier::Premium, Tier::Pro];
const PRO_ONLY: &[Tier] = &[Tier::Pro];

/// A capability that requires a paid plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    HyroxExperienceWall,
    PremiumWorkouts,
    PrivateCoaching,
    AnalyticsDashboard,
    PrioritySupport,
    PersonalizedTraining,
    ProfileSetup,
    #[serde(rename = "roxexchange")]
    RoxExchange,
    #[serde(rename = "roxpartner")]
    RoxPartner,
    CommunityForum,
    Messaging,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::HyroxExperienceWall,
        Feature::PremiumWorkouts,
        Feature::PrivateCoaching,
        Feature::AnalyticsDashboard,
        Feature::PrioritySupport,
        Feature::PersonalizedTraining,
        Feature::ProfileSetup,
        Feature::RoxExchange,
        Feature::RoxPartner,
        Feature::CommunityForum,
        Feature::Messaging,
    ];

    /// Stable identifier used in storage and URLs.
    pub fn id(&self) -> &'static str {
        match self {
            Feature::HyroxExperienceWall => "hyrox-experience-wall",
            Feature::PremiumWorkouts => "premium-workouts",
            Feature::PrivateCoaching => "private-coaching",
            Feature::AnalyticsDashboard => "analytics-dashboard",
            Feature::PrioritySupport => "priority-support",
            Feature::PersonalizedTraining => "personalized-training",
            Feature::ProfileSetup => "profile-setup",
            Feature::RoxExchange => "roxexchange",
            Feature::RoxPartner => "roxpartner",
            Feature::CommunityForum => "community-forum",
            Feature::Messaging => "messaging",
        }
    }

    /// Tiers that unlock this feature.
    pub const fn allowed_tiers(self) -> &'static [Tier] {
        match self {
            Feature::PrioritySupport | Feature::PersonalizedTraining => PRO_ONLY,
            Feature::HyroxExperienceWall
            | Feature::PremiumWorkouts
            | Feature::PrivateCoaching
            | Feature::AnalyticsDashboard
            | Feature::ProfileSetup
            | Feature::RoxExchange
            | Feature::RoxPartner
            | Feature::CommunityForum
            | Feature::Messaging => PAID,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    /// Parse an identifier, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.id() == wanted)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown feature: {0}")]
pub struct UnknownFeature(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_parse() {
        for feature in Feature::ALL {
            assert_eq!(feature.id().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_serde_matches_id() {
        for feature in Feature::ALL {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.id()));
        }
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("RoxExchange".parse::<Feature>().unwrap(), Feature::RoxExchange);
        assert_eq!(
            "Hyrox-Experience-Wall".parse::<Feature>().unwrap(),
            Feature::HyroxExperienceWall
        );
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        assert!("rox-exchange".parse::<Feature>().is_err());
        assert!("".parse::<Feature>().is_err());
    }

    #[test]
    fn test_table_entries() {
        assert_eq!(Feature::RoxExchange.allowed_tiers(), &[Tier::Premium, Tier::Pro]);
        assert_eq!(Feature::PrioritySupport.allowed_tiers(), &[Tier::Pro]);
        assert_eq!(Feature::PersonalizedTraining.allowed_tiers(), &[Tier::Pro]);
        for feature in Feature::ALL {
            assert!(!feature.allowed_tiers().contains(&Tier::Free));
        }
    }
}
