// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan tiers, the plan catalog, and persisted subscription records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Length of one billing period. Renewal always adds exactly this much,
/// with no proration.
pub const BILLING_PERIOD_DAYS: i64 = 30;

/// Plan tier, the unit of entitlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
    Pro,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Premium, Tier::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Pro => "pro",
        }
    }

    /// True for any tier that has to be bought.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }

    /// Catalog entry for this tier.
    pub fn plan(&self) -> Plan {
        match self {
            Tier::Free => Plan {
                id: Tier::Free,
                name: "Free Plan",
                price: 0.0,
            },
            Tier::Premium => Plan {
                id: Tier::Premium,
                name: "Premium Plan",
                price: 19.99,
            },
            Tier::Pro => Plan {
                id: Tier::Pro,
                name: "Pro Plan",
                price: 49.99,
            },
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "pro" => Ok(Tier::Pro),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown plan: {0}")]
pub struct UnknownTier(pub String);

/// A purchasable plan, billed every [`BILLING_PERIOD_DAYS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    pub id: Tier,
    pub name: &'static str,
    /// Price per billing period (USD)
    pub price: f64,
}

/// The single subscription record a user may hold.
///
/// Stored at: `subscription_{user_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub plan_id: Tier,
    pub plan_name: String,
    pub plan_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    /// A record without the flag does not renew.
    #[serde(default)]
    pub auto_renew: bool,
}

impl SubscriptionRecord {
    /// Fresh auto-renewing record for `plan`, starting at `now`.
    pub fn start(plan: Plan, now: DateTime<Utc>) -> Self {
        Self {
            plan_id: plan.id,
            plan_name: plan.name.to_string(),
            plan_price: plan.price,
            purchase_date: now,
            expiry_date: now + Duration::days(BILLING_PERIOD_DAYS),
            auto_renew: true,
        }
    }

    /// Expired strictly after the expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }

    /// Start a new billing period at `now`.
    pub fn renew(&mut self, now: DateTime<Utc>) {
        self.purchase_date = now;
        self.expiry_date = now + Duration::days(BILLING_PERIOD_DAYS);
    }
}

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Failed,
    Refunded,
}

/// One entry of a user's payment history.
///
/// Stored in the `subscription_transactions` list shared by all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub plan_id: Tier,
    pub plan_name: String,
    pub amount: f64,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
}
