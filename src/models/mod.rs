// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod feature;
pub mod subscription;
pub mod user;

pub use feature::Feature;
pub use subscription::{
    Plan, SubscriptionRecord, Tier, Transaction, TransactionStatus, BILLING_PERIOD_DAYS,
};
pub use user::{Profile, Role, User};
