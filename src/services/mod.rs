// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod entitlements;
pub mod gate;
pub mod session;
pub mod subscription;

pub use entitlements::Entitlements;
pub use gate::{is_feature_enabled, FeatureGate};
pub use session::{LoginForm, ProfileUpdate, RegisterForm, SessionError, SessionStore};
pub use subscription::{PaymentDetails, SubscriptionError, SubscriptionResolver};
