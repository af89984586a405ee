//! User model for storage and API.

use crate::models::Tier;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What kind of member an account belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Athlete,
    Coach,
    Sponsor,
}

/// User account stored under the session key and in the user registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Stable identifier (subscription records are keyed by it)
    pub id: String,
    /// Display name
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Tier recorded when the account was created. Informational only:
    /// access checks always use the resolved tier.
    #[serde(default)]
    pub subscription: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Optional profile payload edited from the profile screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Profile {
    /// Overlay the fields that are set in `update`.
    pub fn merge(&mut self, update: Profile) {
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.profile_image.is_some() {
            self.profile_image = update.profile_image;
        }
        if update.bio.is_some() {
            self.bio = update.bio;
        }
        if update.location.is_some() {
            self.location = update.location;
        }
    }
}
