//! Climber profiles: a chosen display name and the email friends find
//! them by.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::RawRecord;

/// A climber's public profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub custom_user_name: String,
    /// Stored trimmed and lowercased.
    pub email: String,
    pub avatar_url: String,
    pub background_url: String,
}

impl UserProfile {
    /// Build a profile from an untyped map. Missing or wrong-typed fields
    /// become empty strings.
    pub fn from_raw(user_id: &str, raw: &RawRecord) -> Self {
        let field = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            user_id: user_id.to_string(),
            custom_user_name: field("customUserName").trim().to_string(),
            email: normalize_email(&field("email")),
            avatar_url: field("avatarUrl"),
            background_url: field("backgroundUrl"),
        }
    }

    /// The chosen name, if one was set.
    pub fn display_name(&self) -> Option<&str> {
        Some(self.custom_user_name.as_str()).filter(|name| !name.is_empty())
    }

    /// Whether `email` names this profile, ignoring case and surrounding
    /// whitespace.
    pub fn has_email(&self, email: &str) -> bool {
        !self.email.is_empty() && self.email == normalize_email(email)
    }
}

/// Canonical form used to store and look up emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Display names keyed by user id, for profiles that set one.
pub fn display_names<'a, I>(profiles: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a UserProfile>,
{
    profiles
        .into_iter()
        .filter_map(|p| Some((p.user_id.clone(), p.display_name()?.to_string())))
        .collect()
}
