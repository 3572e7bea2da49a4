//! Application preferences: profile, dashboard card order and feature flags.
//! Loaded once at startup, each part saved wholesale when it changes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog;
use super::storage::{self, BlobStore, ACTIVE_CARDS_KEY, FEATURE_FLAGS_KEY, USER_KEY};

/// A named external provider. Descriptive only; nothing is ever synced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedService {
    #[serde(default = "new_service_id")]
    pub id: String,
    pub provider: String,
    #[serde(default)]
    pub username: String,
}

fn new_service_id() -> String {
    Uuid::new_v4().to_string()
}

impl ConnectedService {
    pub fn new(provider: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: new_service_id(),
            provider: provider.into(),
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    /// ISO `YYYY-MM-DD`, bound directly to a date input.
    pub dob: String,
    pub services: Vec<ConnectedService>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            first_name: "Ray".into(),
            last_name: "Steele".into(),
            dob: "1959-10-21".into(),
            services: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub paid_version: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppPreferences {
    pub user: UserProfile,
    pub active_cards: Vec<String>,
    pub feature_flags: FeatureFlags,
}

impl AppPreferences {
    pub fn load(store: &dyn BlobStore) -> Self {
        let user = storage::load_or_default(store, USER_KEY, UserProfile::default);
        let active_cards: Vec<String> =
            storage::load_or_default(store, ACTIVE_CARDS_KEY, catalog::default_card_order);
        let feature_flags = storage::load_or_default(store, FEATURE_FLAGS_KEY, FeatureFlags::default);

        Self {
            user,
            active_cards: known_cards(active_cards),
            feature_flags,
        }
    }

    pub fn save_user(&self, store: &dyn BlobStore) {
        storage::save_best_effort(store, USER_KEY, &self.user);
    }

    pub fn save_active_cards(&self, store: &dyn BlobStore) {
        storage::save_best_effort(store, ACTIVE_CARDS_KEY, &self.active_cards);
    }

    pub fn save_feature_flags(&self, store: &dyn BlobStore) {
        storage::save_best_effort(store, FEATURE_FLAGS_KEY, &self.feature_flags);
    }
}

/// Drop unknown or repeated card names, keeping the first occurrence.
fn known_cards(names: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if catalog::card(&name).is_some() && !kept.contains(&name) {
            kept.push(name);
        }
    }
    kept
}
