// src/core/seed/user.rs

use crate::core::credential::CredentialHash;
use crate::core::errors::SeedError;
use crate::core::seed::LoadOptions;
use crate::core::seed::authority::{Authority, ROLE_ADMIN};
use crate::core::seed::raw::{ObjectView, RawNode, child_path};
use crate::core::seed::settings::{AppSetting, AppSettings};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

const USER_FIELDS: &[&str] = &[
    "username",
    "password",
    "grantedAuthorities",
    "appSettings",
    "dateCreated",
];

/// Represents a single seeded user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    username: String,
    /// Serialized under the fixture's `password` field name.
    #[serde(rename = "password")]
    credential: CredentialHash,
    granted_authorities: BTreeSet<String>,
    /// `None` when the fixture record has no `appSettings` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    app_settings: Option<AppSettings>,
    /// Epoch milliseconds, never negative.
    date_created: i64,
}

impl UserRecord {
    pub(crate) fn from_raw(key: &str, node: &RawNode, path: &str) -> Result<Self, SeedError> {
        let view = ObjectView::new(node, path)?;
        view.deny_unknown(USER_FIELDS)?;

        let username = view.require_str("username")?;
        if username != key {
            return Err(SeedError::violation(
                child_path(path, "username"),
                format!("'{username}' does not match its directory key '{key}'"),
            ));
        }

        let password_path = child_path(path, "password");
        let credential = CredentialHash::parse(view.require_str("password")?).map_err(|e| {
            let detail = match e {
                SeedError::Credential(detail) => detail,
                other => other.to_string(),
            };
            SeedError::violation(&password_path, detail)
        })?;

        let authorities_path = child_path(path, "grantedAuthorities");
        let granted_authorities = view
            .require("grantedAuthorities")?
            .as_array(&authorities_path)?
            .iter()
            .enumerate()
            .map(|(i, token)| {
                token
                    .as_str(&format!("{authorities_path}[{i}]"))
                    .map(str::to_string)
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let app_settings = view
            .get("appSettings")
            .map(|node| AppSettings::from_raw(node, &child_path(path, "appSettings")))
            .transpose()?;

        let date_created = view.require_i64("dateCreated")?;
        if date_created < 0 {
            return Err(SeedError::violation(
                child_path(path, "dateCreated"),
                format!("timestamp must be non-negative, found {date_created}"),
            ));
        }

        Ok(UserRecord {
            username: username.to_string(),
            credential,
            granted_authorities,
            app_settings,
            date_created,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    pub fn granted_authorities(&self) -> &BTreeSet<String> {
        &self.granted_authorities
    }

    pub fn authorities(&self) -> impl Iterator<Item = Authority<'_>> {
        self.granted_authorities
            .iter()
            .map(|token| Authority::classify(token))
    }

    pub fn has_authority(&self, token: &str) -> bool {
        self.granted_authorities.contains(token)
    }

    pub fn is_admin(&self) -> bool {
        self.has_authority(ROLE_ADMIN)
    }

    pub fn can_read_repo(&self, repo: &str) -> bool {
        self.is_admin() || self.authorities().any(|a| a.grants_read(repo))
    }

    pub fn can_write_repo(&self, repo: &str) -> bool {
        self.is_admin() || self.authorities().any(|a| a.grants_write(repo))
    }

    pub fn app_settings(&self) -> Option<&AppSettings> {
        self.app_settings.as_ref()
    }

    pub fn setting(&self, setting: AppSetting) -> Option<bool> {
        self.app_settings.as_ref().and_then(|s| s.get(setting))
    }

    pub fn unrecognized_settings(&self) -> impl Iterator<Item = (&str, bool)> {
        self.app_settings.iter().flat_map(|s| s.unrecognized())
    }

    pub fn date_created(&self) -> i64 {
        self.date_created
    }

    /// `None` only if the timestamp is beyond chrono's representable range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date_created)
    }
}

/// All seeded users keyed by username, in fixture order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct UserDirectory {
    users: IndexMap<String, UserRecord>,
}

impl UserDirectory {
    pub(crate) fn from_raw(
        node: &RawNode,
        path: &str,
        options: &LoadOptions,
    ) -> Result<Self, SeedError> {
        let view = ObjectView::new(node, path)?;
        let mut users = IndexMap::new();
        for (username, record) in view.entries() {
            let user = UserRecord::from_raw(username, record, &child_path(path, username))?;
            if options.warn_unrecognized_settings {
                for (name, _) in user.unrecognized_settings() {
                    warn!(
                        "User '{}' has unrecognized app setting '{}'; it is preserved as-is.",
                        username, name
                    );
                }
            }
            users.insert(username.to_string(), user);
        }
        Ok(UserDirectory { users })
    }

    /// Pure lookup; a missing user is `None`, never an error.
    pub fn lookup_user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
