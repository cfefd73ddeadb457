// src/core/seed/loader.rs

//! Turns fixture bytes into a validated `SeedFixture`.
//!
//! Loading runs in two stages. The bytes are first parsed into a lossless
//! `RawNode` tree; any failure there is `MalformedInput`. The tree is then
//! walked field by field, and anything structurally wrong becomes a
//! `SchemaViolation` carrying the offending field path. No partial result is
//! ever returned.

use crate::core::errors::SeedError;
use crate::core::seed::query::QueryLibrary;
use crate::core::seed::raw::{ObjectView, RawNode, child_path};
use crate::core::seed::user::UserDirectory;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

pub const USERS_KEY: &str = "users";
pub const USER_QUERIES_KEY: &str = "user_queries";

/// Knobs for a single `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject queries whose owner is not a seeded user. Off by default;
    /// the owner relationship is otherwise only logged.
    pub strict_query_owners: bool,
    /// Log a warning for every unrecognized `appSettings` key.
    pub warn_unrecognized_settings: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            strict_query_owners: false,
            warn_unrecognized_settings: true,
        }
    }
}

/// The whole fixture: the user directory plus the saved query library.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SeedFixture {
    users: UserDirectory,
    user_queries: QueryLibrary,
}

impl SeedFixture {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SeedError> {
        Self::from_slice_with(bytes, &LoadOptions::default())
    }

    pub fn from_slice_with(bytes: &[u8], options: &LoadOptions) -> Result<Self, SeedError> {
        let root: RawNode = serde_json::from_slice(bytes)?;
        let fixture = Self::from_raw(&root, options)?;
        info!(
            "Loaded seed fixture: {} users, {} saved queries.",
            fixture.users.len(),
            fixture.user_queries.len()
        );
        Ok(fixture)
    }

    fn from_raw(root: &RawNode, options: &LoadOptions) -> Result<Self, SeedError> {
        let view = ObjectView::new(root, "")?;
        view.deny_unknown(&[USERS_KEY, USER_QUERIES_KEY])?;

        let users = UserDirectory::from_raw(view.require(USERS_KEY)?, USERS_KEY, options)?;
        let user_queries = QueryLibrary::from_raw(view.require(USER_QUERIES_KEY)?, USER_QUERIES_KEY)?;

        for owner in user_queries.orphaned_owners(&users) {
            if options.strict_query_owners {
                return Err(SeedError::violation(
                    child_path(USER_QUERIES_KEY, owner),
                    format!("query owner '{owner}' is not a seeded user"),
                ));
            }
            warn!(
                "Saved queries reference owner '{}', which is not a seeded user.",
                owner
            );
        }
        debug!(
            "Seed fixture validated ({} query owners).",
            user_queries.owners().count()
        );

        Ok(SeedFixture {
            users,
            user_queries,
        })
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn user_queries(&self) -> &QueryLibrary {
        &self.user_queries
    }

    pub fn into_parts(self) -> (UserDirectory, QueryLibrary) {
        (self.users, self.user_queries)
    }

    /// Re-serializes into the fixture layout. Field names, nesting and
    /// credential prefixes come out exactly as the loader accepts them.
    pub fn to_json_pretty(&self) -> Result<String, SeedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Lets a fixture be embedded in a larger serde document while keeping the
// same validation.
impl<'de> Deserialize<'de> for SeedFixture {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let root = RawNode::deserialize(deserializer)?;
        SeedFixture::from_raw(&root, &LoadOptions::default()).map_err(serde::de::Error::custom)
    }
}

/// Parses `source` into a user directory and a query library with default options.
pub fn load(source: impl AsRef<[u8]>) -> Result<(UserDirectory, QueryLibrary), SeedError> {
    load_with(source, &LoadOptions::default())
}

pub fn load_with(
    source: impl AsRef<[u8]>,
    options: &LoadOptions,
) -> Result<(UserDirectory, QueryLibrary), SeedError> {
    SeedFixture::from_slice_with(source.as_ref(), options).map(SeedFixture::into_parts)
}
