// src/core/seed/query.rs

use crate::core::errors::SeedError;
use crate::core::seed::raw::{ObjectView, RawNode, child_path};
use crate::core::seed::settings::AppSetting;
use crate::core::seed::user::{UserDirectory, UserRecord};
use indexmap::IndexMap;
use serde::Serialize;

const QUERY_FIELDS: &[&str] = &["name", "body", "shared"];

/// A saved SPARQL query. The body is stored verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedQuery {
    /// Implied by the enclosing `user_queries` key, so not serialized.
    #[serde(skip)]
    owner: String,
    name: String,
    body: String,
    shared: bool,
}

impl SavedQuery {
    fn from_raw(owner: &str, key: &str, node: &RawNode, path: &str) -> Result<Self, SeedError> {
        let view = ObjectView::new(node, path)?;
        view.deny_unknown(QUERY_FIELDS)?;

        let name = view.require_str("name")?;
        if name != key {
            return Err(SeedError::violation(
                child_path(path, "name"),
                format!("'{name}' does not match its library key '{key}'"),
            ));
        }

        Ok(SavedQuery {
            owner: owner.to_string(),
            name: name.to_string(),
            body: view.require_str("body")?.to_string(),
            shared: view.require_bool("shared")?,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

/// Saved queries grouped by owner, then by name. Both levels keep fixture order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct QueryLibrary {
    owners: IndexMap<String, IndexMap<String, SavedQuery>>,
}

impl QueryLibrary {
    pub(crate) fn from_raw(node: &RawNode, path: &str) -> Result<Self, SeedError> {
        let view = ObjectView::new(node, path)?;
        let mut owners = IndexMap::new();
        for (owner, queries_node) in view.entries() {
            let owner_path = child_path(path, owner);
            // Duplicate names under one owner are rejected by `ObjectView::new`.
            let queries_view = ObjectView::new(queries_node, &owner_path)?;
            let mut queries = IndexMap::new();
            for (name, query_node) in queries_view.entries() {
                let query =
                    SavedQuery::from_raw(owner, name, query_node, &child_path(&owner_path, name))?;
                queries.insert(name.to_string(), query);
            }
            owners.insert(owner.to_string(), queries);
        }
        Ok(QueryLibrary { owners })
    }

    /// Every query with `shared == true`, lazily. The iterator is `Clone`,
    /// so it can be restarted; within an owner, fixture order is kept.
    pub fn shared_queries(&self) -> impl Iterator<Item = &SavedQuery> + Clone + '_ {
        self.iter().filter(|query| query.shared)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedQuery> + Clone + '_ {
        self.owners.values().flat_map(|queries| queries.values())
    }

    /// An owner's queries in insertion order; empty for an unknown owner.
    pub fn queries_for<'a>(&'a self, owner: &str) -> impl Iterator<Item = &'a SavedQuery> + 'a {
        self.owners
            .get(owner)
            .into_iter()
            .flat_map(|queries| queries.values())
    }

    pub fn get(&self, owner: &str, name: &str) -> Option<&SavedQuery> {
        self.owners.get(owner).and_then(|queries| queries.get(name))
    }

    /// The queries `user` sees in the workbench: their own first, then other
    /// owners' shared queries unless the user set `IGNORE_SHARED_QUERIES`.
    pub fn visible_to<'a>(
        &'a self,
        user: &'a UserRecord,
    ) -> impl Iterator<Item = &'a SavedQuery> + 'a {
        let include_shared = !user
            .setting(AppSetting::IgnoreSharedQueries)
            .unwrap_or(false);
        let username = user.username();
        self.queries_for(username).chain(
            self.shared_queries()
                .filter(move |query| include_shared && query.owner != username),
        )
    }

    /// Owners that have no matching entry in `directory`.
    pub fn orphaned_owners<'a>(
        &'a self,
        directory: &'a UserDirectory,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.owners()
            .filter(move |owner| !directory.contains(owner))
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }

    /// Total number of queries across all owners.
    pub fn len(&self) -> usize {
        self.owners.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
