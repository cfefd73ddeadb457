// src/core/seed/settings.rs

use crate::core::errors::SeedError;
use crate::core::seed::raw::{ObjectView, RawNode, child_path};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The per-user toggles the workbench understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum AppSetting {
    #[strum(serialize = "DEFAULT_INFERENCE")]
    DefaultInference,
    #[strum(serialize = "DEFAULT_VIS_GRAPH_SCHEMA")]
    DefaultVisGraphSchema,
    #[strum(serialize = "DEFAULT_SAMEAS")]
    DefaultSameAs,
    #[strum(serialize = "IGNORE_SHARED_QUERIES")]
    IgnoreSharedQueries,
    #[strum(serialize = "EXECUTE_COUNT")]
    ExecuteCount,
}

/// A settings key: either one of the known toggles or a name this version
/// does not recognize yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Known(AppSetting),
    Unrecognized(String),
}

impl SettingKey {
    pub fn parse(name: &str) -> Self {
        match AppSetting::from_str(name) {
            Ok(setting) => SettingKey::Known(setting),
            Err(_) => SettingKey::Unrecognized(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SettingKey::Known(setting) => setting.as_ref(),
            SettingKey::Unrecognized(name) => name,
        }
    }
}

/// The `appSettings` object of a user, in fixture order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppSettings {
    values: IndexMap<SettingKey, bool>,
}

impl AppSettings {
    pub(crate) fn from_raw(node: &RawNode, path: &str) -> Result<Self, SeedError> {
        let view = ObjectView::new(node, path)?;
        let mut values = IndexMap::new();
        for (name, value) in view.entries() {
            let flag = value.as_bool(&child_path(view.path(), name))?;
            values.insert(SettingKey::parse(name), flag);
        }
        Ok(AppSettings { values })
    }

    pub fn get(&self, setting: AppSetting) -> Option<bool> {
        self.values.get(&SettingKey::Known(setting)).copied()
    }

    /// Looks up any key by its wire name, recognized or not.
    pub fn get_by_name(&self, name: &str) -> Option<bool> {
        self.values.get(&SettingKey::parse(name)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SettingKey, bool)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Keys preserved from the fixture that no `AppSetting` variant matches.
    pub fn unrecognized(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().filter_map(|(k, v)| match k {
            SettingKey::Unrecognized(name) => Some((name.as_str(), *v)),
            SettingKey::Known(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for AppSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}
