// src/core/seed/mod.rs

//! The seed loader: parses the user and saved-query fixture into read-only
//! in-memory directories.

pub mod authority;
pub mod loader;
mod raw;
pub mod query;
pub mod settings;
pub mod user;

pub use authority::Authority;
pub use loader::{LoadOptions, SeedFixture, load, load_with};
pub use query::{QueryLibrary, SavedQuery};
pub use settings::{AppSetting, AppSettings, SettingKey};
pub use user::{UserDirectory, UserRecord};
