// src/core/state/core.rs

//! Defines `SeedStore`, the shared holder of the currently loaded fixture.

use crate::core::errors::SeedError;
use crate::core::seed::{LoadOptions, QueryLibrary, SeedFixture, UserDirectory};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// One immutable, fully validated load of the fixture.
#[derive(Debug)]
pub struct SeedSnapshot {
    fixture: SeedFixture,
    /// Starts at 1 and increases by one on every successful reload.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

impl SeedSnapshot {
    pub fn fixture(&self) -> &SeedFixture {
        &self.fixture
    }

    pub fn users(&self) -> &UserDirectory {
        self.fixture.users()
    }

    pub fn queries(&self) -> &QueryLibrary {
        self.fixture.user_queries()
    }
}

/// Holds the active snapshot. Readers clone the `Arc` and keep a consistent
/// view for as long as they need it; a reload swaps in a whole new snapshot
/// and never edits the old one.
#[derive(Debug)]
pub struct SeedStore {
    path: PathBuf,
    options: LoadOptions,
    current: RwLock<Arc<SeedSnapshot>>,
}

impl SeedStore {
    /// Loads the fixture at `path`. Fails if the first load fails; there is
    /// no empty fallback.
    pub async fn open(path: impl Into<PathBuf>, options: LoadOptions) -> Result<Self, SeedError> {
        let path = path.into();
        info!("Loading seed fixture from '{}'.", path.display());
        let fixture = read_fixture(&path, &options).await.inspect_err(|e| {
            error!("Failed to load seed fixture '{}': {}", path.display(), e);
        })?;

        Ok(SeedStore {
            path,
            options,
            current: RwLock::new(Arc::new(SeedSnapshot {
                fixture,
                generation: 1,
                loaded_at: Utc::now(),
            })),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn snapshot(&self) -> Arc<SeedSnapshot> {
        self.current.read().clone()
    }

    /// Re-reads the fixture and swaps it in whole. On any error the previous
    /// snapshot stays active.
    pub async fn reload(&self) -> Result<Arc<SeedSnapshot>, SeedError> {
        let fixture = match read_fixture(&self.path, &self.options).await {
            Ok(fixture) => fixture,
            Err(e) => {
                error!(
                    "Reload of '{}' failed, keeping generation {}: {}",
                    self.path.display(),
                    self.current.read().generation,
                    e
                );
                return Err(e);
            }
        };

        let mut current = self.current.write();
        let next = Arc::new(SeedSnapshot {
            fixture,
            generation: current.generation + 1,
            loaded_at: Utc::now(),
        });
        *current = Arc::clone(&next);
        info!(
            "Seed fixture reloaded (generation {}, {} users).",
            next.generation,
            next.users().len()
        );
        Ok(next)
    }
}

async fn read_fixture(path: &Path, options: &LoadOptions) -> Result<SeedFixture, SeedError> {
    let bytes = tokio::fs::read(path).await?;
    SeedFixture::from_slice_with(&bytes, options)
}
