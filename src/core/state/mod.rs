// src/core/state/mod.rs

//! Shared, reloadable state built on top of the seed loader.

mod core;

pub use core::{SeedSnapshot, SeedStore};
