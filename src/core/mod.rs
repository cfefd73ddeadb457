// src/core/mod.rs

//! The central module containing the seed loader and the types built on it.

pub mod credential;
pub mod errors;
pub mod seed;
pub mod state;

pub use errors::SeedError;
pub use seed::{QueryLibrary, SavedQuery, SeedFixture, UserDirectory, UserRecord, load};
