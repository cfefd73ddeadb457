// src/core/credential.rs

//! Tagged credential hashes and the seam to the hashing primitive.
//!
//! The loader never re-hashes or interprets a credential. It only splits the
//! `{scheme}` prefix off so a caller can route verification to whichever
//! primitive understands that scheme.

use crate::core::errors::SeedError;
use crate::core::seed::{UserDirectory, UserRecord};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// A stored credential such as `{bcrypt}$2a$10$...`.
///
/// The original text is kept verbatim so that re-serialization reproduces it
/// exactly, prefix included.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CredentialHash {
    raw: String,
    /// Byte offset where the payload starts; zero when there is no prefix.
    payload_start: usize,
}

impl CredentialHash {
    /// Splits `{scheme}payload`. Any non-empty string is accepted; one without
    /// a non-empty `{scheme}` prefix is kept whole as an untagged payload, and
    /// a tag with nothing after it has an empty payload.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SeedError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SeedError::Credential("credential must not be empty".into()));
        }

        let payload_start = match raw.strip_prefix('{').and_then(|rest| rest.find('}')) {
            Some(0) | None => 0,
            Some(end) => end + 2,
        };

        Ok(CredentialHash { raw, payload_start })
    }

    /// The scheme tag without braces, e.g. `bcrypt`.
    pub fn scheme(&self) -> Option<&str> {
        (self.payload_start > 0).then(|| &self.raw[1..self.payload_start - 1])
    }

    /// The opaque hash material after the tag.
    pub fn payload(&self) -> &str {
        &self.raw[self.payload_start..]
    }

    /// The credential exactly as it appeared in the fixture.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// Hash material stays out of logs.
impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHash")
            .field("scheme", &self.scheme())
            .field("payload", &"<redacted>")
            .finish()
    }
}

impl Serialize for CredentialHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// A hashing primitive able to check a plaintext candidate against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    /// Whether this verifier understands the given scheme tag.
    fn supports(&self, scheme: Option<&str>) -> bool;

    /// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch.
    fn verify(&self, hash: &CredentialHash, candidate: &str) -> Result<bool, SeedError>;
}

/// Verifies `{argon2}`-tagged PHC strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn supports(&self, scheme: Option<&str>) -> bool {
        scheme.is_some_and(|s| s.eq_ignore_ascii_case("argon2"))
    }

    fn verify(&self, hash: &CredentialHash, candidate: &str) -> Result<bool, SeedError> {
        let parsed = PasswordHash::new(hash.payload())
            .map_err(|e| SeedError::Credential(format!("invalid argon2 hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Looks up `username` and checks `candidate` against its stored credential.
///
/// An unknown user or a wrong password both yield `Ok(None)`.
pub fn authenticate<'a>(
    directory: &'a UserDirectory,
    verifier: &dyn CredentialVerifier,
    username: &str,
    candidate: &str,
) -> Result<Option<&'a UserRecord>, SeedError> {
    let Some(user) = directory.lookup_user(username) else {
        debug!("Authentication for unknown user '{}'", username);
        return Ok(None);
    };

    let credential = user.credential();
    if !verifier.supports(credential.scheme()) {
        return Err(SeedError::UnsupportedScheme(
            credential.scheme().unwrap_or("<none>").to_string(),
        ));
    }

    if verifier.verify(credential, candidate)? {
        Ok(Some(user))
    } else {
        debug!("Credential mismatch for user '{}'", username);
        Ok(None)
    }
}
