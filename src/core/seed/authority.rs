// src/core/seed/authority.rs

/// Granted to administrators; implies every repository permission.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_USER: &str = "ROLE_USER";

const ROLE_PREFIX: &str = "ROLE_";
const READ_REPO_PREFIX: &str = "READ_REPO_";
const WRITE_REPO_PREFIX: &str = "WRITE_REPO_";

/// Matches every repository in a `READ_REPO_*` / `WRITE_REPO_*` token.
pub const ANY_REPO: &str = "*";

/// A borrowed view of one authority token, split by its conventional prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority<'a> {
    Role(&'a str),
    ReadRepo(&'a str),
    WriteRepo(&'a str),
    Other(&'a str),
}

impl<'a> Authority<'a> {
    pub fn classify(token: &'a str) -> Self {
        if let Some(repo) = token.strip_prefix(READ_REPO_PREFIX) {
            Authority::ReadRepo(repo)
        } else if let Some(repo) = token.strip_prefix(WRITE_REPO_PREFIX) {
            Authority::WriteRepo(repo)
        } else if let Some(role) = token.strip_prefix(ROLE_PREFIX) {
            Authority::Role(role)
        } else {
            Authority::Other(token)
        }
    }

    /// Whether this token grants read access to `repo`. Write implies read.
    pub fn grants_read(&self, repo: &str) -> bool {
        match self {
            Authority::ReadRepo(r) | Authority::WriteRepo(r) => *r == repo || *r == ANY_REPO,
            _ => false,
        }
    }

    pub fn grants_write(&self, repo: &str) -> bool {
        matches!(self, Authority::WriteRepo(r) if *r == repo || *r == ANY_REPO)
    }
}
