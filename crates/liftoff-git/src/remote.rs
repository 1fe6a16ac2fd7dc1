//! Remote lookups

use tracing::{debug, instrument};
use url::Url;

use crate::repository::{GitRepo, Result};
use liftoff_core::error::GitError;

impl GitRepo {
    /// Get list of remote names
    pub fn remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .filter_map(|r| r.map(|s| s.to_string()))
            .collect())
    }

    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Browse URL of a remote, if it points at a web-hosted repository
    #[instrument(skip(self))]
    pub fn browse_url(&self, name: &str) -> Result<Option<String>> {
        let Some(raw) = self.remote_url(name)? else {
            return Ok(None);
        };
        let normalized = normalize_remote_url(&raw);
        debug!(remote = name, raw = %raw, normalized = ?normalized, "resolved remote url");
        Ok(normalized)
    }
}

/// Turn a git remote URL into an `https://host/owner/repo` browse URL.
///
/// Handles scp-like (`git@host:owner/repo.git`), `ssh://`, `git://`,
/// `http://` and `https://` remotes. Local paths yield `None`.
///
/// ```rust
/// use liftoff_git::normalize_remote_url;
///
/// assert_eq!(
///     normalize_remote_url("git@github.com:example/dice.git").as_deref(),
///     Some("https://github.com/example/dice")
/// );
/// ```
pub fn normalize_remote_url(remote: &str) -> Option<String> {
    let remote = remote.trim();

    let (host, path) = if remote.contains("://") {
        let url = Url::parse(remote).ok()?;
        if !matches!(url.scheme(), "https" | "http" | "ssh" | "git" | "git+ssh") {
            return None;
        }
        (url.host_str()?.to_string(), url.path().to_string())
    } else {
        let (authority, path) = remote.split_once(':')?;
        let host = authority.rsplit('@').next()?;
        if host.is_empty() || path.starts_with('/') || path.starts_with('\\') {
            return None;
        }
        (host.to_string(), path.to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    Some(format!("https://{}/{}", host, path))
}
