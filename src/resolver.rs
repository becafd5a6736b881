//! Remote URL resolution for manifest projects.

use crate::error::{Error, Result};
use crate::manifest::{ProjectEntry, RemoteRegistry};

/// Compute the fetch URL of a project.
///
/// An explicit `url` on the entry wins and only gets `.git` appended.
/// Otherwise the URL base comes from the entry's own remote, or from the
/// manifest default remote, followed by `/<repo-path or name>.git`.
///
/// ```
/// use west_fetch::manifest::{ProjectEntry, RemoteRegistry};
/// use west_fetch::resolver::resolve_url;
///
/// let mut remotes = RemoteRegistry::new();
/// remotes.insert("upstream", "https://github.com/zephyrproject-rtos");
///
/// let entry = ProjectEntry::new("hal_st", "v1.0.0");
/// let url = resolve_url(&entry, &remotes, Some("upstream")).unwrap();
/// assert_eq!(url, "https://github.com/zephyrproject-rtos/hal_st.git");
/// ```
pub fn resolve_url(
    entry: &ProjectEntry,
    registry: &RemoteRegistry,
    default_remote: Option<&str>,
) -> Result<String> {
    if let Some(url) = &entry.url {
        return Ok(format!("{}.git", url));
    }

    let remote_name = entry
        .remote
        .as_deref()
        .or(default_remote)
        .ok_or_else(|| Error::RemoteLookup {
            project: entry.name.clone(),
            remote: "<default>".to_string(),
        })?;

    let url_base = registry
        .url_base(remote_name)
        .ok_or_else(|| Error::RemoteLookup {
            project: entry.name.clone(),
            remote: remote_name.to_string(),
        })?;

    let repo_path = entry.repo_path.as_deref().unwrap_or(&entry.name);
    Ok(format!("{}/{}.git", url_base, repo_path))
}
