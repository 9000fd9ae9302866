use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One configured repository/branch entry from the registry file.
///
/// Keyed in the registry by `"{owner}/{name}"` or
/// `"{owner}/{name}/branch:{branch}"`. Every field is optional: an entry
/// with no `key` is trusted by configuration, an entry with no `action`
/// dispatches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub path: Option<String>,
    pub key: Option<String>,
    pub action: Option<Vec<Vec<String>>>,
}

impl RegistryEntry {
    /// Canonical byte encoding of the secret key, applied uniformly to
    /// every entry. `None` means signature verification is skipped.
    pub fn secret(&self) -> Option<&[u8]> {
        self.key.as_deref().map(str::as_bytes)
    }

    /// Working directory for this entry's actions.
    pub fn workdir(&self) -> &Path {
        Path::new(self.path.as_deref().unwrap_or("."))
    }
}

pub type Registry = HashMap<String, RegistryEntry>;

/// Normalized push event: the `(owner, name, branch)` triple extracted
/// from a provider payload. `branch` is `None` when the ref did not look
/// like `refs/heads/<branch>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub owner: String,
    pub name: String,
    pub branch: Option<String>,
}

impl PushEvent {
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct PushPayload {
    pub repository: Option<PayloadRepository>,
    pub project: Option<PayloadProject>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadRepository {
    pub name: Option<String>,
    pub owner: Option<PayloadOwner>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadOwner {
    pub name: Option<String>,
}

/// Alternate payload shape: GitLab puts the owning group on
/// `project.namespace` instead of `repository.owner.name`.
#[derive(Debug, Deserialize)]
pub struct PayloadProject {
    pub namespace: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub msg: &'static str,
}

impl Ack {
    pub const HI: Ack = Ack { msg: "Hi!" };
    pub const WRONG_EVENT: Ack = Ack { msg: "wrong event type" };
    pub const DONE: Ack = Ack { msg: "Done!" };
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}
