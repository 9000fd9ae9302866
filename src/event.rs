use crate::errors::HookError;
use crate::types::{PushEvent, PushPayload};

/// Extracts the `(owner, name, branch)` triple from a raw push payload.
///
/// The owner comes from `repository.owner.name` when the provider sends
/// one, falling back to `project.namespace` for the alternate payload
/// shape. A ref that does not match `refs/heads/<branch>` yields no
/// branch, which restricts resolution to the unqualified key.
pub fn normalize(body: &[u8]) -> Result<PushEvent, HookError> {
    let payload: PushPayload = serde_json::from_slice(body)
        .map_err(|err| HookError::MalformedPayload(err.to_string()))?;

    let repository = payload
        .repository
        .as_ref()
        .ok_or_else(|| HookError::MalformedPayload("missing repository object".to_string()))?;

    let name = repository
        .name
        .clone()
        .ok_or_else(|| HookError::MalformedPayload("missing repository.name".to_string()))?;

    let owner = repository
        .owner
        .as_ref()
        .and_then(|owner| owner.name.clone())
        .or_else(|| payload.project.as_ref().and_then(|p| p.namespace.clone()))
        .ok_or_else(|| {
            HookError::MalformedPayload(
                "missing repository.owner.name and project.namespace".to_string(),
            )
        })?;

    let branch = payload
        .git_ref
        .as_deref()
        .and_then(parse_branch)
        .map(str::to_string);

    Ok(PushEvent {
        owner,
        name,
        branch,
    })
}

/// Parses `refs/heads/<branch>` into the branch name; anything else is
/// not a branch push.
fn parse_branch(git_ref: &str) -> Option<&str> {
    git_ref.strip_prefix("refs/heads/").filter(|b| !b.is_empty())
}
