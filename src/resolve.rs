use crate::types::{PushEvent, Registry, RegistryEntry};

/// Looks up the registry entry for a normalized push event.
///
/// A branch-qualified key (`"{owner}/{name}/branch:{branch}"`) is tried
/// first when a branch was extracted; otherwise, and on a miss, the plain
/// `"{owner}/{name}"` key is used. Branch-qualified entries always win
/// over unqualified ones. Returns the matched key alongside the entry so
/// callers can log which rule fired.
pub fn resolve<'a>(
    registry: &'a Registry,
    event: &PushEvent,
) -> Option<(&'a str, &'a RegistryEntry)> {
    if let Some(branch) = &event.branch {
        let qualified = format!("{}/{}/branch:{}", event.owner, event.name, branch);
        if let Some((key, entry)) = registry.get_key_value(&qualified) {
            return Some((key.as_str(), entry));
        }
    }

    registry
        .get_key_value(&event.qualified_name())
        .map(|(key, entry)| (key.as_str(), entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> RegistryEntry {
        RegistryEntry {
            path: Some(path.to_string()),
            key: None,
            action: None,
        }
    }

    fn push(owner: &str, name: &str, branch: Option<&str>) -> PushEvent {
        PushEvent {
            owner: owner.to_string(),
            name: name.to_string(),
            branch: branch.map(str::to_string),
        }
    }

    #[test]
    fn branch_qualified_entry_wins_over_unqualified() {
        let mut registry = Registry::new();
        registry.insert("acme/site".to_string(), entry("/srv/any"));
        registry.insert("acme/site/branch:main".to_string(), entry("/srv/main"));

        let (key, matched) = resolve(&registry, &push("acme", "site", Some("main"))).unwrap();
        assert_eq!(key, "acme/site/branch:main");
        assert_eq!(matched.path.as_deref(), Some("/srv/main"));
    }

    #[test]
    fn falls_back_to_unqualified_for_other_branches() {
        let mut registry = Registry::new();
        registry.insert("acme/site".to_string(), entry("/srv/any"));
        registry.insert("acme/site/branch:main".to_string(), entry("/srv/main"));

        let (key, _) = resolve(&registry, &push("acme", "site", Some("develop"))).unwrap();
        assert_eq!(key, "acme/site");
    }

    #[test]
    fn no_branch_uses_unqualified_key_only() {
        let mut registry = Registry::new();
        registry.insert("acme/site/branch:main".to_string(), entry("/srv/main"));

        assert!(resolve(&registry, &push("acme", "site", None)).is_none());
    }

    #[test]
    fn unknown_repository_resolves_to_none() {
        let registry = Registry::new();
        assert!(resolve(&registry, &push("acme", "site", Some("main"))).is_none());
    }

    #[test]
    fn owner_is_part_of_the_key() {
        let mut registry = Registry::new();
        registry.insert("acme/site".to_string(), entry("/srv/site"));

        assert!(resolve(&registry, &push("evil", "site", None)).is_none());
    }
}
