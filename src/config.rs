use crate::errors::HookError;
use crate::types::Registry;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const REGISTRY_FILE: &str = "repositories.json";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 300;

/// Explicit service configuration, assembled once in `main` and handed to
/// the service constructor. Replaces global framework flags.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub debug_mode: bool,
    pub trust_proxy_headers: bool,
    pub listen_port: u16,
    pub registry_path: PathBuf,
    pub action_timeout: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        ServiceOptions {
            debug_mode: false,
            trust_proxy_headers: false,
            listen_port: DEFAULT_PORT,
            registry_path: PathBuf::from(REGISTRY_FILE),
            action_timeout: Duration::from_secs(DEFAULT_ACTION_TIMEOUT_SECS),
        }
    }
}

impl ServiceOptions {
    /// Builds options from the environment and the command line: positional
    /// argument 1 is the listening port (default 80, ignored if unparseable).
    pub fn from_env() -> Self {
        let listen_port = env::args()
            .nth(1)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let registry_path = env::var("REPOSITORIES_JSON")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(REGISTRY_FILE)
            });

        let action_timeout = env::var("ACTION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_ACTION_TIMEOUT_SECS));

        ServiceOptions {
            debug_mode: env_flag("DEBUG"),
            trust_proxy_headers: env_flag("USE_PROXYFIX"),
            listen_port,
            registry_path,
            action_timeout,
        }
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Reads the registry file fresh. Called at the start of every webhook
/// request so operator edits take effect without a restart; concurrent
/// edits between requests are tolerated, not serialized.
pub fn load_registry(path: &std::path::Path) -> Result<Registry, HookError> {
    let data = fs::read_to_string(path)
        .map_err(|err| HookError::Registry(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&data)
        .map_err(|err| HookError::Registry(format!("{}: {}", path.display(), err)))
}
