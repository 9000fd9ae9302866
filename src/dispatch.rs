use crate::types::RegistryEntry;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs one configured action to completion.
///
/// Injected into the dispatcher so the sequencing logic is testable
/// without spawning processes. Returns the exit code, or `None` when the
/// process was killed before exiting normally.
#[rocket::async_trait]
pub trait ActionRunner: Send + Sync {
    async fn run(&self, command: &[String], workdir: &Path) -> io::Result<Option<i32>>;
}

/// Production runner: spawns each action as an external process with the
/// entry's working directory, inheriting stdout/stderr.
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        ProcessRunner { timeout }
    }
}

#[rocket::async_trait]
impl ActionRunner for ProcessRunner {
    async fn run(&self, command: &[String], workdir: &Path) -> io::Result<Option<i32>> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty action"))?;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        // Bounded execution: a hung action must not wedge the worker.
        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => Ok(status?.code()),
            Err(_) => {
                let rendered = command.join(" ");
                warn!(
                    command = %rendered,
                    timeout_secs = self.timeout.as_secs(),
                    "action timed out, killing it"
                );
                child.start_kill().ok();
                let _ = child.wait().await;
                Ok(None)
            }
        }
    }
}

/// Runs the entry's configured actions strictly in sequence.
///
/// An action failure of any kind (non-zero exit, spawn error, kill) is
/// logged and the sequence continues; exit codes never reach the HTTP
/// response.
pub async fn dispatch(runner: &dyn ActionRunner, entry: &RegistryEntry) {
    let Some(actions) = entry.action.as_deref() else {
        debug!("no actions configured, nothing to dispatch");
        return;
    };

    let workdir = entry.workdir();
    for command in actions {
        let rendered = command.join(" ");
        match runner.run(command, workdir).await {
            Ok(Some(0)) => debug!(command = %rendered, "action completed"),
            Ok(Some(code)) => warn!(command = %rendered, code, "action exited non-zero"),
            Ok(None) => warn!(command = %rendered, "action terminated without exit code"),
            Err(err) => warn!(command = %rendered, error = %err, "action failed to start"),
        }
    }
}
