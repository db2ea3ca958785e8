use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long a launcher gets to report a failure before it is left alone.
pub const LAUNCH_GRACE: Duration = Duration::from_secs(2);

/// How an external helper (launcher, archiver) finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    Failed { code: Option<i32> },
    /// Killed after exceeding its time budget.
    TimedOut,
    /// Still running when we stopped waiting; left to finish on its own.
    Running,
    /// Could not be started at all, usually because it is not installed.
    Unavailable(String),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success)
    }

    pub fn describe(&self) -> String {
        match self {
            ProcessOutcome::Success => "ok".to_string(),
            ProcessOutcome::Failed { code: Some(code) } => format!("exited with status {}", code),
            ProcessOutcome::Failed { code: None } => "terminated by signal".to_string(),
            ProcessOutcome::TimedOut => "timed out".to_string(),
            ProcessOutcome::Running => "still running".to_string(),
            ProcessOutcome::Unavailable(reason) => format!("unavailable: {}", reason),
        }
    }
}

/// Spawn `command` and wait at most `timeout` for it. A child that overruns
/// is killed and reaped. stdout is discarded, stderr goes to ours.
pub fn run_with_timeout(mut command: Command, timeout: Duration) -> ProcessOutcome {
    command.stdin(Stdio::null()).stdout(Stdio::null());
    let (program, mut child) = match spawn(command) {
        Ok(spawned) => spawned,
        Err(outcome) => return outcome,
    };

    match wait_until(&program, &mut child, Instant::now() + timeout) {
        Some(outcome) => outcome,
        None => {
            warn!("{} did not finish within {:?}, killing it", program, timeout);
            if let Err(err) = kill_and_reap(&mut child) {
                warn!("Error stopping {}: {}", program, err);
            }
            ProcessOutcome::TimedOut
        }
    }
}

/// Start a launcher that may legitimately keep running (a viewer opened in
/// the foreground, say). Waits up to `grace` for an early exit status; after
/// that the child is never killed, only reaped from a background thread.
pub fn launch_detached(mut command: Command, grace: Duration) -> ProcessOutcome {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let (program, mut child) = match spawn(command) {
        Ok(spawned) => spawned,
        Err(outcome) => return outcome,
    };

    match wait_until(&program, &mut child, Instant::now() + grace) {
        Some(outcome) => outcome,
        None => {
            debug!("{} still running after {:?}, leaving it", program, grace);
            thread::spawn(move || {
                let _ = child.wait();
            });
            ProcessOutcome::Running
        }
    }
}

fn spawn(mut command: Command) -> Result<(String, Child), ProcessOutcome> {
    let program = command.get_program().to_string_lossy().into_owned();
    match command.spawn() {
        Ok(child) => Ok((program, child)),
        Err(err) => {
            warn!("Could not start {}: {}", program, err);
            Err(ProcessOutcome::Unavailable(err.to_string()))
        }
    }
}

/// Poll `child` until it exits or `deadline` passes (`None`).
fn wait_until(program: &str, child: &mut Child, deadline: Instant) -> Option<ProcessOutcome> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => {
                debug!("{} finished successfully", program);
                return Some(ProcessOutcome::Success);
            }
            Ok(Some(status)) => {
                warn!("{} failed: {}", program, status);
                return Some(ProcessOutcome::Failed {
                    code: status.code(),
                });
            }
            Ok(None) if Instant::now() >= deadline => return None,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                warn!("Error waiting for {}: {}", program, err);
                let _ = kill_and_reap(child);
                return Some(ProcessOutcome::Failed { code: None });
            }
        }
    }
}

fn kill_and_reap(child: &mut Child) -> io::Result<()> {
    child.kill()?;
    child.wait().map(|_| ())
}
