//! Platform-specific process termination.

use crate::error::{Result, SoundMapError};
use std::process::Child;
use std::thread::sleep;
use std::time::Duration;
use tracing::debug;

/// Terminate a spawned child gracefully, then forcefully if needed, and
/// reap it.
///
/// # Platform Behavior
/// - **Linux/macOS**: Sends SIGTERM, waits up to `timeout_ms`, then SIGKILL
/// - **Other**: `Child::kill` straight away
///
/// # Returns
/// `true` if the process is gone (or had already exited).
pub fn terminate_child(child: &mut Child, timeout_ms: u64) -> Result<bool> {
    let pid = child.id();

    if child.try_wait()?.is_some() {
        debug!("Process {} already exited", pid);
        return Ok(true);
    }

    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        debug!("Sending SIGTERM to process {}", pid);
        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => {}
            Err(nix::errno::Errno::ESRCH) => {
                let _ = child.try_wait();
                return Ok(true);
            }
            Err(e) => debug!("Failed to send SIGTERM to {}: {}", pid, e),
        }

        let wait_interval = Duration::from_millis(100);
        for _ in 0..(timeout_ms / 100).max(1) {
            sleep(wait_interval);
            if child.try_wait()?.is_some() {
                debug!("Process {} terminated gracefully", pid);
                return Ok(true);
            }
        }

        debug!("Process {} still running, sending SIGKILL", pid);
    }

    #[cfg(not(unix))]
    let _ = timeout_ms;

    if let Err(e) = child.kill() {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        return Err(SoundMapError::Other(format!(
            "Failed to kill process {}: {}",
            pid, e
        )));
    }

    sleep(Duration::from_millis(100));
    Ok(child.try_wait()?.is_some())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_terminate_running_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        assert!(terminate_child(&mut child, 500).unwrap());
    }

    #[test]
    fn test_terminate_exited_child() {
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().unwrap();
        assert!(terminate_child(&mut child, 100).unwrap());
    }
}
