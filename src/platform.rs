//! Platform detection utilities

use crate::{Result, RobopError};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Detect if running in WSL (Windows Subsystem for Linux)
///
/// Checks for WSL-specific indicators in /proc/version and environment variables.
pub fn is_wsl() -> bool {
    if let Ok(contents) = fs::read_to_string("/proc/version") {
        let lower = contents.to_lowercase();
        if lower.contains("microsoft") || lower.contains("wsl") {
            return true;
        }
    }

    std::env::var("WSL_DISTRO_NAME").is_ok()
}

/// Point PulseAudio clients at the WSLg server when needed
///
/// On native Linux the default PulseAudio socket is left alone.
pub fn setup_pulseaudio() -> Result<()> {
    const WSLG_PULSE_PATH: &str = "/mnt/wslg/PulseServer";

    if std::env::var("PULSE_SERVER").is_ok() {
        debug!("PULSE_SERVER already set via environment");
        return Ok(());
    }

    if std::path::Path::new(WSLG_PULSE_PATH).exists() {
        info!("Auto-detected WSLG PulseAudio server at {}", WSLG_PULSE_PATH);
        std::env::set_var("PULSE_SERVER", format!("unix:{}", WSLG_PULSE_PATH));
        return Ok(());
    }

    if is_wsl() {
        warn!("WSLG PulseAudio server not found at {}", WSLG_PULSE_PATH);
        warn!("Install WSLg or set PULSE_SERVER to your PulseAudio server");
        return Err(RobopError::Other(
            "PulseAudio server not found. Install WSLg or set PULSE_SERVER.".to_string(),
        ));
    }

    Ok(())
}

/// Check that an executable runs with `--version`
pub fn probe_executable(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Write `input` to a spawned child's stdin, then wait for it
///
/// The child is always reaped. A non-zero exit is reported with its stderr
/// even when the write failed (a tool that exits early closes its stdin);
/// the write error only surfaces if the tool claims success.
pub fn feed_and_wait(mut child: Child, program: &str, input: &[u8]) -> Result<()> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input),
        None => Ok(()),
    };

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(RobopError::ExternalTool(format!(
            "{} failed ({}): {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    if let Err(e) = written {
        warn!("{} exited successfully but did not take all input: {}", program, e);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_wsl() {
        // Only checks that detection does not panic; the result is host dependent
        let _ = is_wsl();
    }

    #[test]
    fn test_probe_missing_executable() {
        assert!(!probe_executable("robop-no-such-program"));
    }

    fn spawn_sh(script: &str) -> Child {
        Command::new("sh")
            .args(["-c", script])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[test]
    fn test_feed_and_wait_success() {
        let child = spawn_sh("cat > /dev/null");
        assert!(feed_and_wait(child, "cat", b"hello").is_ok());
    }

    #[test]
    fn test_early_exit_reports_status_not_broken_pipe() {
        // exits without reading, so a large write hits a closed pipe
        let child = spawn_sh("echo 'no voice' >&2; exit 3");
        let input = vec![b'a'; 1 << 20];
        let err = feed_and_wait(child, "fake-tts", &input).unwrap_err();
        match err {
            RobopError::ExternalTool(msg) => {
                assert!(msg.contains("fake-tts"));
                assert!(msg.contains("no voice"));
            }
            other => panic!("expected ExternalTool, got {:?}", other),
        }
    }
}
