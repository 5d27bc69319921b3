//! Tinc control channel
//!
//! Runs the `tinc` binary with the configured argument prefix and captures
//! its output. Failures never escape as errors: a missing binary, a non-zero
//! exit, a signal or a timeout all come back as a failed [`CommandResult`]
//! carrying whatever diagnostic text is available.

use crate::config::TincConfig;
use crate::types::CommandResult;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Anything that can run a tinc control command
#[async_trait]
pub trait ControlClient: Send + Sync {
    /// Run one command and return its normalized result
    async fn invoke(&self, args: &[&str]) -> CommandResult;
}

#[async_trait]
impl<T: ControlClient + ?Sized> ControlClient for Arc<T> {
    async fn invoke(&self, args: &[&str]) -> CommandResult {
        (**self).invoke(args).await
    }
}

/// Control client backed by a child process
#[derive(Debug, Clone)]
pub struct TincControl {
    bin: String,
    params: Vec<String>,
    timeout: Duration,
}

impl TincControl {
    pub fn new(config: &TincConfig) -> Self {
        Self {
            bin: config.bin.clone(),
            params: config.params.clone(),
            timeout: config.timeout(),
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut parts = vec![self.bin.as_str()];
        parts.extend(self.params.iter().map(String::as_str));
        parts.extend_from_slice(args);
        parts.join(" ")
    }
}

#[async_trait]
impl ControlClient for TincControl {
    async fn invoke(&self, args: &[&str]) -> CommandResult {
        let command_line = self.command_line(args);
        debug!("tinc command: {}", command_line);

        let child = Command::new(&self.bin)
            .args(&self.params)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!("Failed to run `{}`: {}", command_line, e);
                return CommandResult::failure(e.to_string());
            }
            Err(_) => {
                error!(
                    "`{}` timed out after {}ms",
                    command_line,
                    self.timeout.as_millis()
                );
                return CommandResult::failure(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                ));
            }
        };

        let result = CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            succeeded: output.status.success(),
        };

        if !result.succeeded {
            match output.status.code() {
                Some(code) => warn!(
                    "`{}` exited with status {}: {}",
                    command_line, code, result.stderr
                ),
                None => warn!("`{}` was terminated by a signal: {}", command_line, result.stderr),
            }
        }

        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> TincControl {
        TincControl::new(&TincConfig {
            bin: "sh".to_string(),
            params: vec!["-c".to_string(), script.to_string(), "tinc".to_string()],
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn test_captures_stdout_and_trims() {
        let control = shell("echo \"args: $*\"; echo");
        let result = control.invoke(&["dump", "invitations"]).await;

        assert!(result.succeeded);
        assert_eq!(result.stdout, "args: dump invitations");
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_a_value() {
        let control = shell("echo 'Host alice already exists' >&2; exit 1");
        let result = control.invoke(&["invite", "alice"]).await;

        assert!(!result.succeeded);
        assert_eq!(result.stderr, "Host alice already exists");
        assert_eq!(result.text(), "Host alice already exists");
    }

    #[tokio::test]
    async fn test_non_zero_exit_with_empty_stderr() {
        let control = shell("exit 2");
        let result = control.invoke(&[]).await;

        assert!(!result.succeeded);
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let control = TincControl::new(&TincConfig {
            bin: "/nonexistent/path/to/tinc".to_string(),
            ..Default::default()
        });
        let result = control.invoke(&["dump", "invitations"]).await;

        assert!(!result.succeeded);
        assert!(!result.stderr.is_empty());
        assert_eq!(result.stdout, "");
    }

    #[tokio::test]
    async fn test_killed_by_signal() {
        let control = shell("kill -9 $$");
        let result = control.invoke(&[]).await;

        assert!(!result.succeeded);
    }

    #[tokio::test]
    async fn test_timeout() {
        let control = shell("sleep 5").with_timeout(Duration::from_millis(200));
        let result = control.invoke(&[]).await;

        assert!(!result.succeeded);
        assert!(result.stderr.contains("timed out"));
    }

    #[test]
    fn test_command_line() {
        let control = TincControl::new(&TincConfig {
            bin: "tinc".to_string(),
            params: vec!["-n".to_string(), "mesh".to_string()],
            timeout_secs: 5,
        });
        assert_eq!(
            control.command_line(&["invite", "alice"]),
            "tinc -n mesh invite alice"
        );
    }
}
