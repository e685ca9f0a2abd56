//! Command execution abstraction for testability.
//!
//! Trait-based abstraction over external process invocation, so the
//! validator and reload steps can be mocked in tests without touching a
//! real nftables installation. The production implementation bounds every
//! invocation with a timeout; a hung validator is reported as a failure
//! instead of stalling the run.

use anyhow::Result;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[cfg(test)]
use mockall::automock;

/// Output from command execution
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// The exit code, if available
    pub code: Option<i32>,
}

/// Trait for command execution, allowing dependency injection for testing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with the given arguments and wait for it to exit.
    async fn execute(&self, cmd: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Real implementation that runs system commands with a bounded timeout.
#[derive(Debug, Clone)]
pub struct RealCommandExecutor {
    timeout: Duration,
}

impl RealCommandExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(&self, cmd: &str, args: &[String]) -> Result<CommandOutput> {
        let child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| {
                anyhow::anyhow!("{} timed out after {}s", cmd, self.timeout.as_secs())
            })??;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Helper to convert a slice of &str to Vec<String>.
///
/// Mockall has issues with lifetimes in `&[&str]`, so the trait signature
/// uses `&[String]` instead.
pub fn args_to_strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_strings() {
        let args = args_to_strings(&["-cf", "/etc/nftables.conf"]);
        assert_eq!(args, vec!["-cf", "/etc/nftables.conf"]);
    }

    #[test]
    fn test_command_output_default() {
        let output = CommandOutput::default();
        assert!(output.stdout.is_empty());
        assert!(!output.success);
        assert!(output.code.is_none());
    }

    #[tokio::test]
    async fn test_real_executor_success() {
        let executor = RealCommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute("echo", &args_to_strings(&["-n", "hello"]))
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.code, Some(0));
    }

    #[tokio::test]
    async fn test_real_executor_nonzero_exit() {
        let executor = RealCommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute("ls", &args_to_strings(&["--invalid-flag"]))
            .await
            .unwrap();
        assert!(!output.success);
    }

    #[tokio::test]
    async fn test_real_executor_timeout_is_failure() {
        let executor = RealCommandExecutor::new(Duration::from_millis(50));
        let result = executor.execute("sleep", &args_to_strings(&["5"])).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_mock_executor() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute()
            .withf(|cmd, args| cmd == "nft" && args == ["-cf".to_string(), "/x".to_string()])
            .times(1)
            .returning(|_, _| {
                Ok(CommandOutput {
                    success: true,
                    code: Some(0),
                    ..Default::default()
                })
            });

        let output = mock
            .execute("nft", &args_to_strings(&["-cf", "/x"]))
            .await
            .unwrap();
        assert!(output.success);
    }
}
