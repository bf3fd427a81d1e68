//! Change notification hook.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Told about an address change after the zone accepted it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// `old_ip` is empty when nothing was published before.
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<()>;
}

/// Runs a user-supplied executable as `<script> <old_ip> <new_ip>`.
pub struct ScriptNotifier {
    script: PathBuf,
    timeout: Duration,
}

impl ScriptNotifier {
    pub fn new(script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for ScriptNotifier {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<()> {
        tracing::debug!(
            "Running {} {:?} {:?}",
            self.script.display(),
            old_ip,
            new_ip
        );

        let output = Command::new(&self.script)
            .arg(old_ip)
            .arg(new_ip)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| {
                DdnsError::Notifier(format!(
                    "{} did not finish within {}s",
                    self.script.display(),
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| DdnsError::Notifier(format!("{}: {}", self.script.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DdnsError::Notifier(format!(
                "{} exited with {}: {}",
                self.script.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_successful_script() {
        let notifier = ScriptNotifier::new("/bin/true", TIMEOUT);
        assert_ok!(notifier.notify("203.0.113.1", "203.0.113.2").await);
    }

    #[tokio::test]
    async fn test_empty_old_ip_is_passed() {
        let notifier = ScriptNotifier::new("/bin/true", TIMEOUT);
        assert_ok!(notifier.notify("", "203.0.113.2").await);
    }

    #[tokio::test]
    async fn test_failing_script() {
        let notifier = ScriptNotifier::new("/bin/false", TIMEOUT);
        let err = assert_err!(notifier.notify("203.0.113.1", "203.0.113.2").await);
        assert!(matches!(err, DdnsError::Notifier(_)));
    }

    #[tokio::test]
    async fn test_slow_script_times_out() {
        // sleep adds up its operands, so this would run for a minute.
        let notifier = ScriptNotifier::new("/bin/sleep", Duration::from_secs(1));
        let err = assert_err!(notifier.notify("30", "30").await);
        assert!(err.to_string().contains("did not finish"));
    }

    #[tokio::test]
    async fn test_missing_script() {
        let notifier = ScriptNotifier::new("/nonexistent/route53-ddns-hook", TIMEOUT);
        let err = assert_err!(notifier.notify("", "203.0.113.2").await);
        assert!(matches!(err, DdnsError::Notifier(_)));
    }
}
