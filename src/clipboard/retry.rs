//! Bounded retry for clipboard reads.

use std::time::Duration;

use crate::config::ClipboardConfig;

use super::ClipboardError;

/// How hard to try before giving up on a busy clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ClipboardConfig) -> Self {
        Self {
            attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or the policy is exhausted.
///
/// * `Ok(value)`: returned as-is (`None` means "nothing on the clipboard").
/// * transient `Err`: logged, then retried after `policy.delay`.
/// * permanent `Err` or exhausted attempts: `None`.
///
/// Errors never escape this function.
pub fn read_with_retry<T, F>(policy: &RetryPolicy, mut op: F) -> Option<T>
where
    F: FnMut() -> Result<Option<T>, ClipboardError>,
{
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match op() {
            Ok(value) => return value,
            Err(e) if e.is_transient() => {
                log::warn!("clipboard: read failed, attempt {attempt}/{attempts}: {e}");
                if attempt < attempts {
                    std::thread::sleep(policy.delay);
                }
            }
            Err(e) => {
                log::debug!("clipboard: read failed permanently: {e}");
                return None;
            }
        }
    }

    log::debug!("clipboard: giving up after {attempts} attempts");
    None
}
