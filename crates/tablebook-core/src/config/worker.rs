//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for the expired-lock sweep.
    #[serde(default = "default_lock_cleanup_cron")]
    pub lock_cleanup_cron: String,
    /// Cron schedule for the stale-pending sweep.
    #[serde(default = "default_auto_cancel_cron")]
    pub auto_cancel_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lock_cleanup_cron: default_lock_cleanup_cron(),
            auto_cancel_cron: default_auto_cancel_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Every 5 minutes.
fn default_lock_cleanup_cron() -> String {
    "0 */5 * * * *".to_string()
}

/// Hourly.
fn default_auto_cancel_cron() -> String {
    "0 0 * * * *".to_string()
}
