//! Timing policy for the lifecycle controller

use eyre::{Context, Result};
use std::time::Duration;

/// Delay between reaching `Success` and notifying the host
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(3000);

/// Interval between confirmation lookups
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(8);

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// How long the success step stays visible before `on_success` fires
    pub settle_delay: Duration,
    /// Upper bound on waiting for the signer. `None` waits as long as the
    /// user takes on the device.
    pub sign_timeout: Option<Duration>,
    /// Confirmation polling, handed to the provider's `follow_transaction`
    pub follow: FollowPolicy,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            sign_timeout: None,
            follow: FollowPolicy::default(),
        }
    }
}

impl LifecycleConfig {
    /// Read overrides from `TXFLOW_*` environment variables
    ///
    /// Unset variables keep their defaults; malformed values are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(delay) = env_millis("TXFLOW_SETTLE_DELAY_MS")? {
            config.settle_delay = delay;
        }
        config.sign_timeout = env_millis("TXFLOW_SIGN_TIMEOUT_MS")?;
        config.follow = FollowPolicy::from_env()?;
        Ok(config)
    }

    /// Set the settle delay
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Bound the signing step
    pub fn with_sign_timeout(mut self, timeout: Duration) -> Self {
        self.sign_timeout = Some(timeout);
        self
    }

    /// Set the confirmation polling policy
    pub fn with_follow(mut self, follow: FollowPolicy) -> Self {
        self.follow = follow;
        self
    }
}

/// How to wait for network confirmation after broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowPolicy {
    pub poll_interval: Duration,
    /// Give up after this long. `None` polls until confirmed.
    pub max_wait: Option<Duration>,
}

impl Default for FollowPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}

impl FollowPolicy {
    pub fn from_env() -> Result<Self> {
        let mut policy = Self::default();
        if let Some(interval) = env_millis("TXFLOW_POLL_INTERVAL_MS")? {
            policy.poll_interval = interval;
        }
        policy.max_wait = env_millis("TXFLOW_MAX_WAIT_MS")?;
        Ok(policy)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

fn env_millis(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a whole number of milliseconds, got {raw:?}"))?;
            Ok(Some(Duration::from_millis(ms)))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {key}")),
    }
}
