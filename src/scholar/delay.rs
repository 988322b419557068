//! Politeness pause between page fetches

use crate::config::AggregationConfig;
use rand::Rng;
use std::time::Duration;

/// How long the aggregator waits before requesting the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDelay {
    /// Continue immediately
    None,

    /// Always wait the same amount
    Fixed(Duration),

    /// Wait a uniformly random number of milliseconds in `[min_ms, max_ms)`
    Uniform { min_ms: u64, max_ms: u64 },
}

impl PageDelay {
    /// Builds the delay described by the aggregation settings
    pub fn from_config(config: &AggregationConfig) -> Self {
        match (config.min_delay_ms, config.max_delay_ms) {
            (0, 0) => Self::None,
            (min, max) if min >= max => Self::Fixed(Duration::from_millis(min)),
            (min_ms, max_ms) => Self::Uniform { min_ms, max_ms },
        }
    }

    /// Picks the next pause length
    pub fn next_duration(&self) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(duration) => duration,
            Self::Uniform { min_ms, max_ms } if min_ms >= max_ms => Duration::from_millis(min_ms),
            Self::Uniform { min_ms, max_ms } => {
                Duration::from_millis(rand::rng().random_range(min_ms..max_ms))
            }
        }
    }

    /// Suspends the current task; other tasks keep running
    pub async fn pause(&self) {
        let duration = self.next_duration();
        if duration.is_zero() {
            return;
        }

        tracing::debug!("Waiting {}ms before next page", duration.as_millis());
        tokio::time::sleep(duration).await;
    }
}

impl Default for PageDelay {
    fn default() -> Self {
        Self::from_config(&AggregationConfig::default())
    }
}
