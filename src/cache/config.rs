use std::time::Duration;

/// Configuration for a token [`Cache`](super::Cache)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Idle time after which an entry is dropped (default: 5 minutes)
    pub ttl: Duration,

    /// Clock-skew tolerance when checking token validity (default: 1 minute)
    pub leeway: Duration,

    /// Period of the background sweep (default: 1 minute)
    pub interval: Duration,

    /// Population above which sweeps are accelerated (default: 10 000)
    pub max_size: usize,

    /// Capacity of the cleanup-request queue (default: 16)
    pub queue_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            leeway: Duration::from_secs(60),
            interval: Duration::from_secs(60),
            max_size: 10_000,
            queue_capacity: 16,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle time-to-live
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the clock-skew tolerance
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set the sweep period
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the population bound
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the cleanup-request queue capacity (at least 1)
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}
