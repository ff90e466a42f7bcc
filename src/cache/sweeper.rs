//! Background eviction task
//!
//! One task per cache selects between a stop signal, the bounded queue of
//! sweep requests and a periodic timer. Every sweep builds a replacement map
//! under the cache lock and swaps it in, so readers never see a half-swept map.

use super::{Entry, Shared};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// tokio rejects a zero timer period
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A queued sweep request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Sweep {
    /// Manual cleanup with the configured ttl
    Full,
    /// Size-triggered cleanup with a reduced ttl
    Accelerated(Duration),
}

/// Effective ttl for a cache holding `population` entries
///
/// Scales `ttl` by `max_size / population`, never going below
/// `min(1s, ttl)`.
pub(super) fn accelerated_ttl(ttl: Duration, max_size: usize, population: usize) -> Duration {
    let floor = ttl.min(Duration::from_secs(1));
    if population == 0 || population <= max_size {
        return ttl;
    }

    let scaled = ttl.as_nanos() * max_size as u128 / population as u128;
    let scaled = Duration::from_nanos(u64::try_from(scaled).unwrap_or(u64::MAX));
    scaled.max(floor)
}

pub(super) async fn run(
    shared: Arc<Shared>,
    mut requests: mpsc::Receiver<Sweep>,
    mut stop: oneshot::Receiver<()>,
) {
    let period = shared.config.interval.max(MIN_INTERVAL);
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let (ttl, reason) = tokio::select! {
            biased;

            _ = &mut stop => break,
            Some(request) = requests.recv() => match request {
                Sweep::Full => (shared.config.ttl, "manual"),
                Sweep::Accelerated(ttl) => (ttl, "accelerated"),
            },
            _ = ticker.tick() => (shared.config.ttl, "interval"),
        };

        sweep(&shared, ttl, reason);
    }

    trace!("cache sweeper stopped");
}

/// Replace the entry map with the entries worth keeping
pub(super) fn sweep(shared: &Shared, ttl: Duration, reason: &'static str) {
    let now = Instant::now();
    let leeway = shared.config.leeway;
    let max_size = shared.config.max_size;

    let mut entries = shared.lock();
    let before = entries.len();

    let mut replacement: HashMap<String, Entry> = std::mem::take(&mut *entries)
        .into_iter()
        .filter(|(_, entry)| {
            now.saturating_duration_since(entry.last_access) <= ttl
                && entry.token.is_valid(leeway)
        })
        .collect();

    if replacement.len() > max_size {
        let mut recent: Vec<(String, Entry)> = replacement.into_iter().collect();
        // Linear partition; the first max_size are the most recently accessed
        recent.select_nth_unstable_by_key(max_size, |(_, entry)| Reverse(entry.last_access));
        recent.truncate(max_size);
        replacement = recent.into_iter().collect();
    }

    *entries = replacement;
    let kept = entries.len();
    drop(entries);

    debug!(
        reason,
        ttl_ms = ttl.as_millis() as u64,
        kept,
        evicted = before - kept,
        "cache sweep"
    );
}
