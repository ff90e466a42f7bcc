//! Cache of verified tokens
//!
//! Verifying a signature is the expensive part of handling a bearer token.
//! [`Cache`] maps canonical token text to tokens that were already verified,
//! handing them back while they stay valid and were accessed recently.
//!
//! Entries leave the cache when a lookup finds them invalid or idle, when a
//! sweep drops them, or when the cache is stopped. Sweeps run on a background
//! task: periodically, on [`Cache::cleanup`], and sooner with a shorter ttl
//! once the population exceeds [`CacheConfig::max_size`].

mod config;
mod sweeper;

pub use config::CacheConfig;

use crate::error::{Error, Result};
use crate::token::Token;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, trace};

use sweeper::Sweep;

struct Entry {
    token: Token,
    last_access: Instant,
}

struct Shared {
    entries: Mutex<HashMap<String, Entry>>,
    config: CacheConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Concurrent cache of verified tokens
///
/// Must be created inside a Tokio runtime, which runs its sweep task;
/// elsewhere [`Cache::new`] fails with [`Error::NoRuntime`].
///
/// ```
/// use jwtoken::{Algorithm, Cache, CacheConfig, Claims, Key, Token};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> jwtoken::Result<()> {
/// let cache = Cache::new(CacheConfig::default())?;
/// let token = Token::encode(Claims::new(), &Key::secret("secret"), Algorithm::HS256)?;
///
/// cache.put(token.clone());
/// assert_eq!(cache.get(token.as_str()), Some(token));
///
/// cache.stop();
/// # Ok(())
/// # }
/// ```
pub struct Cache {
    shared: Arc<Shared>,
    requests: mpsc::Sender<Sweep>,
    stop: Option<oneshot::Sender<()>>,
}

impl Cache {
    /// Create a cache and spawn its sweep task on the current runtime
    pub fn new(config: CacheConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let (requests, queue) = mpsc::channel(config.queue_capacity.max(1));
        let (stop, stopped) = oneshot::channel();

        let shared = Arc::new(Shared {
            entries: Mutex::new(HashMap::new()),
            config,
        });
        runtime.spawn(sweeper::run(shared.clone(), queue, stopped));

        Ok(Self {
            shared,
            requests,
            stop: Some(stop),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Number of entries, including ones a sweep has yet to evict
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a token if it is valid under the cache leeway
    ///
    /// Returns whether the token was stored. Pushing the population above
    /// `max_size` queues an accelerated sweep.
    pub fn put(&self, token: Token) -> bool {
        let config = &self.shared.config;
        if !token.is_valid(config.leeway) {
            trace!("not caching invalid token");
            return false;
        }

        let population = {
            let mut entries = self.shared.lock();
            entries.insert(
                token.as_str().to_string(),
                Entry {
                    token,
                    last_access: Instant::now(),
                },
            );
            entries.len()
        };

        if population > config.max_size {
            let ttl = sweeper::accelerated_ttl(config.ttl, config.max_size, population);
            self.request(Sweep::Accelerated(ttl));
        }
        true
    }

    /// Look up a token by its text
    ///
    /// A hit refreshes the entry's access time. An entry that is no longer
    /// valid, or idle for longer than the ttl, is removed and reported as a
    /// miss.
    pub fn get(&self, text: &str) -> Option<Token> {
        let config = &self.shared.config;
        let now = Instant::now();

        let mut entries = self.shared.lock();
        let entry = entries.get_mut(text)?;

        if now.saturating_duration_since(entry.last_access) <= config.ttl
            && entry.token.is_valid(config.leeway)
        {
            entry.last_access = now;
            return Some(entry.token.clone());
        }

        entries.remove(text);
        debug!("evicted stale token on lookup");
        None
    }

    /// Queue an immediate sweep with the configured ttl
    pub fn cleanup(&self) {
        self.request(Sweep::Full);
    }

    /// Stop the sweep task and release all entries
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn request(&self, sweep: Sweep) {
        match self.requests.try_send(sweep) {
            Ok(()) => {}
            Err(TrySendError::Full(sweep)) => {
                debug!(?sweep, "cache sweep queue full, dropping request");
            }
            Err(TrySendError::Closed(_)) => {
                trace!("cache sweeper gone");
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
            self.shared.lock().clear();
        }
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.shared.config)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::claims::Claims;
    use crate::keys::Key;
    use chrono::{TimeDelta, Utc};
    use std::time::Duration;

    fn token(subject: &str) -> Token {
        let mut claims = Claims::new();
        claims.set_subject(subject);
        Token::encode(claims, &Key::secret("secret"), Algorithm::HS256).unwrap()
    }

    fn expired_token() -> Token {
        let mut claims = Claims::new();
        claims.set_expiration(Utc::now() - TimeDelta::hours(2));
        Token::encode(claims, &Key::secret("secret"), Algorithm::HS256).unwrap()
    }

    #[test]
    fn test_new_outside_runtime() {
        assert!(matches!(
            Cache::new(CacheConfig::default()),
            Err(Error::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = Cache::new(CacheConfig::default()).unwrap();
        let token = token("a");
        assert!(cache.put(token.clone()));
        assert_eq!(cache.get(token.as_str()), Some(token));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_token_not_stored() {
        let cache = Cache::new(CacheConfig::default()).unwrap();
        assert!(!cache.put(expired_token()));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_text_is_miss() {
        let cache = Cache::new(CacheConfig::default()).unwrap();
        assert_eq!(cache.get("a.b.c"), None);
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_entries() {
        let cache = Cache::new(CacheConfig::default().ttl(Duration::ZERO)).unwrap();
        cache.put(token("a"));
        tokio::time::sleep(Duration::from_millis(5)).await;

        sweeper::sweep(&cache.shared, Duration::ZERO, "test");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_enforces_max_size() {
        let cache = Cache::new(CacheConfig::default().max_size(2)).unwrap();
        for subject in ["a", "b", "c", "d"] {
            cache.put(token(subject));
        }

        sweeper::sweep(&cache.shared, cache.config().ttl, "test");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let cache = Cache::new(CacheConfig::default()).unwrap();
        let token = token("a");
        cache.put(token.clone());
        cache.put(token.clone());
        assert_eq!(cache.len(), 1);
    }
}
