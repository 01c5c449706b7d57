//! Access token lifecycle.
//!
//! A [`CredentialCache`] sits between the API client and whatever produces
//! tokens (a [`TokenSource`]). Depending on the [`CachePolicy`] it either
//! fetches a fresh token for every request or keeps one token for the whole
//! process and replaces it once it expires. Time is read through a [`Clock`]
//! so expiry can be exercised without waiting.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::AuthError;

/// Default margin subtracted from a token's expiry before it is considered stale.
pub const DEFAULT_EXPIRY_SKEW_SECS: i64 = 60;

/// A bearer token together with the instant it stops being accepted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(secret: String, expires_at: Option<DateTime<Utc>>) -> AccessToken {
        AccessToken { secret, expires_at }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A token without a known expiry never expires on its own.
    pub fn is_expired(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now + skew >= expires_at,
            None => false,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Anything able to produce a fresh access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken, AuthError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// How long an access token is kept around once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Every request authenticates again.
    PerCall,
    /// The first token is reused by every request of this process until it expires.
    #[default]
    Process,
}

pub struct CredentialCache {
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    skew: Duration,
    cached: Mutex<Option<AccessToken>>,
}

impl CredentialCache {
    pub fn new(source: Arc<dyn TokenSource>, policy: CachePolicy) -> CredentialCache {
        CredentialCache {
            source,
            clock: Arc::new(SystemClock),
            policy,
            skew: Duration::seconds(DEFAULT_EXPIRY_SKEW_SECS),
            cached: Mutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns a usable token, fetching one when the policy or the cache state requires it.
    ///
    /// The cache lock is held while fetching, so concurrent callers that find
    /// the cache empty wait for a single token exchange instead of each
    /// starting their own.
    pub async fn token(&self) -> Result<AccessToken, AuthError> {
        if self.policy == CachePolicy::PerCall {
            return self.source.fetch_token().await;
        }

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired(self.clock.now(), self.skew) {
                debug!("Reusing cached access token");
                return Ok(token.clone());
            }
            debug!("Cached access token expired at {:?}, fetching a new one", token.expires_at());
        }

        let token = self.source.fetch_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Fetches a new token regardless of what is cached.
    pub async fn refresh(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;
        let token = self.source.fetch_token().await?;
        if self.policy == CachePolicy::Process {
            *cached = Some(token.clone());
        }
        Ok(token)
    }

    /// Drops the cached token so the next call to [`CredentialCache::token`] fetches.
    pub async fn invalidate(&self) {
        debug!("Invalidating cached access token");
        *self.cached.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    struct CountingSource {
        calls: AtomicUsize,
        lifetime: Duration,
        clock: Arc<ManualClock>,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<AccessToken, AuthError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessToken::new(
                format!("token-{}", call),
                Some(self.clock.now() + self.lifetime),
            ))
        }
    }

    struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn setup(policy: CachePolicy) -> (Arc<CountingSource>, Arc<ManualClock>, CredentialCache) {
        let clock = Arc::new(ManualClock {
            now: StdMutex::new(Utc::now()),
        });
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            lifetime: Duration::seconds(3600),
            clock: clock.clone(),
        });
        let cache = CredentialCache::new(source.clone(), policy).with_clock(clock.clone());
        (source, clock, cache)
    }

    #[tokio::test]
    async fn process_policy_reuses_token_until_expiry() {
        let (source, clock, cache) = setup(CachePolicy::Process);

        assert_eq!(cache.token().await.unwrap().secret(), "token-1");
        clock.advance(Duration::seconds(3000));
        assert_eq!(cache.token().await.unwrap().secret(), "token-1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // inside the skew window the token counts as expired
        clock.advance(Duration::seconds(560));
        assert_eq!(cache.token().await.unwrap().secret(), "token-2");
        assert_eq!(cache.token().await.unwrap().secret(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn per_call_policy_always_fetches() {
        let (source, _clock, cache) = setup(CachePolicy::PerCall);

        cache.token().await.unwrap();
        cache.token().await.unwrap();
        let third = cache.token().await.unwrap();

        assert_eq!(third.secret(), "token-3");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wider_skew_replaces_token_earlier() {
        let (source, clock, cache) = setup(CachePolicy::Process);
        let cache = cache.with_skew(Duration::seconds(900));
        assert_eq!(cache.policy(), CachePolicy::Process);

        assert_eq!(cache.token().await.unwrap().secret(), "token-1");
        clock.advance(Duration::seconds(2600));
        assert_eq!(cache.token().await.unwrap().secret(), "token-1");
        clock.advance(Duration::seconds(100));
        assert_eq!(cache.token().await.unwrap().secret(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_replaces_cached_token() {
        let (source, _clock, cache) = setup(CachePolicy::Process);

        cache.token().await.unwrap();
        let refreshed = cache.refresh().await.unwrap();
        assert_eq!(refreshed.secret(), "token-2");
        assert_eq!(cache.token().await.unwrap().secret(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_next_fetch() {
        let (source, _clock, cache) = setup(CachePolicy::Process);

        cache.token().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.token().await.unwrap().secret(), "token-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let (source, _clock, cache) = setup(CachePolicy::Process);

        let tokens = futures::future::try_join_all((0..8).map(|_| cache.token()))
            .await
            .unwrap();

        assert!(tokens.iter().all(|t| t.secret() == "token-1"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = AccessToken::new("abc".to_string(), None);
        assert!(!token.is_expired(Utc::now(), Duration::seconds(60)));
    }

    #[test]
    fn debug_output_hides_secret() {
        let token = AccessToken::new("very-secret".to_string(), None);
        let printed = format!("{:?}", token);
        assert!(!printed.contains("very-secret"));
    }
}
