//! Cached access token with single-flight acquisition and refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use parking_lot::RwLock;

use super::{AccessToken, GrantType, TokenEndpoint, UaaCredentials};
use crate::Result;

/// Lifecycle state of the cached token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No token has been acquired yet, or it was invalidated.
    Unset,
    /// A token is cached and not expired.
    Valid,
    /// A token is cached but expired (or within the expiry margin).
    Expired,
}

/// Owns the access token of one UAA connection.
///
/// Every outgoing request calls [`token`](TokenManager::token). The fast path
/// reads the cached token under a read lock. When there is no token or it
/// has expired, callers serialize on an async mutex; the first one acquires
/// or refreshes, and the rest receive that renewal's token when they get the
/// mutex, even if the server granted a lifetime shorter than the expiry
/// margin. One expiry event therefore causes one token endpoint call no
/// matter how many requests are in flight.
///
/// Renewal order:
/// 1. refresh with the cached refresh token, if the grant supports it
/// 2. full acquisition with the grant selected from the credentials
///
/// A failed refresh falls back to step 2. A failed acquisition is returned
/// to the caller and leaves the cache as it was; the next call tries again.
pub struct TokenManager {
    credentials: UaaCredentials,
    endpoint: Arc<dyn TokenEndpoint>,
    expiry_margin: TimeDelta,
    current: RwLock<Option<Arc<AccessToken>>>,
    /// Bumped after every completed renewal.
    renewals: AtomicU64,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl TokenManager {
    /// Creates a manager with no cached token.
    pub fn new(
        credentials: UaaCredentials,
        endpoint: Arc<dyn TokenEndpoint>,
        expiry_margin: Duration,
    ) -> Self {
        Self {
            credentials,
            endpoint,
            expiry_margin: TimeDelta::from_std(expiry_margin).unwrap_or(TimeDelta::MAX),
            current: RwLock::new(None),
            renewals: AtomicU64::new(0),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the credentials this manager authenticates with.
    pub fn credentials(&self) -> &UaaCredentials {
        &self.credentials
    }

    /// Returns the grant that the next acquisition would use.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCredentials`](crate::ErrorKind::InvalidCredentials)
    /// if the client id is blank.
    pub fn grant_type(&self) -> Result<GrantType> {
        GrantType::select(&self.credentials)
    }

    /// Returns a valid token, acquiring or refreshing it if needed.
    pub async fn token(&self) -> Result<Arc<AccessToken>> {
        let seen = self.renewals.load(Ordering::Acquire);
        if let Some(token) = self.valid_cached() {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller renewed the token while we waited.
        if self.renewals.load(Ordering::Acquire) != seen
            && let Some(token) = self.cached()
        {
            return Ok(token);
        }
        if let Some(token) = self.valid_cached() {
            return Ok(token);
        }

        let stale = self.current.read().clone();
        let token = Arc::new(self.renew(stale.as_deref()).await?);
        *self.current.write() = Some(Arc::clone(&token));
        self.renewals.fetch_add(1, Ordering::Release);

        Ok(token)
    }

    /// Drops the cached token so the next [`token`](TokenManager::token) call
    /// acquires a new one.
    ///
    /// Use this after the server rejected a token the client considered
    /// valid (HTTP 401).
    pub fn invalidate(&self) {
        if self.current.write().take().is_some() {
            tracing::debug!("cached access token invalidated");
        }
    }

    /// Returns the cached token without checking its expiry.
    pub fn cached(&self) -> Option<Arc<AccessToken>> {
        self.current.read().clone()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> TokenState {
        match self.current.read().as_deref() {
            None => TokenState::Unset,
            Some(token) if token.is_expired_at(Utc::now(), self.expiry_margin) => TokenState::Expired,
            Some(_) => TokenState::Valid,
        }
    }

    fn valid_cached(&self) -> Option<Arc<AccessToken>> {
        let current = self.current.read();
        current
            .as_ref()
            .filter(|token| !token.is_expired_at(Utc::now(), self.expiry_margin))
            .cloned()
    }

    async fn renew(&self, stale: Option<&AccessToken>) -> Result<AccessToken> {
        let grant = GrantType::select(&self.credentials)?;

        if let Some(refresh_token) = stale.and_then(AccessToken::refresh_token) {
            if grant.supports_refresh() {
                match self.endpoint.refresh(&self.credentials, refresh_token).await {
                    Ok(token) => {
                        tracing::debug!(grant_type = %grant, "access token refreshed");
                        return Ok(token);
                    },
                    Err(err) => {
                        tracing::warn!(
                            grant_type = %grant,
                            error = %err,
                            "token refresh failed, re-acquiring"
                        );
                    },
                }
            }
        }

        let token = self.endpoint.acquire(grant, &self.credentials).await?;
        tracing::debug!(grant_type = %grant, expires_at = %token.expires_at(), "access token acquired");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("expiry_margin", &self.expiry_margin)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::DateTime;

    use super::*;
    use crate::auth::TokenFuture;
    use crate::{Error, ErrorKind};

    /// Counts calls; the first issued token is already expired.
    #[derive(Default)]
    struct CountingEndpoint {
        acquisitions: AtomicUsize,
        refreshes: AtomicUsize,
        with_refresh_token: bool,
        fail_refresh: bool,
        fail_acquire: bool,
    }

    impl CountingEndpoint {
        fn issue(&self, n: usize) -> AccessToken {
            let expires_at = if n == 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                Utc::now() + TimeDelta::hours(1)
            };
            let token = AccessToken::new(format!("token-{}", n), "bearer", expires_at);
            if self.with_refresh_token { token.with_refresh_token(format!("refresh-{}", n)) } else { token }
        }

        fn total(&self) -> usize {
            self.acquisitions.load(Ordering::SeqCst) + self.refreshes.load(Ordering::SeqCst)
        }
    }

    impl TokenEndpoint for CountingEndpoint {
        fn acquire<'a>(&'a self, grant: GrantType, _: &'a UaaCredentials) -> TokenFuture<'a> {
            Box::pin(async move {
                tokio::task::yield_now().await;
                if self.fail_acquire {
                    return Err(Error::token_acquisition(grant, "rejected"));
                }
                let n = self.total();
                self.acquisitions.fetch_add(1, Ordering::SeqCst);
                Ok(self.issue(n))
            })
        }

        fn refresh<'a>(&'a self, _: &'a UaaCredentials, _: &'a str) -> TokenFuture<'a> {
            Box::pin(async move {
                tokio::task::yield_now().await;
                if self.fail_refresh {
                    return Err(Error::token_acquisition(GrantType::RefreshToken, "expired refresh token"));
                }
                let n = self.total();
                self.refreshes.fetch_add(1, Ordering::SeqCst);
                Ok(self.issue(n))
            })
        }
    }

    fn manager(credentials: UaaCredentials, endpoint: Arc<CountingEndpoint>) -> TokenManager {
        TokenManager::new(credentials, endpoint, Duration::ZERO)
    }

    fn password_creds() -> UaaCredentials {
        UaaCredentials::new("app").with_client_secret("secret").with_user("marissa", "koala")
    }

    #[tokio::test]
    async fn test_unset_acquires_then_caches() {
        let endpoint = Arc::new(CountingEndpoint::default());
        let manager = manager(UaaCredentials::new("c1").with_client_secret("s"), endpoint.clone());

        assert_eq!(manager.state(), TokenState::Unset);
        let _expired = manager.token().await.unwrap();
        assert_eq!(manager.state(), TokenState::Expired);

        let first = manager.token().await.unwrap();
        let second = manager.token().await.unwrap();
        assert_eq!(manager.state(), TokenState::Valid);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_refresh() {
        let endpoint = Arc::new(CountingEndpoint { with_refresh_token: true, ..Default::default() });
        let manager = Arc::new(manager(password_creds(), endpoint.clone()));

        // Seed an already expired token.
        let seeded = manager.token().await.unwrap();
        assert_eq!(seeded.value(), "token-0");
        assert_eq!(manager.state(), TokenState::Expired);

        let calls = (0..50).map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.token().await })
        });
        let results = futures::future::join_all(calls).await;

        let values: Vec<String> = results
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().value().to_string())
            .collect();

        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| v == "token-1"));
        assert_eq!(endpoint.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_used_when_supported() {
        let endpoint = Arc::new(CountingEndpoint { with_refresh_token: true, ..Default::default() });
        let manager = manager(password_creds(), endpoint.clone());

        manager.token().await.unwrap();
        let renewed = manager.token().await.unwrap();

        assert_eq!(renewed.value(), "token-1");
        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 1);
        assert_eq!(endpoint.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_grant_without_refresh_reacquires() {
        let endpoint = Arc::new(CountingEndpoint { with_refresh_token: true, ..Default::default() });
        let manager = manager(UaaCredentials::new("c1").with_client_secret("s"), endpoint.clone());

        manager.token().await.unwrap();
        manager.token().await.unwrap();

        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 2);
        assert_eq!(endpoint.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_reacquires() {
        let endpoint = Arc::new(CountingEndpoint::default());
        let manager = manager(password_creds(), endpoint.clone());

        manager.token().await.unwrap();
        manager.token().await.unwrap();

        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 2);
        assert_eq!(endpoint.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_acquisition() {
        let endpoint = Arc::new(CountingEndpoint {
            with_refresh_token: true,
            fail_refresh: true,
            ..Default::default()
        });
        let manager = manager(password_creds(), endpoint.clone());

        manager.token().await.unwrap();
        let token = manager.token().await.unwrap();

        assert_eq!(token.value(), "token-1");
        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 2);
        assert_eq!(manager.state(), TokenState::Valid);
    }

    #[tokio::test]
    async fn test_acquisition_error_propagates() {
        let endpoint = Arc::new(CountingEndpoint { fail_acquire: true, ..Default::default() });
        let manager = manager(password_creds(), endpoint);

        let err = manager.token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenAcquisition);
        assert_eq!(err.grant_type(), Some(GrantType::Password));
        assert_eq!(manager.state(), TokenState::Unset);
    }

    #[tokio::test]
    async fn test_invalid_credentials_surface_on_first_token() {
        let endpoint = Arc::new(CountingEndpoint::default());
        let manager = manager(UaaCredentials::new(""), endpoint.clone());

        let err = manager.token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(endpoint.total(), 0);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let endpoint = Arc::new(CountingEndpoint::default());
        let manager = manager(UaaCredentials::new("c1").with_client_secret("s"), endpoint.clone());

        manager.token().await.unwrap();
        manager.token().await.unwrap();
        assert_eq!(manager.state(), TokenState::Valid);

        manager.invalidate();
        assert_eq!(manager.state(), TokenState::Unset);
        assert!(manager.cached().is_none());

        let token = manager.token().await.unwrap();
        assert_eq!(token.value(), "token-2");
    }

    #[tokio::test]
    async fn test_expiry_margin_treats_token_as_expired_early() {
        struct ShortLived;

        impl TokenEndpoint for ShortLived {
            fn acquire<'a>(&'a self, _: GrantType, _: &'a UaaCredentials) -> TokenFuture<'a> {
                Box::pin(async {
                    Ok(AccessToken::new("short", "bearer", Utc::now() + TimeDelta::seconds(10)))
                })
            }

            fn refresh<'a>(&'a self, _: &'a UaaCredentials, _: &'a str) -> TokenFuture<'a> {
                Box::pin(async { Err(Error::token_acquisition(GrantType::RefreshToken, "unused")) })
            }
        }

        let creds = UaaCredentials::new("c1").with_client_secret("s");
        let relaxed = TokenManager::new(creds.clone(), Arc::new(ShortLived), Duration::ZERO);
        relaxed.token().await.unwrap();
        assert_eq!(relaxed.state(), TokenState::Valid);

        let strict = TokenManager::new(creds, Arc::new(ShortLived), Duration::from_secs(30));
        strict.token().await.unwrap();
        assert_eq!(strict.state(), TokenState::Expired);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_short_lived_token_is_shared_by_waiting_callers() {
        /// Grants 20 seconds, inside the 30 second margin.
        #[derive(Default)]
        struct ShortLived {
            acquisitions: AtomicUsize,
        }

        impl TokenEndpoint for ShortLived {
            fn acquire<'a>(&'a self, _: GrantType, _: &'a UaaCredentials) -> TokenFuture<'a> {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    let n = self.acquisitions.fetch_add(1, Ordering::SeqCst);
                    Ok(AccessToken::new(format!("short-{}", n), "bearer", Utc::now() + TimeDelta::seconds(20)))
                })
            }

            fn refresh<'a>(&'a self, _: &'a UaaCredentials, _: &'a str) -> TokenFuture<'a> {
                Box::pin(async { Err(Error::token_acquisition(GrantType::RefreshToken, "unused")) })
            }
        }

        let endpoint = Arc::new(ShortLived::default());
        let manager = Arc::new(TokenManager::new(
            UaaCredentials::new("c1").with_client_secret("s"),
            endpoint.clone(),
            Duration::from_secs(30),
        ));

        let calls = (0..50).map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.token().await })
        });
        let values: Vec<String> = futures::future::join_all(calls)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().value().to_string())
            .collect();

        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| v == "short-0"));
        assert_eq!(endpoint.acquisitions.load(Ordering::SeqCst), 1);
        assert_eq!(manager.state(), TokenState::Expired);
    }

    #[test]
    fn test_debug_hides_token() {
        let manager = manager(password_creds(), Arc::new(CountingEndpoint::default()));
        let debug = format!("{:?}", manager);
        assert!(debug.contains("Unset"));
        assert!(!debug.contains("koala"));
    }
}
