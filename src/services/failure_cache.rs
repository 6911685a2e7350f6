use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::external::price_provider::PriceProviderError;

/// A remembered price lookup failure
#[derive(Debug, Clone)]
pub struct FailureInfo {
    pub failed_at: DateTime<Utc>,
    pub error_type: FailureType,
}

impl FailureInfo {
    pub fn retry_after(&self) -> DateTime<Utc> {
        self.failed_at + Duration::hours(self.error_type.ttl_hours())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    NotFound,    // unknown symbol
    RateLimited, // temporary
}

impl FailureType {
    pub fn ttl_hours(&self) -> i64 {
        match self {
            FailureType::NotFound => 24,
            FailureType::RateLimited => 1,
        }
    }

    /// Provider errors worth remembering across requests. Network, response
    /// and parse errors are retried on the next request.
    pub fn from_error(err: &PriceProviderError) -> Option<Self> {
        match err {
            PriceProviderError::NotFound => Some(FailureType::NotFound),
            PriceProviderError::RateLimited => Some(FailureType::RateLimited),
            _ => None,
        }
    }
}

/// Upper bound on remembered tickers
const MAX_ENTRIES: usize = 10_000;

/// Tickers whose price lookups recently failed, so the source is not hammered.
#[derive(Clone, Default)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailureInfo>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the failure for `ticker` if it is still within its TTL.
    pub fn is_failed(&self, ticker: &str) -> Option<FailureInfo> {
        self.check_at(ticker, Utc::now())
    }

    fn check_at(&self, ticker: &str, now: DateTime<Utc>) -> Option<FailureInfo> {
        let info = self.cache.get(ticker)?.value().clone();
        if now < info.retry_after() {
            Some(info)
        } else {
            self.cache.remove(ticker);
            None
        }
    }

    pub fn record_failure(&self, ticker: &str, error_type: FailureType) {
        self.record_at(ticker, error_type, Utc::now());
    }

    fn record_at(&self, ticker: &str, error_type: FailureType, failed_at: DateTime<Utc>) {
        self.prune_at(failed_at);
        if self.cache.len() >= MAX_ENTRIES && !self.cache.contains_key(ticker) {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.value().failed_at)
                .map(|entry| entry.key().clone());
            if let Some(oldest) = oldest {
                self.cache.remove(&oldest);
            }
        }
        self.cache.insert(
            ticker.to_string(),
            FailureInfo {
                failed_at,
                error_type,
            },
        );
    }

    pub fn clear(&self, ticker: &str) {
        self.cache.remove(ticker);
    }

    /// Drops every entry whose TTL has passed.
    fn prune_at(&self, now: DateTime<Utc>) {
        self.cache.retain(|_, info| now < info.retry_after());
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_records_and_retrieves_failures() {
        let cache = FailureCache::new();

        cache.record_failure("INVALID", FailureType::NotFound);

        let result = cache.is_failed("INVALID");
        assert!(result.is_some());
        assert_eq!(result.unwrap().error_type, FailureType::NotFound);
    }

    #[test]
    fn test_cache_clears_ticker() {
        let cache = FailureCache::new();

        cache.record_failure("TEST", FailureType::RateLimited);
        assert!(cache.is_failed("TEST").is_some());

        cache.clear("TEST");
        assert!(cache.is_failed("TEST").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_failure_is_dropped() {
        let cache = FailureCache::new();
        let two_hours_ago = Utc::now() - Duration::hours(2);

        cache.record_at("RL", FailureType::RateLimited, two_hours_ago);
        cache.record_at("NF", FailureType::NotFound, two_hours_ago);

        assert!(cache.is_failed("RL").is_none());
        assert!(cache.is_failed("NF").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prune_expired() {
        let cache = FailureCache::new();
        cache.insert_raw("OLD", FailureType::RateLimited, Utc::now() - Duration::hours(2));
        cache.insert_raw("NEW", FailureType::NotFound, Utc::now());

        cache.prune_at(Utc::now());
        assert_eq!(cache.len(), 1);
        assert!(cache.is_failed("NEW").is_some());
    }

    #[test]
    fn test_recording_prunes_expired_entries() {
        let cache = FailureCache::new();
        let yesterday = Utc::now() - Duration::hours(25);
        for n in 0..100 {
            cache.insert_raw(&format!("FAKE{}", n), FailureType::NotFound, yesterday);
        }
        assert_eq!(cache.len(), 100);

        cache.record_failure("LIVE", FailureType::NotFound);
        assert_eq!(cache.len(), 1);
        assert!(cache.is_failed("LIVE").is_some());
    }

    #[test]
    fn test_cache_is_bounded() {
        let cache = FailureCache::new();
        let start = Utc::now() - Duration::minutes(30);
        for n in 0..MAX_ENTRIES {
            cache.insert_raw(
                &format!("T{}", n),
                FailureType::NotFound,
                start + Duration::milliseconds(n as i64),
            );
        }

        cache.record_failure("NEWEST", FailureType::NotFound);
        assert_eq!(cache.len(), MAX_ENTRIES);
        assert!(cache.is_failed("T0").is_none());
        assert!(cache.is_failed("T1").is_some());
        assert!(cache.is_failed("NEWEST").is_some());
    }

    #[test]
    fn test_failure_type_from_provider_error() {
        assert_eq!(
            FailureType::from_error(&PriceProviderError::NotFound),
            Some(FailureType::NotFound)
        );
        assert_eq!(
            FailureType::from_error(&PriceProviderError::RateLimited),
            Some(FailureType::RateLimited)
        );
        assert_eq!(
            FailureType::from_error(&PriceProviderError::Network("timeout".to_string())),
            None
        );
    }

    impl FailureCache {
        fn insert_raw(&self, ticker: &str, error_type: FailureType, failed_at: DateTime<Utc>) {
            self.cache.insert(
                ticker.to_string(),
                FailureInfo {
                    failed_at,
                    error_type,
                },
            );
        }
    }
}
