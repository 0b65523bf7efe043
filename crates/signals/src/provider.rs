//! Adjustment context providers.
//!
//! Providers stand in for the external feeds (pace, injury reports,
//! standings). They are fallible; the cached wrapper resolves a provider at
//! most once per freshness window and falls back to an empty context so a
//! failing feed only zeroes the affected adjustments.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use totals_core::{AdjustmentContext, ContextConfig};

use crate::cache::{Clock, SystemClock, TtlCache};

/// A source of adjustment context.
pub trait ContextProvider: Send + Sync {
    /// Fetches the current context.
    ///
    /// # Errors
    /// Returns an error if the underlying source cannot be read.
    fn fetch(&self) -> Result<AdjustmentContext>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Provider returning a fixed context.
#[derive(Debug, Clone, Default)]
pub struct StaticContextProvider {
    context: AdjustmentContext,
}

impl StaticContextProvider {
    #[must_use]
    pub fn new(context: AdjustmentContext) -> Self {
        Self { context }
    }

    /// Provider with no data; every adjustment degrades to zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ContextProvider for StaticContextProvider {
    fn fetch(&self) -> Result<AdjustmentContext> {
        Ok(self.context.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Wraps a provider with a TTL cache.
pub struct CachedContextProvider<P> {
    inner: P,
    cache: TtlCache<(), AdjustmentContext>,
}

impl<P: ContextProvider> CachedContextProvider<P> {
    #[must_use]
    pub fn new(inner: P, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// Builds the wrapper from configuration with the wall clock.
    #[must_use]
    pub fn from_config(inner: P, config: &ContextConfig) -> Self {
        let ttl = Duration::seconds(i64::try_from(config.ttl_secs).unwrap_or(i64::MAX / 1000));
        Self::new(inner, ttl, Arc::new(SystemClock))
    }

    /// Returns the cached context, fetching it if stale.
    ///
    /// A failed fetch is logged and cached as an empty context so the same
    /// window does not retry it.
    pub fn resolve(&mut self) -> AdjustmentContext {
        if let Some(ctx) = self.cache.get(&()) {
            return ctx;
        }

        let ctx = match self.inner.fetch() {
            Ok(ctx) => {
                info!(
                    provider = self.inner.name(),
                    pace = ctx.pace.is_some(),
                    injuries = ctx.injuries.is_some(),
                    records = ctx.records.is_some(),
                    "adjustment context loaded"
                );
                ctx
            }
            Err(e) => {
                warn!(
                    provider = self.inner.name(),
                    error = %e,
                    "context unavailable, using empty context"
                );
                AdjustmentContext::empty()
            }
        };
        self.cache.insert((), ctx.clone());
        ctx
    }

    /// Forces the next `resolve` to fetch again.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl ContextProvider for CountingProvider {
        fn fetch(&self) -> Result<AdjustmentContext> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("feed offline");
            }
            Ok(AdjustmentContext::empty()
                .with_pace(HashMap::from([("A".to_string(), 102.0)])))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn provider(fail: bool) -> CountingProvider {
        CountingProvider {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn resolves_once_within_ttl() {
        let clock = clock();
        let mut cached = CachedContextProvider::new(
            provider(false),
            Duration::hours(1),
            Arc::new(clock.clone()),
        );
        for _ in 0..10 {
            assert!(cached.resolve().pace.is_some());
        }
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::hours(2));
        cached.resolve();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failure_falls_back_to_empty_and_is_not_retried() {
        let mut cached =
            CachedContextProvider::new(provider(true), Duration::hours(1), Arc::new(clock()));
        assert!(cached.resolve().is_empty());
        assert!(cached.resolve().is_empty());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let mut cached =
            CachedContextProvider::new(provider(false), Duration::hours(1), Arc::new(clock()));
        cached.resolve();
        cached.invalidate();
        cached.resolve();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_provider_returns_its_context() {
        let ctx = AdjustmentContext::empty().with_records(HashMap::new());
        assert_eq!(StaticContextProvider::new(ctx.clone()).fetch().unwrap(), ctx);
        assert!(StaticContextProvider::empty().fetch().unwrap().is_empty());
    }
}
