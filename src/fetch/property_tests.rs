//! Property-Based Tests for the fetch cache
//!
//! Drives a fetcher with a hand-moved clock and compares operation calls
//! against a simple model of the freshness window.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::ManualClock;
use crate::error::AppError;
use crate::fetch::{ApiEnvelope, FetchCache, FetchOptions, RequestState};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of execute calls at increasing times, the operation runs
    // exactly when no entry younger than the window exists, and the published
    // data always comes from the most recent real call.
    #[test]
    fn prop_operation_runs_only_when_stale(
        ttl in 1u64..5_000,
        gaps in prop::collection::vec(0u64..6_000, 1..40)
    ) {
        tokio_test::block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = calls.clone();
            let op = move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok::<_, AppError>(ApiEnvelope::ok(n)) }
            };
            let clock = ManualClock::new(0);
            let options = FetchOptions::new().cache_key("ward-list").cache_time_ms(ttl);
            let mut fetcher = FetchCache::new(op, options).with_clock(Arc::new(clock.clone()));

            let mut stored_at: Option<u64> = None;
            let mut expected_calls = 0usize;
            let mut now = 0u64;

            for gap in gaps {
                now += gap;
                clock.set(now);

                let stale = stored_at.map_or(true, |t| now - t >= ttl);
                if stale {
                    expected_calls += 1;
                    stored_at = Some(now);
                }

                prop_assert_eq!(fetcher.execute().await, RequestState::Success);
                prop_assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
                prop_assert_eq!(fetcher.data(), Some(&expected_calls));
                prop_assert_eq!(fetcher.last_fetched(), stored_at);
            }
            Ok(())
        })?;
    }

    // *For any* mix of successes and failures, a failure never replaces the
    // published data and always leaves a non-empty message.
    #[test]
    fn prop_failures_preserve_data(outcomes in prop::collection::vec(any::<bool>(), 1..30)) {
        tokio_test::block_on(async {
            let script = Arc::new(outcomes.clone());
            let cursor = Arc::new(AtomicUsize::new(0));
            let (s, c) = (script.clone(), cursor.clone());
            let op = move || {
                let i = c.fetch_add(1, Ordering::SeqCst);
                let ok = s[i];
                async move {
                    if ok {
                        Ok(ApiEnvelope::ok(i))
                    } else {
                        Err(AppError::Network("unreachable".to_string()))
                    }
                }
            };
            let mut fetcher = FetchCache::new(op, FetchOptions::new());

            let mut last_ok: Option<usize> = None;
            for (i, ok) in outcomes.iter().enumerate() {
                let state = fetcher.execute().await;
                if *ok {
                    last_ok = Some(i);
                    prop_assert_eq!(state, RequestState::Success);
                    prop_assert!(fetcher.error().is_none());
                } else {
                    prop_assert_eq!(state, RequestState::Error);
                    prop_assert!(!fetcher.error().unwrap_or_default().is_empty());
                }
                prop_assert_eq!(fetcher.data().copied(), last_ok);
            }
            Ok(())
        })?;
    }
}
