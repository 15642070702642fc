//! Property-Based Tests for Cache Module
//!
//! Checks the cache against a plain `HashMap` model under random operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::TtlCache;

// == Test Configuration ==
/// Long enough that nothing expires while a case runs
const LONG_TIMEOUT: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Invalidate { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // While nothing is stale, the cache behaves exactly like a map.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = TtlCache::new(LONG_TIMEOUT);
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key).copied());
                }
                CacheOp::Invalidate { key } => {
                    cache.invalidate(&key);
                    model.remove(&key);
                }
                CacheOp::Clear => {
                    cache.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    // Hits and misses add up to the number of lookups performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = TtlCache::new(LONG_TIMEOUT);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { key } => cache.invalidate(&key),
                CacheOp::Clear => cache.clear(),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.expirations, 0);
        prop_assert_eq!(stats.total_entries, cache.len());
    }

    // With a zero timeout every written key reads back as absent and is reclaimed.
    #[test]
    fn prop_zero_timeout_never_serves(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..30)
    ) {
        let mut cache = TtlCache::new(Duration::ZERO);

        for (key, value) in &entries {
            cache.set(key.clone(), *value);
        }
        for (key, _) in &entries {
            prop_assert_eq!(cache.get(key), None);
            prop_assert!(!cache.contains_key(key));
        }
        prop_assert!(cache.is_empty());
    }

    // Invalidating a key hides it regardless of freshness and leaves other keys alone.
    #[test]
    fn prop_invalidate_is_targeted(
        key in key_strategy(),
        other in key_strategy(),
        value in value_strategy()
    ) {
        prop_assume!(key != other);
        let mut cache = TtlCache::new(LONG_TIMEOUT);

        cache.set(key.clone(), value);
        cache.set(other.clone(), value);
        cache.invalidate(&key);

        prop_assert_eq!(cache.get(&key), None);
        prop_assert_eq!(cache.get(&other), Some(value));
    }
}
