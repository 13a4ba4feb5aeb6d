//! Concurrency tests for snapshot swaps and stored reinforcement

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use mnemo_decay::storage::{InMemoryStore, RecordStore};
use mnemo_decay::{DecayEngine, DecayPolicy, MemoryCategory, PolicyTable, Thresholds};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 4, 16, 0, 0).unwrap()
}

fn uniform_table(decay_rate: f64) -> PolicyTable {
    let policy = DecayPolicy::new(decay_rate, 0.9);
    MemoryCategory::ALL
        .into_iter()
        .fold(PolicyTable::default(), |table, category| {
            table.with_policy(category, policy)
        })
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn test_readers_never_see_a_mixed_policy_table() {
        let engine = Arc::new(
            DecayEngine::with_tables(uniform_table(0.1), Thresholds::default()).unwrap(),
        );

        thread::scope(|scope| {
            let writer = Arc::clone(&engine);
            scope.spawn(move || {
                for i in 0..500 {
                    let rate = if i % 2 == 0 { 0.2 } else { 0.1 };
                    writer.update_policy_table(uniform_table(rate)).unwrap();
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&engine);
                scope.spawn(move || {
                    for _ in 0..500 {
                        let table = reader.policy_table();
                        let rates: Vec<f64> = MemoryCategory::ALL
                            .into_iter()
                            .map(|c| table.policy(c).decay_rate)
                            .collect();
                        assert!(rates.iter().all(|r| *r == rates[0]), "mixed table: {rates:?}");
                    }
                });
            }
        });
    }

    #[test]
    fn test_concurrent_reads_are_consistent() {
        let engine = Arc::new(DecayEngine::new());
        let memory = engine.create(MemoryCategory::Goal, "Finish thesis", base_time());
        let at = base_time() + chrono::Duration::hours(7);
        let expected = engine.assess(&memory, at).unwrap();

        thread::scope(|scope| {
            for _ in 0..8 {
                let engine = Arc::clone(&engine);
                let memory = memory.clone();
                scope.spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(engine.assess(&memory, at).unwrap(), expected);
                    }
                });
            }
        });
    }
}

mod store_tests {
    use super::*;
    use mnemo_decay::DecayError;

    #[test]
    fn test_concurrent_reinforcement_counts_every_event() {
        let engine = Arc::new(DecayEngine::new());
        let memory = engine.create(MemoryCategory::Preference, "Window seat", base_time());
        let id = memory.id();
        let store = Arc::new(InMemoryStore::from_records([memory]));

        const THREADS: usize = 4;
        const EVENTS_PER_THREAD: usize = 25;

        let successes: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let engine = Arc::clone(&engine);
                    let store = Arc::clone(&store);
                    scope.spawn(move || {
                        let mut ok = 0;
                        for _ in 0..EVENTS_PER_THREAD {
                            match engine.reinforce_stored(store.as_ref(), id, base_time()) {
                                Ok(_) => ok += 1,
                                Err(DecayError::Conflict { .. }) => {}
                                Err(e) => panic!("unexpected error: {e}"),
                            }
                        }
                        ok
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        let stored = store.get(id).unwrap();
        assert_eq!(stored.value.reinforcement_count() as usize, successes);
        assert_eq!(stored.version as usize, successes + 1);
    }
}
