//! Property-based tests for the map backends using proptest
//!
//! Every backend must agree with a single-threaded `HashMap` model on any sequence of
//! operations, including the reported `len`.

use crate::map::{ConcurrentMap, CountedMap, RwLockMap};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
enum Op {
    Load(u8),
    Store(u8, u32),
    LoadOrStore(u8, u32),
    LoadAndDelete(u8),
    Delete(u8),
}

// A small key space so that operations keep hitting the same keys
fn op_strategy() -> impl Strategy<Value = Op> {
    let key = 0u8..16;
    prop_oneof![
        key.clone().prop_map(Op::Load),
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Store(k, v)),
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::LoadOrStore(k, v)),
        key.clone().prop_map(Op::LoadAndDelete),
        key.prop_map(Op::Delete),
    ]
}

fn check_against_model(
    map: &dyn ConcurrentMap<u8, u32>,
    ops: &[Op],
) -> Result<(), TestCaseError> {
    let mut model: HashMap<u8, u32> = HashMap::new();

    for op in ops {
        match *op {
            Op::Load(k) => {
                prop_assert_eq!(map.load(&k), model.get(&k).copied());
            }
            Op::Store(k, v) => {
                map.store(k, v);
                model.insert(k, v);
            }
            Op::LoadOrStore(k, v) => {
                let expected = match model.get(&k).copied() {
                    Some(existing) => (existing, true),
                    None => {
                        model.insert(k, v);
                        (v, false)
                    }
                };
                prop_assert_eq!(map.load_or_store(k, v), expected);
            }
            Op::LoadAndDelete(k) => {
                prop_assert_eq!(map.load_and_delete(&k), model.remove(&k));
            }
            Op::Delete(k) => {
                map.delete(&k);
                model.remove(&k);
            }
        }
        prop_assert_eq!(map.len(), model.len());
    }

    let mut seen = HashMap::new();
    map.range(&mut |k, v| {
        seen.insert(*k, *v);
        true
    });
    prop_assert_eq!(seen, model);

    Ok(())
}

proptest! {
    #[test]
    fn test_locked_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let map: RwLockMap<u8, u32> = RwLockMap::new();
        check_against_model(&map, &ops)?;
    }

    #[test]
    fn test_counted_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let map: CountedMap<u8, u32> = CountedMap::new();
        check_against_model(&map, &ops)?;
    }

    #[test]
    fn test_range_stop_visits_exactly_limit(
        keys in prop::collection::hash_set(any::<u16>(), 0..100),
        limit in 1usize..120,
    ) {
        let locked: RwLockMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let counted: CountedMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();

        let maps: [&dyn ConcurrentMap<u16, u16>; 2] = [&locked, &counted];
        for map in maps {
            let mut visited = 0;
            map.range(&mut |_, _| {
                visited += 1;
                visited < limit
            });
            prop_assert_eq!(visited, limit.min(keys.len()));
        }
    }

    #[test]
    fn test_concurrent_disjoint_stores_count_exactly(
        per_thread in prop::collection::vec(prop::collection::hash_set(any::<u16>(), 0..50), 1..6)
    ) {
        let locked: Arc<RwLockMap<(usize, u16), u16>> = Arc::new(RwLockMap::new());
        let counted: Arc<CountedMap<(usize, u16), u16>> = Arc::new(CountedMap::new());

        let handles: Vec<_> = per_thread
            .iter()
            .cloned()
            .enumerate()
            .map(|(thread_id, keys)| {
                let locked = Arc::clone(&locked);
                let counted = Arc::clone(&counted);
                thread::spawn(move || {
                    for k in keys {
                        locked.store((thread_id, k), k);
                        counted.store((thread_id, k), k);
                        // Overwrite must not double count
                        counted.store((thread_id, k), k.wrapping_add(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected: usize = per_thread.iter().map(|keys| keys.len()).sum();
        prop_assert_eq!(locked.len(), expected);
        prop_assert_eq!(counted.len(), expected);
    }
}
