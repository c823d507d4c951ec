//! Backend-agnostic usage example for twinmap
//!
//! Picks a backend from `TWINMAP_BACKEND` (default `locked`), then lets several threads race
//! to claim the words of a sentence. `load_or_store` guarantees each word has exactly one
//! owner, whichever backend is in use.
//!
//! ```text
//! TWINMAP_BACKEND=counted RUST_LOG=debug cargo run --example backend_agnostic
//! ```

use std::sync::{Arc, Barrier};
use std::thread;
use twinmap::{ConcurrentMap, MapConfig};

const TEXT: &str = "the quick brown fox jumps over the lazy dog while the fox sleeps";
const WORKERS: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = MapConfig::from_env()?;
    println!("twinmap backend: {}", config.backend);

    let owners: Arc<dyn ConcurrentMap<String, usize>> = Arc::from(config.build::<String, usize>());
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let owners = Arc::clone(&owners);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                TEXT.split_whitespace()
                    .filter(|word| {
                        let (_, loaded) = owners.load_or_store(word.to_string(), worker);
                        !loaded
                    })
                    .count()
            })
        })
        .collect();

    let mut claimed = 0;
    for (worker, handle) in handles.into_iter().enumerate() {
        let won = handle.join().map_err(|_| "worker thread panicked")?;
        println!("worker {worker} claimed {won} words");
        claimed += won;
    }

    let mut words = Vec::new();
    owners.range(&mut |word, owner| {
        words.push((word.clone(), *owner));
        true
    });
    words.sort();

    println!("{} distinct words, {} claims", owners.len(), claimed);
    for (word, owner) in words {
        println!("  {word:<6} -> worker {owner}");
    }

    Ok(())
}
