//! Pending writes that commit after a quiet period
//!
//! Nothing here runs on its own; the owner polls [`Debouncer::due`] with the
//! current time, the same way timers are polled in an event loop.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<V> {
    value: V,
    deadline: Instant,
    /// Order of the most recent schedule call for this key
    seq: u64,
}

/// Keyed last-write-wins debouncer
#[derive(Debug)]
pub struct Debouncer<K, V> {
    window: Duration,
    pending: HashMap<K, Pending<V>>,
    next_seq: u64,
}

impl<K, V> Debouncer<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule a write, replacing any pending one for the key and re-arming its deadline
    pub fn schedule(&mut self, key: K, value: V, now: Instant) {
        self.schedule_merge(key, value, now, |_, latest| latest);
    }

    /// Schedule a write, folding it into the pending value with `merge(pending, latest)`
    pub fn schedule_merge<F>(&mut self, key: K, value: V, now: Instant, merge: F)
    where
        F: FnOnce(V, V) -> V,
    {
        let value = match self.pending.remove(&key) {
            Some(previous) => merge(previous.value, value),
            None => value,
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(
            key,
            Pending {
                value,
                deadline: now + self.window,
                seq,
            },
        );
    }

    /// Drop a pending write without committing it
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|p| p.value)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn peek(&self, key: &K) -> Option<&V> {
        self.pending.get(key).map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending writes
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Take every write whose deadline has passed, in scheduling order
    pub fn due(&mut self, now: Instant) -> Vec<(K, V)> {
        let ready: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, _)| k.clone())
            .collect();
        self.take_ordered(ready)
    }

    /// Take every pending write, in scheduling order
    pub fn flush(&mut self) -> Vec<(K, V)> {
        let all: Vec<K> = self.pending.keys().cloned().collect();
        self.take_ordered(all)
    }

    fn take_ordered(&mut self, keys: Vec<K>) -> Vec<(K, V)> {
        let mut taken: Vec<(u64, K, V)> = keys
            .into_iter()
            .filter_map(|key| {
                self.pending
                    .remove(&key)
                    .map(|p| (p.seq, key, p.value))
            })
            .collect();
        taken.sort_by_key(|(seq, _, _)| *seq);
        taken.into_iter().map(|(_, k, v)| (k, v)).collect()
    }
}
