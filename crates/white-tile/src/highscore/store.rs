//! Remote highscore persistence.
//!
//! Calls are fire-and-forget: results come back through the boxed completion,
//! which a real backend invokes later from its own event loop. The in-memory
//! store answers synchronously.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed store response: {0}")]
    Malformed(String),
}

/// Completion of a conditional write: `Ok(true)` when the value was committed.
pub type WriteDone = Box<dyn FnOnce(Result<bool, StoreError>)>;
/// Completion of a single read.
pub type ReadDone = Box<dyn FnOnce(Result<Option<u32>, StoreError>)>;
/// Live leaderboard listener.
pub type TopListener = Box<dyn FnMut(&[HighscoreEntry])>;

pub trait ScoreStore {
    /// Store `value` under `key` unless a higher value is already stored.
    fn write_if_greater_or_equal(&self, key: &str, value: u32, done: WriteDone);

    fn read_once(&self, key: &str, done: ReadDone);

    /// Ordering key for leaderboard queries; lower ranks first.
    fn set_rank(&self, key: &str, rank: i64);

    /// Call `listener` with the top `n` entries now and after every change.
    fn subscribe_top_n(&self, n: usize, listener: TopListener);
}

#[derive(Debug, Clone, Copy)]
struct Record {
    score: u32,
    rank: Option<i64>,
}

/// Single-process [`ScoreStore`] for tests and offline play.
#[derive(Default)]
pub struct MemoryScoreStore {
    records: RefCell<BTreeMap<String, Record>>,
    listeners: RefCell<Vec<(usize, TopListener)>>,
    offline: Cell<bool>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn score(&self, key: &str) -> Option<u32> {
        self.records.borrow().get(key).map(|r| r.score)
    }

    pub fn rank(&self, key: &str) -> Option<i64> {
        self.records.borrow().get(key).and_then(|r| r.rank)
    }

    /// Entries ordered by rank, unranked entries last, ties by name.
    pub fn top(&self, n: usize) -> Vec<HighscoreEntry> {
        let records = self.records.borrow();
        let mut ordered: Vec<(&String, &Record)> = records.iter().collect();
        ordered.sort_by(|(a_name, a), (b_name, b)| {
            let a_rank = a.rank.unwrap_or(i64::MAX);
            let b_rank = b.rank.unwrap_or(i64::MAX);
            a_rank.cmp(&b_rank).then_with(|| a_name.cmp(b_name))
        });
        ordered
            .into_iter()
            .take(n)
            .map(|(name, record)| HighscoreEntry {
                name: name.clone(),
                score: record.score,
            })
            .collect()
    }

    fn unavailable(&self) -> Option<StoreError> {
        self.offline
            .get()
            .then(|| StoreError::Unavailable("memory store is offline".into()))
    }

    fn notify(&self) {
        // Listeners may subscribe again from inside a callback.
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for (n, listener) in listeners.iter_mut() {
            let top = self.top(*n);
            listener(&top);
        }
        let mut slot = self.listeners.borrow_mut();
        listeners.append(&mut slot);
        *slot = listeners;
    }
}

impl ScoreStore for MemoryScoreStore {
    fn write_if_greater_or_equal(&self, key: &str, value: u32, done: WriteDone) {
        if let Some(err) = self.unavailable() {
            done(Err(err));
            return;
        }
        let committed = {
            let mut records = self.records.borrow_mut();
            match records.get_mut(key) {
                Some(record) if record.score > value => false,
                Some(record) => {
                    record.score = value;
                    true
                }
                None => {
                    records.insert(key.to_string(), Record { score: value, rank: None });
                    true
                }
            }
        };
        if committed {
            self.notify();
        }
        done(Ok(committed));
    }

    fn read_once(&self, key: &str, done: ReadDone) {
        if let Some(err) = self.unavailable() {
            done(Err(err));
            return;
        }
        let value = self.score(key);
        done(Ok(value));
    }

    fn set_rank(&self, key: &str, rank: i64) {
        if self.offline.get() {
            log::warn!("set_rank({}) dropped: store offline", key);
            return;
        }
        let changed = match self.records.borrow_mut().get_mut(key) {
            Some(record) => {
                record.rank = Some(rank);
                true
            }
            None => false,
        };
        if changed {
            self.notify();
        }
    }

    fn subscribe_top_n(&self, n: usize, mut listener: TopListener) {
        let top = self.top(n);
        listener(&top);
        self.listeners.borrow_mut().push((n, listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn write(store: &MemoryScoreStore, key: &str, value: u32) -> Result<bool, StoreError> {
        let result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&result);
        let done: WriteDone = Box::new(move |r| *sink.borrow_mut() = Some(r));
        store.write_if_greater_or_equal(key, value, done);
        let value = result.borrow_mut().take();
        value.expect("memory store answers synchronously")
    }

    #[test]
    fn keeps_the_higher_score() {
        let store = MemoryScoreStore::new();
        assert_eq!(write(&store, "alice", 5), Ok(true));
        assert_eq!(write(&store, "alice", 3), Ok(false));
        assert_eq!(store.score("alice"), Some(5));
    }

    #[test]
    fn equal_score_commits() {
        let store = MemoryScoreStore::new();
        write(&store, "bob", 4).unwrap();
        assert_eq!(write(&store, "bob", 4), Ok(true));
    }

    #[test]
    fn offline_store_reports_errors() {
        let store = MemoryScoreStore::new();
        store.set_offline(true);
        assert!(matches!(write(&store, "alice", 1), Err(StoreError::Unavailable(_))));
        assert_eq!(store.score("alice"), None);
    }

    #[test]
    fn top_orders_by_rank() {
        let store = MemoryScoreStore::new();
        for (name, score) in [("carol", 7), ("alice", 12), ("bob", 3)] {
            write(&store, name, score).unwrap();
            store.set_rank(name, -(score as i64));
        }
        write(&store, "dave", 20).unwrap();
        let names: Vec<String> = store.top(10).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alice", "carol", "bob", "dave"]);
        assert_eq!(store.top(2).len(), 2);
    }

    #[test]
    fn subscribers_see_updates() {
        let store = MemoryScoreStore::new();
        let seen: Rc<RefCell<Vec<Vec<HighscoreEntry>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe_top_n(1, Box::new(move |top| sink.borrow_mut().push(top.to_vec())));
        write(&store, "alice", 5).unwrap();
        store.set_rank("alice", -5);

        let seen = seen.borrow();
        assert!(seen[0].is_empty());
        assert_eq!(seen.len(), 3);
        assert_eq!(
            seen[2],
            vec![HighscoreEntry { name: "alice".into(), score: 5 }]
        );
    }

    #[test]
    fn read_once_returns_stored_value() {
        let store = MemoryScoreStore::new();
        write(&store, "alice", 9).unwrap();
        let got = Rc::new(Cell::new(None));
        let sink = Rc::clone(&got);
        store.read_once("alice", Box::new(move |r| sink.set(r.ok().flatten())));
        assert_eq!(got.get(), Some(9));
    }
}
