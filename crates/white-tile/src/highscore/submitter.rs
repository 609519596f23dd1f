//! Once-per-run highscore submission.
//!
//! `submit` does a compare-and-write of the player's score, ranks the entry on
//! commit, and independently reads the stored value back for display. The
//! read-back may show a higher score than this run's if an earlier run (or
//! another client) stored one.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};

use super::store::{HighscoreEntry, ScoreStore};

/// Result of a [`HighscoreSubmitter::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// The player name is blank.
    NoName,
    /// This run was already submitted.
    AlreadySubmitted,
}

/// Handle to the live top-`n` list, detached from the submitter.
///
/// Holding one does not borrow the game, so a listener may call back into
/// the game while the store delivers entries synchronously.
#[derive(Clone)]
pub struct Leaderboard {
    store: Rc<dyn ScoreStore>,
    size: usize,
}

impl Leaderboard {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn watch(&self, listener: impl FnMut(&[HighscoreEntry]) + 'static) {
        self.store.subscribe_top_n(self.size, Box::new(listener));
    }
}

pub struct HighscoreSubmitter {
    store: Rc<dyn ScoreStore>,
    submitted: bool,
    stored: Rc<Cell<Option<u32>>>,
    generation: Rc<Cell<u64>>,
}

impl HighscoreSubmitter {
    pub fn new(store: Rc<dyn ScoreStore>) -> Self {
        Self {
            store,
            submitted: false,
            stored: Rc::new(Cell::new(None)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Arm the guard for a new run and forget the displayed value. Read-backs
    /// still in flight from the previous run are dropped when they land.
    pub fn begin_run(&mut self) {
        self.submitted = false;
        self.stored.set(None);
        self.generation.set(self.generation.get() + 1);
    }

    pub fn submit(&mut self, name: &str, score: u32) -> SubmitOutcome {
        let name = name.trim();
        if name.is_empty() {
            debug!("highscore not submitted: no player name");
            return SubmitOutcome::NoName;
        }
        if self.submitted {
            return SubmitOutcome::AlreadySubmitted;
        }
        self.submitted = true;
        debug!("submitting highscore {} for {}", score, name);

        let store = Rc::clone(&self.store);
        let key = name.to_string();
        self.store.write_if_greater_or_equal(
            name,
            score,
            Box::new(move |result| match result {
                Ok(true) => store.set_rank(&key, -i64::from(score)),
                Ok(false) => debug!("{} already holds a higher score", key),
                Err(err) => warn!("highscore write failed: {}", err),
            }),
        );

        let stored = Rc::clone(&self.stored);
        let generation = Rc::clone(&self.generation);
        let run = generation.get();
        self.store.read_once(
            name,
            Box::new(move |result| {
                if generation.get() != run {
                    debug!("discarding highscore read-back from a previous run");
                    return;
                }
                match result {
                    Ok(value) => stored.set(value),
                    Err(err) => warn!("highscore read failed: {}", err),
                }
            }),
        );

        SubmitOutcome::Submitted
    }

    /// Stored score read back after this run's submission.
    pub fn stored_score(&self) -> Option<u32> {
        self.stored.get()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// The top `n` entries, ordered by rank.
    pub fn leaderboard(&self, n: usize) -> Leaderboard {
        Leaderboard {
            store: Rc::clone(&self.store),
            size: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscore::store::{MemoryScoreStore, ReadDone, StoreError, TopListener, WriteDone};
    use std::cell::RefCell;

    fn submitter(store: &Rc<MemoryScoreStore>) -> HighscoreSubmitter {
        let store: Rc<dyn ScoreStore> = store.clone();
        HighscoreSubmitter::new(store)
    }

    #[test]
    fn submits_once_per_run() {
        let store = Rc::new(MemoryScoreStore::new());
        let mut highscores = submitter(&store);
        assert_eq!(highscores.submit("alice", 5), SubmitOutcome::Submitted);
        assert_eq!(highscores.submit("alice", 8), SubmitOutcome::AlreadySubmitted);
        assert_eq!(store.score("alice"), Some(5));
        assert_eq!(store.rank("alice"), Some(-5));
        assert_eq!(highscores.stored_score(), Some(5));

        highscores.begin_run();
        assert_eq!(highscores.stored_score(), None);
        assert_eq!(highscores.submit("alice", 8), SubmitOutcome::Submitted);
        assert_eq!(store.score("alice"), Some(8));
    }

    #[test]
    fn lower_score_shows_the_stored_best() {
        let store = Rc::new(MemoryScoreStore::new());
        let mut highscores = submitter(&store);
        highscores.submit("alice", 5);
        highscores.begin_run();
        highscores.submit("alice", 3);
        assert_eq!(store.score("alice"), Some(5));
        assert_eq!(store.rank("alice"), Some(-5));
        assert_eq!(highscores.stored_score(), Some(5));
    }

    #[test]
    fn blank_name_is_not_submitted() {
        let store = Rc::new(MemoryScoreStore::new());
        let mut highscores = submitter(&store);
        assert_eq!(highscores.submit("   ", 5), SubmitOutcome::NoName);
        assert_eq!(highscores.submit("", 5), SubmitOutcome::NoName);
        assert!(!highscores.is_submitted());
        assert!(store.top(10).is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let store = Rc::new(MemoryScoreStore::new());
        let mut highscores = submitter(&store);
        highscores.submit("  bob ", 2);
        assert_eq!(store.score("bob"), Some(2));
    }

    #[test]
    fn failing_store_leaves_nothing_to_show() {
        let store = Rc::new(MemoryScoreStore::new());
        store.set_offline(true);
        let mut highscores = submitter(&store);
        assert_eq!(highscores.submit("alice", 5), SubmitOutcome::Submitted);
        assert!(highscores.is_submitted());
        assert_eq!(highscores.stored_score(), None);
    }

    /// Store that holds reads until the test releases them.
    #[derive(Default)]
    struct DeferredStore {
        reads: RefCell<Vec<ReadDone>>,
    }

    impl ScoreStore for DeferredStore {
        fn write_if_greater_or_equal(&self, _key: &str, _value: u32, done: WriteDone) {
            done(Ok(true));
        }

        fn read_once(&self, _key: &str, done: ReadDone) {
            self.reads.borrow_mut().push(done);
        }

        fn set_rank(&self, _key: &str, _rank: i64) {}

        fn subscribe_top_n(&self, _n: usize, _listener: TopListener) {}
    }

    impl DeferredStore {
        fn release(&self, value: Result<Option<u32>, StoreError>) {
            let reads: Vec<ReadDone> = self.reads.borrow_mut().drain(..).collect();
            for done in reads {
                done(value.clone());
            }
        }
    }

    #[test]
    fn stale_read_back_is_discarded() {
        let store = Rc::new(DeferredStore::default());
        let dyn_store: Rc<dyn ScoreStore> = store.clone();
        let mut highscores = HighscoreSubmitter::new(dyn_store);
        highscores.submit("alice", 5);
        highscores.begin_run();
        store.release(Ok(Some(5)));
        assert_eq!(highscores.stored_score(), None);

        highscores.submit("alice", 7);
        store.release(Ok(Some(7)));
        assert_eq!(highscores.stored_score(), Some(7));
    }

    #[test]
    fn leaderboard_forwards_live_updates() {
        let store = Rc::new(MemoryScoreStore::new());
        let mut highscores = submitter(&store);
        let latest: Rc<RefCell<Vec<HighscoreEntry>>> = Rc::default();
        let sink = Rc::clone(&latest);
        let leaderboard = highscores.leaderboard(50);
        assert_eq!(leaderboard.size(), 50);
        leaderboard.watch(move |top| *sink.borrow_mut() = top.to_vec());
        highscores.submit("alice", 4);
        assert_eq!(
            *latest.borrow(),
            vec![HighscoreEntry { name: "alice".into(), score: 4 }]
        );
    }
}
