//! Best score and leaderboard
//!
//! Persisted to LocalStorage: the best score as a decimal string, the top 5
//! named scores as a JSON array.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KeyValueStore, StorageError};

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 5;

/// Longest name stored on the leaderboard (chars)
pub const MAX_NAME_CHARS: usize = 24;

/// Best score ever reached on this device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore(pub u64);

impl BestScore {
    const STORAGE_KEY: &'static str = "snake_best_score";

    /// Load from storage; missing or unparsable values are 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = store
            .get(Self::STORAGE_KEY)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self(best)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.0.to_string())?;
        log::info!("Best score saved ({})", self.0);
        Ok(())
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

/// Top scores, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    const STORAGE_KEY: &'static str = "snake_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score, keeping descending order (ties go after existing
    /// equal scores). Returns the 1-based rank, or None if it didn't qualify.
    pub fn add(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            name: name.chars().take(MAX_NAME_CHARS).collect(),
            score,
        };

        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Load from storage; missing or corrupt data is an empty board
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<ScoreEntry>>(&json) {
            Ok(entries) => {
                // Stored data may have been edited by hand
                let mut board = Self::new();
                for e in entries {
                    board.add(&e.name, e.score);
                }
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            Err(e) => {
                log::warn!("Discarding corrupt leaderboard: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// A name request raised at game over.
///
/// The game never waits on it: the shell shows a form, the run restarts
/// straight away, and the entry is recorded whenever the player answers.
#[derive(Debug, Clone, Default)]
pub struct NamePrompt {
    pending: Option<u64>,
}

impl NamePrompt {
    /// Ask for a name for `score`. An open request keeps the higher score.
    pub fn request(&mut self, score: u64) {
        self.pending = Some(self.pending.map_or(score, |s| s.max(score)));
    }

    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve the request. Empty or whitespace-only names record nothing.
    /// Returns the rank reached, if any.
    pub fn submit(&mut self, name: &str, board: &mut Leaderboard) -> Option<usize> {
        let score = self.pending.take()?;
        let name = name.trim();
        if name.is_empty() {
            log::info!("Empty name, score {} not recorded", score);
            return None;
        }
        let rank = board.add(name, score);
        if let Some(rank) = rank {
            log::info!("{} placed #{} with {}", name, rank, score);
        }
        rank
    }

    /// Drop the request without recording anything
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Everything a finished run can be recorded into: the leaderboard and the
/// open name request. The best score itself lives in the game state.
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub leaderboard: Leaderboard,
    pub prompt: NamePrompt,
}

impl Records {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            leaderboard: Leaderboard::load(store),
            prompt: NamePrompt::default(),
        }
    }

    /// Settle a finished run. Persists `best` when the run set it, and opens
    /// a name request when `ask_name` is on and the score makes the board.
    /// Returns true when a name is wanted.
    pub fn game_over(
        &mut self,
        store: &mut dyn KeyValueStore,
        score: u64,
        best: u64,
        new_best: bool,
        ask_name: bool,
    ) -> bool {
        if new_best {
            if let Err(e) = BestScore(best).save(store) {
                log::warn!("Could not save best score: {}", e);
            }
        }
        if ask_name && self.leaderboard.qualifies(score) {
            self.prompt.request(score);
            return true;
        }
        false
    }

    /// Answer the open name request and persist the board if it changed.
    /// Returns the rank reached, if any.
    pub fn submit_name(&mut self, store: &mut dyn KeyValueStore, name: &str) -> Option<usize> {
        let rank = self.prompt.submit(name, &mut self.leaderboard)?;
        if let Err(e) = self.leaderboard.save(store) {
            log::warn!("Could not save leaderboard: {}", e);
        }
        Some(rank)
    }

    /// Dismiss the open name request
    pub fn skip_name(&mut self) {
        self.prompt.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!Leaderboard::new().qualifies(0));
    }

    #[test]
    fn test_add_keeps_descending_order_and_cap() {
        let mut board = Leaderboard::new();
        for (i, score) in [30, 10, 50, 20, 40, 60, 5].into_iter().enumerate() {
            board.add(&format!("p{}", i), score);
        }
        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![60, 50, 40, 30, 20]);
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut board = Leaderboard::new();
        board.add("first", 50);
        assert_eq!(board.add("second", 50), Some(2));
        assert_eq!(board.entries()[0].name, "first");
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let mut board = Leaderboard::new();
        for s in [100, 90, 80, 70, 60] {
            board.add("x", s);
        }
        assert!(!board.qualifies(60));
        assert_eq!(board.add("y", 60), None);
        assert_eq!(board.add("z", 65), Some(5));
        assert_eq!(board.entries().len(), MAX_ENTRIES);
    }

    #[test]
    fn test_long_names_are_clipped() {
        let mut board = Leaderboard::new();
        board.add(&"a".repeat(100), 10);
        assert_eq!(board.entries()[0].name.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_leaderboard_persists_as_json_array() {
        let mut store = MemoryStore::default();
        let mut board = Leaderboard::new();
        board.add("ana", 120);
        board.add("bo", 40);
        board.save(&mut store).unwrap();

        let raw = store.get("snake_leaderboard").unwrap();
        assert_eq!(raw, r#"[{"name":"ana","score":120},{"name":"bo","score":40}]"#);
        assert_eq!(Leaderboard::load(&store), board);
    }

    #[test]
    fn test_unsorted_stored_board_is_normalized() {
        let mut store = MemoryStore::default();
        store
            .set(
                "snake_leaderboard",
                r#"[{"name":"a","score":1},{"name":"b","score":9},{"name":"c","score":5},
                    {"name":"d","score":2},{"name":"e","score":7},{"name":"f","score":3}]"#,
            )
            .unwrap();
        let board = Leaderboard::load(&store);
        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 7, 5, 3, 2]);
    }

    #[test]
    fn test_corrupt_data_loads_defaults() {
        let mut store = MemoryStore::default();
        store.set("snake_leaderboard", "[{oops").unwrap();
        store.set("snake_best_score", "lots").unwrap();
        assert!(Leaderboard::load(&store).is_empty());
        assert_eq!(BestScore::load(&store), BestScore(0));
    }

    #[test]
    fn test_best_score_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(BestScore::load(&store), BestScore(0));
        BestScore(230).save(&mut store).unwrap();
        assert_eq!(store.get("snake_best_score").as_deref(), Some("230"));
        assert_eq!(BestScore::load(&store), BestScore(230));
    }

    #[test]
    fn test_prompt_records_trimmed_name() {
        let mut board = Leaderboard::new();
        let mut prompt = NamePrompt::default();
        prompt.request(70);
        assert_eq!(prompt.submit("  kit  ", &mut board), Some(1));
        assert_eq!(board.entries()[0].name, "kit");
        assert!(!prompt.is_open());
    }

    #[test]
    fn test_prompt_empty_or_cancelled_records_nothing() {
        let mut board = Leaderboard::new();
        let mut prompt = NamePrompt::default();
        prompt.request(70);
        assert_eq!(prompt.submit("   ", &mut board), None);
        assert!(board.is_empty());

        prompt.request(80);
        prompt.cancel();
        assert_eq!(prompt.submit("kit", &mut board), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_prompt_keeps_higher_pending_score() {
        let mut prompt = NamePrompt::default();
        prompt.request(90);
        prompt.request(40);
        assert_eq!(prompt.pending(), Some(90));
        prompt.request(120);
        assert_eq!(prompt.pending(), Some(120));
    }

    #[test]
    fn test_game_over_saves_best_only_when_new() {
        let mut store = MemoryStore::default();
        let mut records = Records::default();

        records.game_over(&mut store, 40, 90, false, false);
        assert_eq!(store.get("snake_best_score"), None);

        records.game_over(&mut store, 120, 120, true, false);
        assert_eq!(BestScore::load(&store), BestScore(120));
    }

    #[test]
    fn test_game_over_asks_for_name_only_when_enabled_and_qualifying() {
        let mut store = MemoryStore::default();
        let mut records = Records::default();

        assert!(!records.game_over(&mut store, 70, 70, true, false));
        assert!(!records.prompt.is_open());

        assert!(!records.game_over(&mut store, 0, 70, false, true));
        assert!(!records.prompt.is_open());

        assert!(records.game_over(&mut store, 70, 70, false, true));
        assert_eq!(records.prompt.pending(), Some(70));
    }

    #[test]
    fn test_non_qualifying_run_leaves_store_untouched() {
        let mut store = MemoryStore::default();
        let mut records = Records::default();
        for s in [100, 90, 80, 70, 60] {
            records.leaderboard.add("x", s);
        }
        records.leaderboard.save(&mut store).unwrap();
        let before = store.clone();

        assert!(!records.game_over(&mut store, 50, 100, false, true));
        assert!(!records.prompt.is_open());
        assert_eq!(store.get("snake_leaderboard"), before.get("snake_leaderboard"));
        assert_eq!(store.get("snake_best_score"), None);
    }

    #[test]
    fn test_submitted_name_is_persisted() {
        let mut store = MemoryStore::default();
        let mut records = Records::load(&store);
        records.game_over(&mut store, 150, 150, true, true);

        assert_eq!(records.submit_name(&mut store, "ivy"), Some(1));
        let board = Leaderboard::load(&store);
        assert_eq!(board.entries()[0].name, "ivy");
        assert_eq!(board.entries()[0].score, 150);
    }

    #[test]
    fn test_skipped_name_records_nothing() {
        let mut store = MemoryStore::default();
        let mut records = Records::default();
        records.game_over(&mut store, 150, 150, false, true);
        records.skip_name();

        assert_eq!(records.submit_name(&mut store, "ivy"), None);
        assert_eq!(store.get("snake_leaderboard"), None);
    }

    proptest! {
        #[test]
        fn test_board_stays_bounded_and_sorted(scores in prop::collection::vec(0u64..1000, 0..40)) {
            let mut board = Leaderboard::new();
            for s in scores {
                board.add("p", s);
                prop_assert!(board.entries().len() <= MAX_ENTRIES);
                prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
