//! Leaderboard cache and score submission
//!
//! The simulation only ever reads a cached snapshot ([`ScoreBoard`]) that the
//! score service pushes to it. Submission is fire-and-forget: failures are
//! reported to the caller's callback and never touch game state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name used when the player leaves the prompt blank
pub const ANONYMOUS: &str = "ANONYMOUS";

/// Errors reported by a leaderboard backend
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("score {0} is not eligible for the leaderboard")]
    Rejected(u64),
    #[error("leaderboard storage unavailable: {0}")]
    Storage(String),
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Trim and upper-case a submitted name; blank becomes [`ANONYMOUS`]
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Snapshot of the top scores, highest first
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the snapshot wholesale
    pub fn replace(&mut self, mut entries: Vec<ScoreEntry>) {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        self.entries = entries;
    }

    /// Check if a score qualifies for the leaderboard. Ties with the lowest
    /// entry of a full board qualify.
    pub fn qualifies(&self, score: u64) -> bool {
        self.has_room_for(score, |lowest| score >= lowest)
    }

    /// Like [`ScoreBoard::qualifies`], but a full board must be beaten outright
    pub fn outranks_lowest(&self, score: u64) -> bool {
        self.has_room_for(score, |lowest| score > lowest)
    }

    fn has_room_for(&self, score: u64, beats: impl FnOnce(u64) -> bool) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.lowest_score().is_none_or(beats)
    }

    /// Insert keeping descending order, then trim. Returns the 1-based rank,
    /// or None if the entry fell off the end.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn lowest_score(&self) -> Option<u64> {
        self.entries.last().map(|e| e.score)
    }
}

/// Callback receiving each new leaderboard snapshot
pub type ScoresCallback = Box<dyn FnMut(&[ScoreEntry])>;

/// A source of leaderboard snapshots and a sink for new scores
pub trait LeaderboardService {
    /// Register for snapshot pushes. Implementations deliver the current
    /// snapshot immediately.
    fn subscribe(&mut self, callback: ScoresCallback);

    /// Submit a score. The name is normalized by the service.
    fn submit(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError>;
}

/// Leaderboard kept in memory and mirrored to LocalStorage on the web
#[derive(Default)]
pub struct LocalLeaderboard {
    board: ScoreBoard,
    subscribers: Vec<ScoresCallback>,
}

impl LocalLeaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "jj_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(board: ScoreBoard) -> Self {
        Self {
            board,
            subscribers: Vec::new(),
        }
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    fn notify(&mut self) {
        for callback in &mut self.subscribers {
            callback(&self.board.entries);
        }
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<ScoreBoard>(&json) {
                    log::info!("Loaded {} high scores", board.len());
                    return Self::with_board(board);
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| LeaderboardError::Storage("no LocalStorage".to_string()))?;

        let json = serde_json::to_string(&self.board)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| LeaderboardError::Storage(format!("{e:?}")))?;
        log::info!("High scores saved ({} entries)", self.board.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        Ok(())
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn subscribe(&mut self, mut callback: ScoresCallback) {
        callback(&self.board.entries);
        self.subscribers.push(callback);
    }

    fn submit(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        if score == 0 {
            return Err(LeaderboardError::Rejected(score));
        }

        let entry = ScoreEntry::new(normalize_name(name), score);
        match self.board.insert(entry) {
            Some(rank) => log::info!("Score {score} entered the leaderboard at #{rank}"),
            None => log::debug!("Score {score} did not place"),
        }
        self.notify();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn full_board() -> ScoreBoard {
        let mut board = ScoreBoard::new();
        board.replace((1..=10).map(|i| ScoreEntry::new("AAA", i * 100)).collect());
        board
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  jack "), "JACK");
        assert_eq!(normalize_name("   "), ANONYMOUS);
        assert_eq!(normalize_name(""), ANONYMOUS);
    }

    #[test]
    fn test_replace_sorts_and_trims() {
        let board = full_board();
        assert_eq!(board.len(), 10);
        assert_eq!(board.top_score(), Some(1000));
        assert_eq!(board.lowest_score(), Some(100));
    }

    #[test]
    fn test_qualifies() {
        let empty = ScoreBoard::new();
        assert!(!empty.qualifies(0));
        assert!(empty.qualifies(1));

        let full = full_board();
        assert!(!full.qualifies(99));
        assert!(full.qualifies(100));
        assert!(full.qualifies(5000));
    }

    #[test]
    fn test_outranks_lowest_rejects_ties() {
        let full = full_board();
        assert!(!full.outranks_lowest(100));
        assert!(full.outranks_lowest(101));
        assert!(!ScoreBoard::new().outranks_lowest(0));
        assert!(ScoreBoard::new().outranks_lowest(1));
    }

    #[test]
    fn test_insert_rank() {
        let mut board = full_board();
        assert_eq!(board.insert(ScoreEntry::new("BOB", 550)), Some(6));
        assert_eq!(board.len(), 10);
        assert_eq!(board.lowest_score(), Some(200));
        assert_eq!(board.insert(ScoreEntry::new("LOW", 1)), None);
    }

    #[test]
    fn test_subscribe_receives_current_and_updates() {
        let mut service = LocalLeaderboard::with_board(full_board());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        service.subscribe(Box::new(move |entries| {
            sink.borrow_mut().push(entries.to_vec());
        }));
        assert_eq!(seen.borrow().len(), 1);

        service.submit("  zed", 2000).unwrap();
        let snapshots = seen.borrow();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1][0], ScoreEntry::new("ZED", 2000));
    }

    #[test]
    fn test_submit_rejects_zero() {
        let mut service = LocalLeaderboard::new();
        assert!(matches!(
            service.submit("x", 0),
            Err(LeaderboardError::Rejected(0))
        ));
        assert!(service.board().is_empty());
    }
}
