//! Daily best-times leaderboard
//!
//! Keeps the ten fastest completion times of the current local day. The
//! list empties itself lazily the first time it is touched after midnight.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_SCORES};
use crate::persistence::LeaderboardFile;
use crate::platform::{Clock, format_iso8601};
use crate::session::ScoreSink;

/// Rejected score submissions
#[derive(Debug, Error, PartialEq)]
pub enum LeaderboardError {
    #[error("time must be a finite, non-negative number of seconds, got {0}")]
    InvalidTime(f64),
}

/// A single recorded completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Completion time in seconds
    pub time: f64,
    pub player_name: String,
    /// When the score was recorded (ISO-8601, UTC)
    #[serde(rename = "date")]
    pub recorded_at: String,
}

/// Today's top times, fastest first
#[derive(Debug, Clone)]
pub struct Leaderboard<C: Clock> {
    entries: Vec<ScoreEntry>,
    /// Local day the entries belong to
    day: i64,
    clock: C,
}

impl<C: Clock> Leaderboard<C> {
    /// Empty board for the clock's current day
    pub fn new(clock: C) -> Self {
        let day = clock.today();
        Self {
            entries: Vec::new(),
            day,
            clock,
        }
    }

    /// Rebuild a board from a saved file; stale days are dropped on first use
    pub fn from_file(file: LeaderboardFile, clock: C) -> Self {
        let mut board = Self {
            entries: file.entries,
            day: file.day_marker,
            clock,
        };
        board.entries.sort_by(|a, b| a.time.total_cmp(&b.time));
        board.entries.truncate(MAX_SCORES);
        board
    }

    /// Snapshot for saving
    pub fn to_file(&self) -> LeaderboardFile {
        LeaderboardFile::new(self.day, self.entries.clone())
    }

    /// Clear the list if the local day has moved on since it was filled
    fn roll_day(&mut self) {
        let today = self.clock.today();
        if today > self.day {
            log::info!(
                "Resetting daily leaderboard ({} entries from day {})",
                self.entries.len(),
                self.day
            );
            self.entries.clear();
            self.day = today;
        }
    }

    /// Record a completion time
    ///
    /// Returns the stored entry even when it did not make the top ten.
    /// Empty or missing names are stored as "Anonymous".
    pub fn record_score(
        &mut self,
        time: f64,
        player_name: Option<&str>,
    ) -> Result<ScoreEntry, LeaderboardError> {
        if !time.is_finite() || time < 0.0 {
            return Err(LeaderboardError::InvalidTime(time));
        }

        self.roll_day();

        let player_name = player_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PLAYER_NAME)
            .to_string();
        let entry = ScoreEntry {
            time,
            player_name,
            recorded_at: format_iso8601(self.clock.now_ms()),
        };

        // Sorted ascending; ties keep submission order
        let pos = self.entries.iter().position(|e| time < e.time);
        match pos {
            Some(i) => self.entries.insert(i, entry.clone()),
            None => self.entries.push(entry.clone()),
        }
        self.entries.truncate(MAX_SCORES);

        log::info!(
            "Recorded {:.1}s for {} ({} on board)",
            entry.time,
            entry.player_name,
            self.entries.len()
        );
        Ok(entry)
    }

    /// Today's entries, fastest first
    pub fn scores(&mut self) -> &[ScoreEntry] {
        self.roll_day();
        &self.entries
    }
}

/// A leaderboard behind one lock, shareable between request handlers
#[derive(Debug)]
pub struct SharedLeaderboard<C: Clock> {
    inner: Mutex<Leaderboard<C>>,
}

impl<C: Clock> SharedLeaderboard<C> {
    pub fn new(board: Leaderboard<C>) -> Self {
        Self {
            inner: Mutex::new(board),
        }
    }

    /// Every operation leaves the list sorted and capped, so a poisoned lock
    /// still guards a consistent board.
    fn lock(&self) -> MutexGuard<'_, Leaderboard<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_score(
        &self,
        time: f64,
        player_name: Option<&str>,
    ) -> Result<ScoreEntry, LeaderboardError> {
        self.lock().record_score(time, player_name)
    }

    pub fn scores(&self) -> Vec<ScoreEntry> {
        self.lock().scores().to_vec()
    }

    pub fn to_file(&self) -> LeaderboardFile {
        self.lock().to_file()
    }
}

impl<C: Clock> ScoreSink for SharedLeaderboard<C> {
    fn record(&self, time: f64, player_name: &str) {
        if let Err(err) = self.record_score(time, Some(player_name)) {
            log::warn!("Score not recorded: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::platform::time::MS_PER_DAY;

    fn board() -> (Leaderboard<ManualClock>, ManualClock) {
        let clock = ManualClock::new(20_000 * MS_PER_DAY + 12 * 3_600_000, 0);
        (Leaderboard::new(clock.clone()), clock)
    }

    fn times(board: &mut Leaderboard<ManualClock>) -> Vec<f64> {
        board.scores().iter().map(|e| e.time).collect()
    }

    #[test]
    fn test_scores_sorted_ascending() {
        let (mut board, _) = board();
        for t in [5.2, 1.1, 9.9, 3.3] {
            board.record_score(t, None).unwrap();
        }
        assert_eq!(times(&mut board), vec![1.1, 3.3, 5.2, 9.9]);
    }

    #[test]
    fn test_capped_at_ten_smallest() {
        let (mut board, _) = board();
        let submitted = [12.0, 3.0, 7.0, 1.0, 11.0, 5.0, 9.0, 2.0, 10.0, 4.0, 8.0, 6.0];
        for t in submitted {
            board.record_score(t, Some("pig wrangler")).unwrap();
        }
        let expected: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(times(&mut board), expected);
    }

    #[test]
    fn test_daily_reset_is_lazy() {
        let (mut board, clock) = board();
        board.record_score(4.2, None).unwrap();
        assert_eq!(board.scores().len(), 1);

        clock.advance(MS_PER_DAY);
        assert!(board.scores().is_empty());
    }

    #[test]
    fn test_no_reset_within_the_same_day() {
        let (mut board, clock) = board();
        board.record_score(4.2, None).unwrap();
        clock.advance(11 * 3_600_000);
        assert_eq!(board.scores().len(), 1);
    }

    #[test]
    fn test_record_after_midnight_starts_fresh_day() {
        let (mut board, clock) = board();
        board.record_score(1.0, None).unwrap();
        clock.advance(MS_PER_DAY);
        board.record_score(8.0, None).unwrap();
        assert_eq!(times(&mut board), vec![8.0]);
    }

    #[test]
    fn test_invalid_times_rejected() {
        let (mut board, _) = board();
        assert_eq!(
            board.record_score(-1.0, None),
            Err(LeaderboardError::InvalidTime(-1.0))
        );
        assert!(board.record_score(f64::NAN, None).is_err());
        assert!(board.record_score(f64::INFINITY, None).is_err());
        assert!(board.scores().is_empty());
    }

    #[test]
    fn test_zero_time_is_kept() {
        let (mut board, _) = board();
        board.record_score(3.0, None).unwrap();
        board.record_score(0.0, Some("Nini")).unwrap();
        assert_eq!(times(&mut board), vec![0.0, 3.0]);
    }

    #[test]
    fn test_default_player_name_and_date() {
        let (mut board, _) = board();
        let entry = board.record_score(2.5, Some("   ")).unwrap();
        assert_eq!(entry.player_name, "Anonymous");
        assert!(entry.recorded_at.ends_with("T12:00:00.000Z"));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = ScoreEntry {
            time: 3.5,
            player_name: "Nini".to_string(),
            recorded_at: "2024-05-01T10:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"time": 3.5, "playerName": "Nini", "date": "2024-05-01T10:00:00.000Z"})
        );
    }

    #[test]
    fn test_shared_board_from_threads() {
        let (board, _) = board();
        let shared = std::sync::Arc::new(SharedLeaderboard::new(board));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for j in 0..5 {
                        shared.record_score(f64::from(i * 5 + j + 1), None).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let scores = shared.scores();
        assert_eq!(scores.len(), 10);
        assert!(scores.windows(2).all(|w| w[0].time <= w[1].time));
        assert_eq!(scores[0].time, 1.0);
    }
}
