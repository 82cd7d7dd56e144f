//! Scoreboard leaderboard and score submission
//!
//! The game never waits on a scoreboard. A submission runs on its own worker
//! thread and the frame loop polls it once per frame with real elapsed time,
//! so a slow or dead backend only ever turns into a timeout.

use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept on a leaderboard
pub const MAX_ENTRIES: usize = 10;

/// A single ranked entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

/// Top scores, sorted descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would take (1-indexed), or None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let at = self.entries.iter().position(|e| score > e.score);
        Some(at.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score, returning the rank achieved
    ///
    /// Ties rank below the entries already holding that score.
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            ScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Why a submission produced no ranked list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardError {
    /// Backend could not be reached
    Unavailable(String),
    /// Backend refused the submission
    Rejected(String),
    /// Worker went away without answering
    Disconnected,
}

impl fmt::Display for ScoreboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreboardError::Unavailable(msg) => write!(f, "scoreboard unavailable: {msg}"),
            ScoreboardError::Rejected(msg) => write!(f, "score rejected: {msg}"),
            ScoreboardError::Disconnected => write!(f, "scoreboard worker disconnected"),
        }
    }
}

impl std::error::Error for ScoreboardError {}

/// Something that accepts a (name, score) pair and answers with a ranked list
///
/// Calls may block; they always run off the frame loop.
pub trait ScoreboardBackend: Send + 'static {
    fn submit(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreboardError>;
}

/// In-process backend backed by a shared [`Leaderboard`]
///
/// Clones share the same board, so a handle kept by the driver sees every
/// submission made through the others.
#[derive(Debug, Clone, Default)]
pub struct LocalScoreboard {
    board: Arc<Mutex<Leaderboard>>,
}

impl LocalScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current board
    pub fn snapshot(&self) -> Leaderboard {
        match self.board.lock() {
            Ok(board) => board.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ScoreboardBackend for LocalScoreboard {
    fn submit(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoreboardError::Rejected("empty name".to_string()));
        }
        let mut board = self
            .board
            .lock()
            .map_err(|_| ScoreboardError::Unavailable("leaderboard lock poisoned".to_string()))?;
        match board.add_score(name, score) {
            Some(rank) => log::info!("{name} ranked #{rank} with {score}"),
            None => log::debug!("{score} did not make the board"),
        }
        Ok(board.entries.clone())
    }
}

/// Where a submission stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Ranked(Vec<ScoreEntry>),
    Failed(ScoreboardError),
    TimedOut,
}

impl SubmissionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }
}

/// Handle to an in-flight submission
#[derive(Debug)]
pub struct ScoreSubmission {
    rx: Receiver<Result<Vec<ScoreEntry>, ScoreboardError>>,
    elapsed: f32,
    timeout: f32,
    settled: Option<SubmissionStatus>,
}

impl ScoreSubmission {
    /// Start submitting `score` under `name` on a worker thread
    ///
    /// `timeout` is in seconds of the real time later fed to [`Self::poll`].
    pub fn spawn<B: ScoreboardBackend>(
        mut backend: B,
        name: impl Into<String>,
        score: u64,
        timeout: f32,
    ) -> Self {
        let name = name.into();
        let (tx, rx) = mpsc::channel();
        log::info!("Submitting score {score} for {name}");
        std::thread::spawn(move || {
            let result = backend.submit(&name, score);
            // Receiver is gone if the submission was cancelled
            let _ = tx.send(result);
        });
        Self {
            rx,
            elapsed: 0.0,
            timeout: timeout.max(0.0),
            settled: None,
        }
    }

    /// Check for an answer without blocking
    ///
    /// Once the submission settles every later poll returns the same status.
    pub fn poll(&mut self, real_dt: f32) -> SubmissionStatus {
        if let Some(status) = &self.settled {
            return status.clone();
        }
        if real_dt.is_finite() {
            self.elapsed += real_dt.max(0.0);
        }

        let status = match self.rx.try_recv() {
            Ok(Ok(entries)) => SubmissionStatus::Ranked(entries),
            Ok(Err(err)) => {
                log::warn!("Score submission failed: {err}");
                SubmissionStatus::Failed(err)
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("Score submission worker exited without a result");
                SubmissionStatus::Failed(ScoreboardError::Disconnected)
            }
            Err(TryRecvError::Empty) if self.elapsed >= self.timeout => {
                log::warn!("Score submission timed out after {:.1}s", self.elapsed);
                SubmissionStatus::TimedOut
            }
            Err(TryRecvError::Empty) => return SubmissionStatus::Pending,
        };
        self.settled = Some(status.clone());
        status
    }

    /// Give up on the submission; a late answer is discarded
    pub fn cancel(self) {
        log::debug!("Score submission cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wait(submission: &mut ScoreSubmission) -> SubmissionStatus {
        for _ in 0..500 {
            let status = submission.poll(0.0);
            if !status.is_pending() {
                return status;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        submission.poll(0.0)
    }

    struct Failing;

    impl ScoreboardBackend for Failing {
        fn submit(&mut self, _: &str, _: u64) -> Result<Vec<ScoreEntry>, ScoreboardError> {
            Err(ScoreboardError::Unavailable("offline".to_string()))
        }
    }

    struct Slow(Duration);

    impl ScoreboardBackend for Slow {
        fn submit(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreboardError> {
            std::thread::sleep(self.0);
            Ok(vec![ScoreEntry {
                name: name.to_string(),
                score,
            }])
        }
    }

    #[test]
    fn test_leaderboard_ranking() {
        let mut board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.add_score("a", 100), Some(1));
        assert_eq!(board.add_score("b", 300), Some(1));
        assert_eq!(board.add_score("c", 100), Some(3));
        assert_eq!(board.top_score(), Some(300));
        let names: Vec<&str> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_leaderboard_full() {
        let mut board = Leaderboard::new();
        for i in 1..=MAX_ENTRIES as u64 {
            board.add_score("p", i * 10);
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert!(!board.qualifies(10));
        assert_eq!(board.potential_rank(11), Some(MAX_ENTRIES));
        assert_eq!(board.add_score("q", 1000), Some(1));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_local_submission_ranks() {
        let local = LocalScoreboard::new();
        let mut submission = ScoreSubmission::spawn(local.clone(), "ada", 420, 5.0);
        match wait(&mut submission) {
            SubmissionStatus::Ranked(entries) => {
                assert_eq!(entries[0].name, "ada");
                assert_eq!(entries[0].score, 420);
            }
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(local.snapshot().top_score(), Some(420));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut submission = ScoreSubmission::spawn(LocalScoreboard::new(), "  ", 10, 5.0);
        assert!(matches!(
            wait(&mut submission),
            SubmissionStatus::Failed(ScoreboardError::Rejected(_))
        ));
    }

    #[test]
    fn test_backend_failure_reported() {
        let mut submission = ScoreSubmission::spawn(Failing, "x", 10, 5.0);
        let status = wait(&mut submission);
        assert_eq!(
            status,
            SubmissionStatus::Failed(ScoreboardError::Unavailable("offline".to_string()))
        );
        // Settled status sticks
        assert_eq!(submission.poll(1.0), status);
    }

    #[test]
    fn test_timeout_uses_polled_time() {
        let mut submission = ScoreSubmission::spawn(Slow(Duration::from_millis(300)), "x", 1, 0.5);
        assert_eq!(submission.poll(0.2), SubmissionStatus::Pending);
        assert_eq!(submission.poll(0.4), SubmissionStatus::TimedOut);
        assert_eq!(submission.poll(0.0), SubmissionStatus::TimedOut);
    }

    #[test]
    fn test_cancel_does_not_block() {
        let submission = ScoreSubmission::spawn(Slow(Duration::from_millis(50)), "x", 1, 5.0);
        submission.cancel();
    }
}
