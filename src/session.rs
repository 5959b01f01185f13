//! Guessing-game session management.

use chrono::{DateTime, TimeDelta, Utc};
use derive_more::{Display, Error};
use lab_guess::{Code, CodeError, Score, generate_secret, score};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

/// Unique identifier for a game session.
pub type GameId = u64;

/// One scored guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// The submitted code.
    pub guess: Code,
    /// Its A/B result.
    #[serde(flatten)]
    pub score: Score,
    /// When it was submitted.
    pub time: DateTime<Utc>,
}

/// Why a guess was not scored.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The guess string was empty.
    #[display("Please enter a guess")]
    EmptyGuess,
    /// The guess was not exactly four ASCII digits.
    #[display("Please enter exactly 4 digits ({source})")]
    InvalidCode {
        /// What was wrong with it.
        source: CodeError,
    },
    /// The session forbids repeated digits and the guess had some.
    #[display("Guess {guess} repeats a digit; this game uses 4 distinct digits")]
    DuplicateDigits {
        /// The rejected guess.
        guess: Code,
    },
    /// A no-repeat session was given a secret with repeated digits.
    #[display("Secret repeats a digit but the game forbids repeats")]
    RepeatedSecret,
    /// No session with this id.
    #[display("Game {id} does not exist, please start a new game")]
    NotFound {
        /// The id that was looked up.
        id: GameId,
    },
    /// The session was already won.
    #[display("Game {id} is already finished, please start a new game")]
    Completed {
        /// The finished session.
        id: GameId,
    },
    /// A session lock was poisoned by a panicking thread.
    #[display("Session store lock poisoned")]
    Poisoned,
}

/// Result of a scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    /// A/B counts.
    pub score: Score,
    /// True when this guess matched the secret.
    pub is_win: bool,
    /// Attempts so far, including this one.
    pub attempt_count: usize,
    /// The secret, revealed only on a win.
    pub secret: Option<Code>,
}

/// Read-only copy of a session's public state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Session id.
    pub id: GameId,
    /// Attempts in submission order.
    pub attempts: Vec<Attempt>,
    /// True once the secret was guessed.
    pub is_completed: bool,
    /// Whether the secret may repeat digits.
    pub allow_repeats: bool,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Number of attempts made.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}

/// A single game: a fixed secret and the guesses made against it.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: GameId,
    secret: Code,
    allow_repeats: bool,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    attempts: Vec<Attempt>,
    completed: bool,
}

impl GameSession {
    /// Creates a new game session around `secret`.
    #[instrument(skip(secret))]
    pub fn new(id: GameId, secret: Code, allow_repeats: bool) -> Self {
        let now = Utc::now();
        Self {
            id,
            secret,
            allow_repeats,
            started_at: now,
            last_activity: now,
            attempts: Vec::new(),
            completed: false,
        }
    }

    /// Session id.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// True once the secret was guessed.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Attempts in submission order.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Scores a guess and records it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Completed`] for a finished session and
    /// [`SessionError::DuplicateDigits`] when the session forbids repeats and
    /// the guess has some.
    #[instrument(skip(self, guess), fields(session_id = self.id, guess = %guess))]
    pub fn guess(&mut self, guess: Code) -> Result<GuessOutcome, SessionError> {
        if self.completed {
            warn!("Guess against finished session");
            return Err(SessionError::Completed { id: self.id });
        }
        if !self.allow_repeats && guess.has_duplicate_digits() {
            warn!("Guess repeats a digit in a no-repeat session");
            return Err(SessionError::DuplicateDigits { guess });
        }

        let result = score(&self.secret, &guess);
        let now = Utc::now();
        self.attempts.push(Attempt {
            guess,
            score: result,
            time: now,
        });
        self.last_activity = now;

        let is_win = result.is_win();
        if is_win {
            self.completed = true;
            info!(attempts = self.attempts.len(), "Secret guessed");
        } else {
            debug!(%result, attempts = self.attempts.len(), "Guess scored");
        }

        Ok(GuessOutcome {
            score: result,
            is_win,
            attempt_count: self.attempts.len(),
            secret: is_win.then_some(self.secret),
        })
    }

    /// Copies out the public state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            attempts: self.attempts.clone(),
            is_completed: self.completed,
            allow_repeats: self.allow_repeats,
            started_at: self.started_at,
        }
    }
}

type SharedSession = Arc<Mutex<GameSession>>;

/// Manages all game sessions.
///
/// Cloning yields another handle to the same store. Each session sits
/// behind its own mutex, so guesses against one session are serialized
/// while different sessions proceed independently.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<GameId, SharedSession>>>,
    next_id: Arc<AtomicU64>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Creates a session with a freshly generated secret.
    #[instrument(skip(self))]
    pub fn create_session(&self, allow_repeats: bool) -> Result<GameId, SessionError> {
        self.create_session_with_secret(generate_secret(allow_repeats), allow_repeats)
    }

    /// Creates a session around a known secret.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RepeatedSecret`] when `allow_repeats` is false
    /// and the secret repeats a digit, since no legal guess could win.
    #[instrument(skip(self, secret))]
    pub fn create_session_with_secret(
        &self,
        secret: Code,
        allow_repeats: bool,
    ) -> Result<GameId, SessionError> {
        if !allow_repeats && secret.has_duplicate_digits() {
            warn!("Rejected repeating secret for a no-repeat session");
            return Err(SessionError::RepeatedSecret);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = GameSession::new(id, secret, allow_repeats);

        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.insert(id, Arc::new(Mutex::new(session)));

        info!(session_id = id, allow_repeats, "Created new session");
        trace!(session_id = id, %secret, "Session secret");
        Ok(id)
    }

    fn handle(&self, id: GameId) -> Result<SharedSession, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        sessions.get(&id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound { id }
        })
    }

    /// Validates a raw guess and scores it against session `id`.
    ///
    /// # Errors
    ///
    /// Input errors ([`SessionError::EmptyGuess`],
    /// [`SessionError::InvalidCode`]) are reported before the session is
    /// looked up; see [`GameSession::guess`] for the rest.
    #[instrument(skip(self))]
    pub fn submit_guess(&self, id: GameId, raw_guess: &str) -> Result<GuessOutcome, SessionError> {
        if raw_guess.is_empty() {
            return Err(SessionError::EmptyGuess);
        }
        let guess =
            Code::parse(raw_guess).map_err(|source| SessionError::InvalidCode { source })?;

        let session = self.handle(id)?;
        let mut session = session.lock().map_err(|_| SessionError::Poisoned)?;
        session.guess(guess)
    }

    /// Gets a copy of session `id`.
    #[instrument(skip(self))]
    pub fn history(&self, id: GameId) -> Result<SessionSnapshot, SessionError> {
        let session = self.handle(id)?;
        let session = session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(session.snapshot())
    }

    /// Lists all session ids in ascending order.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Result<Vec<GameId>, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        let mut ids: Vec<_> = sessions.keys().copied().collect();
        ids.sort_unstable();
        debug!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True when no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops sessions with no activity for at least `max_idle`.
    ///
    /// Returns the number removed. A session whose lock is poisoned counts
    /// as idle.
    #[instrument(skip(self))]
    pub fn prune_idle(&self, max_idle: Duration) -> Result<usize, SessionError> {
        let max_idle = TimeDelta::from_std(max_idle).unwrap_or(TimeDelta::MAX);
        let now = Utc::now();

        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, session| match session.lock() {
            Ok(s) => now - s.last_activity < max_idle,
            Err(_) => false,
        });
        let removed = before - sessions.len();

        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Pruned idle sessions");
        }
        Ok(removed)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
