//! Tests for guessing-game session management.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lab_apis::{SessionError, SessionManager};
use lab_guess::Code;

fn code(s: &str) -> Code {
    Code::parse(s).expect("Fixture code should parse")
}

#[test]
fn test_ids_start_at_one_and_increase() {
    let manager = SessionManager::new();
    let first = manager.create_session(true).expect("Create failed");
    let second = manager.create_session(false).expect("Create failed");
    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(manager.list_sessions().expect("List failed"), vec![1, 2]);
    assert_eq!(manager.len(), 2);
}

#[test]
fn test_guess_scores_and_records() {
    let manager = SessionManager::new();
    let id = manager
        .create_session_with_secret(code("1234"), false)
        .expect("Create failed");

    let outcome = manager.submit_guess(id, "1243").expect("Guess failed");
    assert_eq!((outcome.score.exact, outcome.score.partial), (2, 2));
    assert!(!outcome.is_win);
    assert_eq!(outcome.attempt_count, 1);
    assert!(outcome.secret.is_none());

    let snapshot = manager.history(id).expect("History failed");
    assert_eq!(snapshot.attempt_count(), 1);
    assert_eq!(snapshot.attempts[0].guess, code("1243"));
    assert!(!snapshot.is_completed);
}

#[test]
fn test_win_reveals_secret_and_completes() {
    let manager = SessionManager::new();
    let id = manager
        .create_session_with_secret(code("0917"), true)
        .expect("Create failed");

    manager.submit_guess(id, "0000").expect("Guess failed");
    let outcome = manager.submit_guess(id, "0917").expect("Guess failed");
    assert!(outcome.is_win);
    assert_eq!(outcome.attempt_count, 2);
    assert_eq!(outcome.secret, Some(code("0917")));

    let err = manager.submit_guess(id, "1111").expect_err("Finished game accepted a guess");
    assert_eq!(err, SessionError::Completed { id });
    assert_eq!(manager.history(id).expect("History failed").attempt_count(), 2);
}

#[test]
fn test_input_errors_come_before_lookup() {
    let manager = SessionManager::new();
    assert_eq!(
        manager.submit_guess(99, "").expect_err("Empty accepted"),
        SessionError::EmptyGuess
    );
    assert!(matches!(
        manager.submit_guess(99, "12a4").expect_err("Letters accepted"),
        SessionError::InvalidCode { .. }
    ));
    assert!(matches!(
        manager.submit_guess(99, "12345").expect_err("Five digits accepted"),
        SessionError::InvalidCode { .. }
    ));
    assert_eq!(
        manager.submit_guess(99, "1234").expect_err("Unknown game accepted"),
        SessionError::NotFound { id: 99 }
    );
}

#[test]
fn test_no_repeat_session_rejects_duplicate_digits() {
    let manager = SessionManager::new();
    let strict = manager
        .create_session_with_secret(code("1234"), false)
        .expect("Create failed");
    let relaxed = manager
        .create_session_with_secret(code("1123"), true)
        .expect("Create failed");

    assert!(matches!(
        manager.submit_guess(strict, "1123"),
        Err(SessionError::DuplicateDigits { .. })
    ));
    assert_eq!(manager.history(strict).expect("History failed").attempt_count(), 0);

    let outcome = manager.submit_guess(relaxed, "1123").expect("Guess failed");
    assert!(outcome.is_win);
}

#[test]
fn test_session_records_repetition_rule() {
    let manager = SessionManager::new();
    let strict = manager.create_session(false).expect("Create failed");
    let relaxed = manager.create_session(true).expect("Create failed");
    assert!(!manager.history(strict).expect("History failed").allow_repeats);
    assert!(manager.history(relaxed).expect("History failed").allow_repeats);
}

#[test]
fn test_no_repeat_session_rejects_repeating_secret() {
    let manager = SessionManager::new();
    assert_eq!(
        manager
            .create_session_with_secret(code("1123"), false)
            .expect_err("Unwinnable session created"),
        SessionError::RepeatedSecret
    );
    assert!(manager.is_empty());
}

#[test]
fn test_concurrent_guesses_never_lose_attempts() {
    let manager = Arc::new(SessionManager::new());
    let id = manager
        .create_session_with_secret(code("9876"), false)
        .expect("Create failed");

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..25 {
                    manager.submit_guess(id, "1234").expect("Guess failed");
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().expect("Thread panicked");
    }

    let snapshot = manager.history(id).expect("History failed");
    assert_eq!(snapshot.attempt_count(), 200);
}

#[test]
fn test_concurrent_winning_guesses_complete_once() {
    let manager = Arc::new(SessionManager::new());
    let id = manager
        .create_session_with_secret(code("2468"), false)
        .expect("Create failed");

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || manager.submit_guess(id, "2468").is_ok())
        })
        .collect();
    let wins = threads
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .filter(|won| *won)
        .count();

    assert_eq!(wins, 1);
    assert_eq!(manager.history(id).expect("History failed").attempt_count(), 1);
}

#[test]
fn test_prune_idle() {
    let manager = SessionManager::new();
    manager.create_session(true).expect("Create failed");
    manager.create_session(true).expect("Create failed");

    assert_eq!(manager.prune_idle(Duration::from_secs(3600)).expect("Prune failed"), 0);
    assert_eq!(manager.len(), 2);

    assert_eq!(manager.prune_idle(Duration::ZERO).expect("Prune failed"), 2);
    assert!(manager.is_empty());
}

#[test]
fn test_clones_share_sessions() {
    let manager = SessionManager::new();
    let handle = manager.clone();
    let id = handle.create_session(true).expect("Create failed");
    assert!(manager.history(id).is_ok());
}
