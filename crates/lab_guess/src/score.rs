//! A/B scoring of a guess against a secret.

use crate::code::Code;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Match quality of one guess.
///
/// Serialized with the game's own notation: `{"a": 1, "b": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[display("{exact}A{partial}B")]
pub struct Score {
    /// Digits in the right position.
    #[serde(rename = "a")]
    pub exact: u8,
    /// Right digits in the wrong, still-unmatched position.
    #[serde(rename = "b")]
    pub partial: u8,
}

impl Score {
    /// Returns true when every position matched.
    pub fn is_win(&self) -> bool {
        usize::from(self.exact) == crate::CODE_LEN
    }
}

/// Scores `guess` against `secret`.
///
/// Positions that match exactly are removed first; the remaining digits on
/// each side are tallied and every digit value contributes the smaller of
/// its two tallies to `partial`. This keeps `exact + partial <= 4` even
/// when digits repeat.
pub fn score(secret: &Code, guess: &Code) -> Score {
    let mut exact = 0u8;
    let mut secret_left = [0u8; 10];
    let mut guess_left = [0u8; 10];

    for (s, g) in secret.digits().into_iter().zip(guess.digits()) {
        if s == g {
            exact += 1;
        } else {
            secret_left[usize::from(s)] += 1;
            guess_left[usize::from(g)] += 1;
        }
    }

    let partial = secret_left
        .iter()
        .zip(&guess_left)
        .map(|(s, g)| *s.min(g))
        .sum();

    Score { exact, partial }
}
