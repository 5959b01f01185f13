//! Four-digit codes used as secrets and guesses.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Number of digits in every code.
pub const CODE_LEN: usize = 4;

/// An ordered sequence of exactly [`CODE_LEN`] decimal digits.
///
/// Serializes as its digit string (`"0427"`), so leading zeros survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code([u8; CODE_LEN]);

/// Reasons a string is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CodeError {
    /// Input did not have exactly four characters.
    #[display("expected 4 digits, got {found} characters")]
    Length {
        /// Number of characters actually supplied.
        found: usize,
    },
    /// Input contained something other than `0`-`9`.
    #[display("'{found}' is not a decimal digit")]
    NonDigit {
        /// The offending character.
        found: char,
    },
    /// A digit value above 9 was supplied to [`Code::from_digits`].
    #[display("digit value {value} is out of range")]
    OutOfRange {
        /// The offending value.
        value: u8,
    },
}

impl Code {
    /// Parses a code, accepting exactly what `^\d{4}$` accepts for ASCII input.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Length`] when the input is not four characters
    /// long and [`CodeError::NonDigit`] when any character is not `0`-`9`.
    #[instrument(level = "trace")]
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let found = input.chars().count();
        if found != CODE_LEN {
            return Err(CodeError::Length { found });
        }

        let mut digits = [0u8; CODE_LEN];
        for (slot, c) in digits.iter_mut().zip(input.chars()) {
            match c.to_digit(10) {
                Some(v) => *slot = v as u8,
                None => return Err(CodeError::NonDigit { found: c }),
            }
        }
        Ok(Self(digits))
    }

    /// Builds a code from raw digit values.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::OutOfRange`] if any value exceeds 9.
    pub fn from_digits(digits: [u8; CODE_LEN]) -> Result<Self, CodeError> {
        match digits.iter().find(|d| **d > 9) {
            Some(&value) => Err(CodeError::OutOfRange { value }),
            None => Ok(Self(digits)),
        }
    }

    /// Caller guarantees every digit is in `0..=9`.
    pub(crate) const fn new_unchecked(digits: [u8; CODE_LEN]) -> Self {
        Self(digits)
    }

    /// Returns the digit values in order.
    pub fn digits(&self) -> [u8; CODE_LEN] {
        self.0
    }

    /// Returns true if any digit value appears more than once.
    pub fn has_duplicate_digits(&self) -> bool {
        let mut seen = [false; 10];
        for &d in &self.0 {
            let slot = &mut seen[usize::from(d)];
            if *slot {
                return true;
            }
            *slot = true;
        }
        false
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}
