//! Pure scoring logic for the four-digit A/B guessing game.
//!
//! A secret [`Code`] of four decimal digits is compared against a guess and
//! the result is reported as a [`Score`]: `A` counts digits in the right
//! position, `B` counts right digits in the wrong position.
//!
//! # Example
//!
//! ```
//! use lab_guess::{Code, score};
//!
//! let secret = Code::parse("1122").unwrap();
//! let guess = Code::parse("1234").unwrap();
//! let result = score(&secret, &guess);
//! assert_eq!(result.to_string(), "1A1B");
//! ```
//!
//! Nothing in this crate performs I/O or holds state; every function is safe
//! to call from any number of threads.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod code;
mod score;
mod secret;

pub use code::{CODE_LEN, Code, CodeError};
pub use score::{Score, score};
pub use secret::{generate_secret, generate_secret_with};
