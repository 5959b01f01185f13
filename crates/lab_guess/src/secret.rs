//! Random secret generation.

use crate::code::{CODE_LEN, Code};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{instrument, trace};

/// Generates a secret using the thread-local RNG.
///
/// With `allow_repeats` each digit is drawn independently from `0..=9`;
/// otherwise the four digits are guaranteed distinct.
#[instrument]
pub fn generate_secret(allow_repeats: bool) -> Code {
    generate_secret_with(&mut rand::rng(), allow_repeats)
}

/// Generates a secret from the supplied RNG.
pub fn generate_secret_with<R: Rng + ?Sized>(rng: &mut R, allow_repeats: bool) -> Code {
    let digits: [u8; CODE_LEN] = if allow_repeats {
        std::array::from_fn(|_| rng.random_range(0..10u8))
    } else {
        // Shuffle-and-take: sampling without replacement.
        let mut pool: [u8; 10] = std::array::from_fn(|i| i as u8);
        pool.shuffle(rng);
        std::array::from_fn(|i| pool[i])
    };

    trace!(allow_repeats, "Generated secret");
    Code::new_unchecked(digits)
}
