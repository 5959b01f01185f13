//! Tests for A/B scoring.

use lab_guess::{Code, Score, score};
use proptest::prelude::*;

fn code(s: &str) -> Code {
    Code::parse(s).expect("valid code")
}

fn ab(secret: &str, guess: &str) -> (u8, u8) {
    let result = score(&code(secret), &code(guess));
    (result.exact, result.partial)
}

#[test]
fn test_identical_codes_score_four_a() {
    assert_eq!(ab("1234", "1234"), (4, 0));
}

#[test]
fn test_reversed_codes_score_four_b() {
    assert_eq!(ab("1234", "4321"), (0, 4));
}

#[test]
fn test_repeated_secret_digits_counted_once_per_guess_digit() {
    assert_eq!(ab("1122", "1234"), (1, 1));
}

#[test]
fn test_matched_positions_are_not_reused_for_partial() {
    assert_eq!(ab("0000", "0011"), (2, 0));
}

#[test]
fn test_no_common_digits() {
    assert_eq!(ab("1234", "5678"), (0, 0));
}

#[test]
fn test_repeated_guess_digits_limited_by_secret() {
    // Only one leftover 1 in the secret, so only one B.
    assert_eq!(ab("1203", "4111"), (0, 1));
}

#[test]
fn test_score_display() {
    let s = Score {
        exact: 1,
        partial: 2,
    };
    assert_eq!(s.to_string(), "1A2B");
    assert!(!s.is_win());
    assert!(
        Score {
            exact: 4,
            partial: 0
        }
        .is_win()
    );
}

#[test]
fn test_score_serializes_as_a_and_b() {
    let json = serde_json::to_value(score(&code("1234"), &code("1243"))).expect("serialize");
    assert_eq!(json, serde_json::json!({ "a": 2, "b": 2 }));
}

fn any_code() -> impl Strategy<Value = Code> {
    prop::array::uniform4(0u8..10).prop_map(|d| Code::from_digits(d).expect("digits in range"))
}

fn distinct_code() -> impl Strategy<Value = Code> {
    Just((0u8..10).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|v| Code::from_digits([v[0], v[1], v[2], v[3]]).expect("digits in range"))
}

proptest! {
    #[test]
    fn prop_counts_are_bounded(s in any_code(), g in any_code()) {
        let r = score(&s, &g);
        prop_assert!(r.exact <= 4);
        prop_assert!(r.partial <= 4 - r.exact);
    }

    #[test]
    fn prop_self_score_is_win(s in any_code()) {
        let r = score(&s, &s);
        prop_assert_eq!((r.exact, r.partial), (4, 0));
    }

    #[test]
    fn prop_win_iff_equal(s in any_code(), g in any_code()) {
        prop_assert_eq!(score(&s, &g).is_win(), s == g);
    }

    #[test]
    fn prop_distinct_codes_score_symmetrically(s in distinct_code(), g in distinct_code()) {
        prop_assert_eq!(score(&s, &g), score(&g, &s));
    }
}
