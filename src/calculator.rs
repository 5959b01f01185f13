//! Decimal arithmetic behind the calculator endpoints.

use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};
use tracing::{debug, instrument};

/// A binary arithmetic operation, addressed by its lowercase name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
}

/// Why a calculation produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum CalcError {
    /// Second operand of a division was zero.
    #[display("Cannot divide by zero")]
    DivideByZero,
    /// The result does not fit in a decimal.
    #[display("The result of {operation} is out of range")]
    Overflow {
        /// Operation that overflowed.
        operation: Operation,
    },
}

impl Operation {
    /// Human-readable name of the operation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
        }
    }

    /// Applies the operation to `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] when dividing by zero and
    /// [`CalcError::Overflow`] when the result is not representable.
    #[instrument]
    pub fn apply(self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        if self == Self::Divide && b.is_zero() {
            debug!("Division by zero rejected");
            return Err(CalcError::DivideByZero);
        }

        let result = match self {
            Self::Add => a.checked_add(b),
            Self::Subtract => a.checked_sub(b),
            Self::Multiply => a.checked_mul(b),
            Self::Divide => a.checked_div(b),
        };
        result
            .map(|r| r.normalize())
            .ok_or(CalcError::Overflow { operation: self })
    }
}
