use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::EvalError;

/// Smallest divisor magnitude allowed by [`Operator::Divide`].
///
/// Divisors whose absolute value is below this threshold are snapped to
/// `±CLAMP`, keeping their sign (zero snaps to `+CLAMP`).
pub const CLAMP: f64 = 1.0;

/// Snaps `value` to `±CLAMP` when its magnitude is below [`CLAMP`].
///
/// # Examples
///
/// ```
/// use numeric_expr::clamp_divisor;
///
/// assert_eq!(clamp_divisor(0.3), 1.0);
/// assert_eq!(clamp_divisor(-0.3), -1.0);
/// assert_eq!(clamp_divisor(0.0), 1.0);
/// assert_eq!(clamp_divisor(-4.0), -4.0);
/// ```
#[must_use]
pub fn clamp_divisor(value: f64) -> f64 {
    if value.abs() < CLAMP {
        if value < 0.0 { -CLAMP } else { CLAMP }
    } else {
        value
    }
}

/// Binary arithmetic operator of an expression node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Operator {
    #[display("+")]
    Add = 0,
    #[display("-")]
    Subtract = 1,
    #[display("*")]
    Multiply = 2,
    #[display("/")]
    Divide = 3,
}

impl Distribution<Operator> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Operator {
        match rng.random_range(0..Operator::LEN) {
            0 => Operator::Add,
            1 => Operator::Subtract,
            2 => Operator::Multiply,
            _ => Operator::Divide,
        }
    }
}

impl Operator {
    /// Number of operators (4).
    pub const LEN: usize = 4;

    pub const ALL: [Self; Self::LEN] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
    ];

    /// Returns `true` for operators whose literal operands are kept away from
    /// the `(-1, 1)` band.
    ///
    /// A literal factor or divisor inside that band either collapses the
    /// product towards zero or gets clamped anyway, so mutation snaps it out.
    #[must_use]
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }

    /// Applies the operator to two operands.
    ///
    /// The right operand of [`Operator::Divide`] is clamped with
    /// [`clamp_divisor`] first. A non-finite result is reported as
    /// [`EvalError::Overflow`].
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / clamp_divisor(rhs),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::Overflow { op: self })
        }
    }
}
