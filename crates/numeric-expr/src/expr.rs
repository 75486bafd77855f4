use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Dataset, EvalError, Operator, Record, clamp_divisor};

/// Errors found when checking an expression against a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("expression references target field `{name}`")]
    TargetReference { name: String },
    #[display("expression references unknown field `{name}`")]
    UnknownInput { name: String },
}

/// Arithmetic expression tree.
///
/// Every node exclusively owns its children, so [`Clone`] is a deep copy and
/// mutation (see [`Expr::mutate`]) consumes a tree and returns a new one.
///
/// # Serialization
///
/// Nodes are tagged with their variant so a tree can be reconstructed exactly:
///
/// ```
/// use numeric_expr::{Expr, Operator};
///
/// let expr = Expr::binary(Operator::Add, Expr::input("first"), Expr::literal(16.0));
/// let json = serde_json::to_string(&expr).unwrap();
/// assert_eq!(
///     json,
///     r#"{"type":"binary","op":"add","left":{"type":"input","name":"first"},"right":{"type":"literal","value":16.0}}"#,
/// );
/// assert_eq!(serde_json::from_str::<Expr>(&json).unwrap(), expr);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_more::IsVariant)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    /// Numeric constant.
    Literal { value: f64 },
    /// Reference to a non-target field of the current record.
    Input { name: String },
    /// Operator applied to two sub-expressions.
    Binary {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    #[must_use]
    pub fn literal(value: f64) -> Self {
        Self::Literal { value }
    }

    #[must_use]
    pub fn input<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self::Input { name: name.into() }
    }

    #[must_use]
    pub fn binary(op: Operator, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Like [`Self::binary`], but keeps literal operands of `*` and `/` out of
    /// the `(-1, 1)` band.
    ///
    /// Literal operands with magnitude below [`CLAMP`](crate::CLAMP) are
    /// snapped to `±CLAMP` keeping their sign; zero becomes `+CLAMP`.
    #[must_use]
    pub fn guarded_binary(op: Operator, left: Self, right: Self) -> Self {
        if op.is_multiplicative() {
            Self::binary(op, left.snap_literal(), right.snap_literal())
        } else {
            Self::binary(op, left, right)
        }
    }

    fn snap_literal(self) -> Self {
        match self {
            Self::Literal { value } => Self::Literal {
                value: clamp_divisor(value),
            },
            other => other,
        }
    }

    /// Evaluates the expression against one record.
    ///
    /// Inputs missing from the record read as `0.0`. Division clamps its
    /// divisor (see [`Operator::apply`]), so only non-finite intermediate
    /// values are errors.
    pub fn evaluate(&self, record: &Record) -> Result<f64, EvalError> {
        match self {
            Self::Literal { value } => {
                if value.is_finite() {
                    Ok(*value)
                } else {
                    Err(EvalError::NonFiniteLiteral)
                }
            }
            Self::Input { name } => Ok(record.get(name)),
            Self::Binary { op, left, right } => {
                let lhs = left.evaluate(record)?;
                let rhs = right.evaluate(record)?;
                op.apply(lhs, rhs)
            }
        }
    }

    /// Number of nodes in the tree.
    ///
    /// Leaves count 1 and a binary node counts 1 plus the size of both
    /// children.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Literal { .. } | Self::Input { .. } => 1,
            Self::Binary { left, right, .. } => 1 + left.size() + right.size(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Literal { .. } | Self::Input { .. } => 1,
            Self::Binary { left, right, .. } => 1 + usize::max(left.depth(), right.depth()),
        }
    }

    /// Checks that every input reference names an input field of `dataset`.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ValidationError> {
        match self {
            Self::Literal { .. } => Ok(()),
            Self::Input { name } => {
                if name == dataset.target() {
                    Err(ValidationError::TargetReference { name: name.clone() })
                } else if !dataset.is_input(name) {
                    Err(ValidationError::UnknownInput { name: name.clone() })
                } else {
                    Ok(())
                }
            }
            Self::Binary { left, right, .. } => {
                left.validate(dataset)?;
                right.validate(dataset)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => write!(f, "{value}"),
            Self::Input { name } => write!(f, "{{{name}}}"),
            Self::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
