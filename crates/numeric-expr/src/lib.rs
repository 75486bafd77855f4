//! Expression trees for symbolic regression.
//!
//! This crate holds the data model searched by `numeric-search`:
//!
//! - [`Dataset`] / [`Record`] - example records with a designated target field
//! - [`Expr`] - arithmetic expression tree over literals and input fields
//! - [`MutationContext`] - random generation and mutation of trees
//! - [`fitness()`] - summed absolute error of a tree over a dataset
//!
//! # Example
//!
//! ```
//! use numeric_expr::{Dataset, Expr, MutationContext, MutationParams, Operator, Record, fitness};
//! use rand::SeedableRng as _;
//!
//! let records: Vec<Record> = vec![
//!     [("x", 1.0), ("y", 3.0)].into_iter().collect(),
//!     [("x", 2.0), ("y", 5.0)].into_iter().collect(),
//! ];
//! let dataset = Dataset::new("y", records).unwrap();
//!
//! let expr = Expr::binary(Operator::Add, Expr::input("x"), Expr::literal(2.0));
//! assert_eq!(expr.to_string(), "({x} + 2)");
//! assert_eq!(fitness(&expr, &dataset), 1.0);
//!
//! let params = MutationParams::default();
//! let ctx = MutationContext::new(&dataset, &params).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mutated = expr.clone().mutate(&ctx, &mut rng);
//! assert!(mutated.validate(&dataset).is_ok());
//! ```

pub use self::{dataset::*, expr::*, fitness::*, mutation::*, operator::*};

pub mod dataset;
pub mod expr;
pub mod fitness;
pub mod mutation;
pub mod operator;

/// Arithmetic failure while evaluating an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvalError {
    #[display("literal is not a finite number")]
    NonFiniteLiteral,
    #[display("`{op}` produced a non-finite value")]
    Overflow { op: Operator },
    #[display("summed error is not a finite number")]
    ErrorOverflow,
}
