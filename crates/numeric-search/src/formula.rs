//! Search candidates.

use std::{fmt, mem};

use numeric_expr::{Dataset, Expr, MutationContext, ValidationError, fitness};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A search candidate owning exactly one expression tree.
///
/// Cloning a formula deep-copies its tree, so mutating a clone never affects
/// the original.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Formula {
    root: Expr,
}

impl From<Expr> for Formula {
    fn from(root: Expr) -> Self {
        Self::new(root)
    }
}

impl Formula {
    #[must_use]
    pub fn new(root: Expr) -> Self {
        Self { root }
    }

    /// Creates a formula with a freshly generated random tree.
    pub fn random<R>(ctx: &MutationContext<'_>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(ctx.random_expr(rng))
    }

    #[must_use]
    pub fn root(&self) -> &Expr {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Expr {
        self.root
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Summed absolute error over `dataset`; see [`numeric_expr::fitness()`].
    #[must_use]
    pub fn fitness(&self, dataset: &Dataset) -> f64 {
        fitness(&self.root, dataset)
    }

    pub fn validate(&self, dataset: &Dataset) -> Result<(), ValidationError> {
        self.root.validate(dataset)
    }

    /// Mutates the formula in place.
    ///
    /// With probability `p_change_type` the whole tree is replaced by a fresh
    /// random one; otherwise the root is mutated with [`Expr::mutate`].
    pub fn mutate<R>(&mut self, ctx: &MutationContext<'_>, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(ctx.params().p_change_type) {
            self.root = ctx.random_expr(rng);
        } else {
            let root = mem::replace(&mut self.root, Expr::literal(0.0));
            self.root = root.mutate(ctx, rng);
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
