//! Random expression generation and mutation.
//!
//! All randomness is drawn from a caller-supplied [`Rng`], and all dataset
//! access goes through a [`MutationContext`], so a seeded generator
//! reproduces the same sequence of trees.
//!
//! # Mutation Rules
//!
//! - **Literal**: with `p_change`, add a uniform delta in `[-max_delta, max_delta]`.
//! - **Input**: with `p_change`, pick another input field uniformly.
//! - **Binary**: with `p_take_child`, collapse into one of the two children.
//!   Otherwise, with `p_change_op` pick a new operator, then each child is
//!   independently either regenerated (`p_change_type`) or mutated recursively.
//! - **Grow**: after a leaf or binary node is rewritten, with `p_add` it is
//!   wrapped into a new binary node whose other operand is a fresh subtree.
//!
//! Collapsing and growing are the only ways a tree changes size.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Dataset, Expr};

/// Invalid [`MutationParams`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    #[display("probability `{name}` must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[display("`max_delta` must be positive and finite, got {value}")]
    MaxDelta { value: f64 },
    #[display("weight `{name}` must be non-negative and finite, got {value}")]
    Weight { name: &'static str, value: f64 },
    #[display("`weight_literal` and `weight_input` must not both be zero")]
    NoLeafWeight,
}

/// Probabilities and ranges that drive mutation.
///
/// Every field has a default, so a partial configuration file only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutationParams {
    /// Chance of wrapping a rewritten node into a new binary node.
    pub p_add: f64,
    /// Chance of changing a literal's value or an input's field.
    pub p_change: f64,
    /// Chance of picking a new operator for a binary node.
    pub p_change_op: f64,
    /// Chance of regenerating a child (or the whole formula) from scratch.
    pub p_change_type: f64,
    /// Chance of collapsing a binary node into one of its children.
    pub p_take_child: f64,
    /// Bound of the uniform delta added to literals.
    pub max_delta: f64,
    /// Relative weight of literals in freshly generated subtrees.
    pub weight_literal: f64,
    /// Relative weight of input references in freshly generated subtrees.
    pub weight_input: f64,
    /// Relative weight of binary nodes in freshly generated subtrees.
    pub weight_binary: f64,
    /// Depth at which fresh subtree generation stops producing binary nodes.
    pub max_generate_depth: usize,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            p_add: 0.02,
            p_change: 0.05,
            p_change_op: 0.01,
            p_change_type: 0.01,
            p_take_child: 0.01,
            max_delta: 100.0,
            weight_literal: 0.40,
            weight_input: 0.50,
            weight_binary: 0.10,
            max_generate_depth: 8,
        }
    }
}

impl MutationParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        let probabilities = [
            ("p_add", self.p_add),
            ("p_change", self.p_change),
            ("p_change_op", self.p_change_op),
            ("p_change_type", self.p_change_type),
            ("p_take_child", self.p_take_child),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::Probability { name, value });
            }
        }

        if !self.max_delta.is_finite() || self.max_delta <= 0.0 {
            return Err(ParamsError::MaxDelta {
                value: self.max_delta,
            });
        }

        let weights = [
            ("weight_literal", self.weight_literal),
            ("weight_input", self.weight_input),
            ("weight_binary", self.weight_binary),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::Weight { name, value });
            }
        }
        if self.weight_literal + self.weight_input <= 0.0 {
            return Err(ParamsError::NoLeafWeight);
        }
        Ok(())
    }
}

/// Read-only state shared by every generation and mutation step.
#[derive(Debug, Clone, Copy)]
pub struct MutationContext<'a> {
    dataset: &'a Dataset,
    params: &'a MutationParams,
}

impl<'a> MutationContext<'a> {
    /// Creates a context after validating `params`.
    pub fn new(dataset: &'a Dataset, params: &'a MutationParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { dataset, params })
    }

    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    #[must_use]
    pub fn params(&self) -> &'a MutationParams {
        self.params
    }

    /// Samples a literal delta uniformly from `[-max_delta, max_delta]`.
    pub fn random_delta<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        let max = self.params.max_delta;
        rng.random_range(-max..=max)
    }

    /// Picks an input field name uniformly. Never returns the target.
    pub fn random_input<R>(&self, rng: &mut R) -> String
    where
        R: Rng + ?Sized,
    {
        let inputs = self.dataset.inputs();
        inputs[rng.random_range(0..inputs.len())].clone()
    }

    /// Generates a fresh random subtree.
    pub fn random_expr<R>(&self, rng: &mut R) -> Expr
    where
        R: Rng + ?Sized,
    {
        self.random_expr_at(rng, 1)
    }

    fn random_expr_at<R>(&self, rng: &mut R, depth: usize) -> Expr
    where
        R: Rng + ?Sized,
    {
        let params = self.params;
        let leaf_weight = params.weight_literal + params.weight_input;
        let total = if depth < params.max_generate_depth {
            leaf_weight + params.weight_binary
        } else {
            leaf_weight
        };

        let r = rng.random_range(0.0..total);
        if r < params.weight_literal {
            Expr::literal(self.random_delta(rng))
        } else if r < leaf_weight {
            Expr::input(self.random_input(rng))
        } else {
            let op = rng.random();
            let left = self.random_expr_at(rng, depth + 1);
            let right = self.random_expr_at(rng, depth + 1);
            Expr::guarded_binary(op, left, right)
        }
    }

    /// With probability `p_add`, wraps `expr` into a new binary node.
    ///
    /// The operator is random, `expr` goes on a random side, and the other
    /// side is a fresh subtree.
    pub fn maybe_wrap<R>(&self, expr: Expr, rng: &mut R) -> Expr
    where
        R: Rng + ?Sized,
    {
        if !rng.random_bool(self.params.p_add) {
            return expr;
        }
        let op = rng.random();
        let fresh = self.random_expr(rng);
        if rng.random_bool(0.5) {
            Expr::guarded_binary(op, expr, fresh)
        } else {
            Expr::guarded_binary(op, fresh, expr)
        }
    }

    fn mutate_child<R>(&self, child: Expr, rng: &mut R) -> Expr
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(self.params.p_change_type) {
            self.random_expr(rng)
        } else {
            child.mutate(self, rng)
        }
    }
}

impl Expr {
    /// Consumes the tree and returns a mutated one.
    ///
    /// The result may be a different variant than `self`: binary nodes can
    /// collapse into a child and any node can be wrapped into a new binary
    /// node. See the [module documentation](self) for the rules.
    #[must_use]
    pub fn mutate<R>(self, ctx: &MutationContext<'_>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let params = ctx.params();
        let rewritten = match self {
            Self::Literal { value } => {
                if rng.random_bool(params.p_change) {
                    Self::literal(value + ctx.random_delta(rng))
                } else {
                    Self::Literal { value }
                }
            }
            Self::Input { name } => {
                if rng.random_bool(params.p_change) {
                    Self::input(ctx.random_input(rng))
                } else {
                    Self::Input { name }
                }
            }
            Self::Binary { op, left, right } => {
                if rng.random_bool(params.p_take_child) {
                    return if rng.random_bool(0.5) { *left } else { *right };
                }
                let op = if rng.random_bool(params.p_change_op) {
                    rng.random()
                } else {
                    op
                };
                let left = ctx.mutate_child(*left, rng);
                let right = ctx.mutate_child(*right, rng);
                Self::guarded_binary(op, left, right)
            }
        };
        ctx.maybe_wrap(rewritten, rng)
    }
}
