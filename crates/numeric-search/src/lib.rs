//! Hill-climbing search for formulas that fit a dataset.
//!
//! This crate drives the expression trees of `numeric-expr` through a
//! single-candidate stochastic hill climb.
//!
//! # How the Search Works
//!
//! 1. **Start** - Begin from a saved [`Formula`](formula::Formula) or a random one
//! 2. **Clone** - Deep-copy the current best formula
//! 3. **Mutate** - Rewrite the copy (value tweak, operator change, grow, collapse)
//! 4. **Score** - Sum the absolute prediction error over every record
//! 5. **Accept** - Keep the copy if it scores lower, or scores the same with fewer nodes
//! 6. **Repeat** - Until the cancellation source asks to stop
//!
//! # Architecture
//!
//! ```text
//! Solver (solver)
//!     ↓ clones and mutates
//! Formula (formula)
//!     ↓ wraps
//! Expr + MutationContext (numeric-expr)
//!     ↓ scored against
//! Dataset (numeric-expr)
//! ```
//!
//! There is no population and no crossover: the solver holds exactly one
//! candidate at a time, and every generation is a clone-mutate-compare of it.
//!
//! # Determinism
//!
//! The solver owns the random number generator it is given. Seeding it (e.g.
//! with `rand_pcg::Pcg32::seed_from_u64`) reproduces the whole search.
//!
//! # Example
//!
//! ```
//! use numeric_expr::{Dataset, Record};
//! use numeric_search::{
//!     cancel::GenerationLimit,
//!     solver::{SearchStatus, Solver, SolverConfig},
//! };
//! use rand::SeedableRng as _;
//!
//! let records: Vec<Record> = vec![
//!     [("x", 1.0), ("y", 3.0)].into_iter().collect(),
//!     [("x", 2.0), ("y", 5.0)].into_iter().collect(),
//! ];
//! let dataset = Dataset::new("y", records).unwrap();
//! let config = SolverConfig::default();
//! let rng = rand_pcg::Pcg32::seed_from_u64(0);
//!
//! let solver = Solver::new(&dataset, &config, rng, None).unwrap();
//! let initial = solver.best().fitness;
//! let summary = solver.run(&mut GenerationLimit::new(1000), &mut |_: &SearchStatus| {});
//! assert!(summary.best.fitness <= initial);
//! ```
//!
//! # Current Limitations
//!
//! - **Local search only**: a single hill climber can stall in a local optimum; the
//!   whole-formula regeneration (`p_change_type`) is the only escape
//! - **No constant fitting**: literal values move by random deltas only, never by
//!   solving for them

pub mod cancel;
pub mod formula;
pub mod solver;
