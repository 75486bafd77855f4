//! Hill-climbing search loop.
//!
//! The [`Solver`] keeps a single current-best [`Formula`]. Each generation it
//! clones the best, mutates the clone, scores it, and keeps it if it beats
//! the current best under [`Candidate::is_better_than`].
//!
//! # Reporting
//!
//! A [`ProgressReporter`] receives a [`SearchStatus`] after every accepted
//! candidate, and every `report_interval` generations otherwise.
//!
//! # Termination
//!
//! [`Solver::run`] loops until its [`Cancellation`] reports a stop request;
//! there is no other exit. [`Solver::step`] runs a single generation for
//! callers that drive the loop themselves.

use numeric_expr::{Dataset, MutationContext, MutationParams, ParamsError, ValidationError};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{cancel::Cancellation, formula::Formula};

/// Errors raised while setting up a [`Solver`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolverError {
    #[display("invalid mutation parameters")]
    Params(#[error(source)] ParamsError),
    #[display("report interval must be at least 1")]
    #[from(ignore)]
    ReportInterval,
    #[display("invalid start formula")]
    InvalidStart(#[error(source)] ValidationError),
}

/// Solver configuration.
///
/// Every field has a default, so a partial configuration file only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Generations between status reports while no candidate is accepted.
    pub report_interval: u64,
    pub mutation: MutationParams,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            report_interval: 10_000,
            mutation: MutationParams::default(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.report_interval == 0 {
            return Err(SolverError::ReportInterval);
        }
        self.mutation.validate()?;
        Ok(())
    }
}

/// A formula together with its cached score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub formula: Formula,
    pub fitness: f64,
    pub size: usize,
}

impl Candidate {
    #[must_use]
    pub fn evaluate(formula: Formula, dataset: &Dataset) -> Self {
        let fitness = formula.fitness(dataset);
        let size = formula.size();
        Self {
            formula,
            fitness,
            size,
        }
    }

    /// Acceptance rule: strictly lower fitness, or equal fitness with a
    /// strictly smaller tree.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        #[expect(clippy::float_cmp)]
        let same_fitness = self.fitness == other.fitness;
        self.fitness < other.fitness || (same_fitness && self.size < other.size)
    }
}

/// Snapshot of the search passed to [`ProgressReporter`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStatus {
    pub generation: u64,
    pub successes: u64,
    pub fitness: f64,
    pub size: usize,
}

/// Receives periodic [`SearchStatus`] snapshots.
pub trait ProgressReporter {
    fn report(&mut self, status: &SearchStatus);
}

impl<F> ProgressReporter for F
where
    F: FnMut(&SearchStatus),
{
    fn report(&mut self, status: &SearchStatus) {
        self(status);
    }
}

/// Result of a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    Accepted,
    Rejected,
}

/// Final state of a finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    pub best: Candidate,
    pub generations: u64,
    pub successes: u64,
}

/// Single-candidate hill climber.
#[derive(Debug)]
pub struct Solver<'a, R> {
    ctx: MutationContext<'a>,
    rng: R,
    report_interval: u64,
    best: Candidate,
    generation: u64,
    successes: u64,
}

impl<'a, R> Solver<'a, R>
where
    R: Rng,
{
    /// Creates a solver seeded with `start`, or with a random formula if
    /// `start` is `None`.
    ///
    /// `start` must only reference input fields of `dataset`.
    pub fn new(
        dataset: &'a Dataset,
        config: &'a SolverConfig,
        mut rng: R,
        start: Option<Formula>,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        let ctx = MutationContext::new(dataset, &config.mutation)?;
        let formula = match start {
            Some(formula) => {
                formula.validate(dataset)?;
                formula
            }
            None => Formula::random(&ctx, &mut rng),
        };
        let best = Candidate::evaluate(formula, dataset);
        Ok(Self {
            ctx,
            rng,
            report_interval: config.report_interval,
            best,
            generation: 0,
            successes: 0,
        })
    }

    #[must_use]
    pub fn best(&self) -> &Candidate {
        &self.best
    }

    #[must_use]
    pub fn status(&self) -> SearchStatus {
        SearchStatus {
            generation: self.generation,
            successes: self.successes,
            fitness: self.best.fitness,
            size: self.best.size,
        }
    }

    /// Runs one generation: clone, mutate, evaluate, accept or reject.
    pub fn step(&mut self) -> StepOutcome {
        self.generation += 1;

        let mut formula = self.best.formula.clone();
        formula.mutate(&self.ctx, &mut self.rng);
        let candidate = Candidate::evaluate(formula, self.ctx.dataset());

        if candidate.is_better_than(&self.best) {
            self.best = candidate;
            self.successes += 1;
            StepOutcome::Accepted
        } else {
            StepOutcome::Rejected
        }
    }

    /// Runs generations until `cancel` requests a stop.
    ///
    /// `cancel` is polled once per generation, after the candidate has been
    /// scored, so at least one generation always runs.
    pub fn run<C, P>(mut self, cancel: &mut C, reporter: &mut P) -> SearchSummary
    where
        C: Cancellation + ?Sized,
        P: ProgressReporter + ?Sized,
    {
        reporter.report(&self.status());
        loop {
            let outcome = self.step();
            if outcome.is_accepted() || self.generation % self.report_interval == 0 {
                reporter.report(&self.status());
            }
            if cancel.is_cancelled() {
                break;
            }
        }
        self.into_summary()
    }

    #[must_use]
    pub fn into_best(self) -> Formula {
        self.best.formula
    }

    #[must_use]
    pub fn into_summary(self) -> SearchSummary {
        SearchSummary {
            best: self.best,
            generations: self.generation,
            successes: self.successes,
        }
    }
}
