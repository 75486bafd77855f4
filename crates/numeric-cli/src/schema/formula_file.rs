use chrono::{DateTime, Utc};
use numeric_expr::Expr;
use numeric_search::formula::Formula;
use serde::{Deserialize, Serialize};

/// Result of a finished search, as written by `numeric solve`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolvedFormula {
    pub solved_at: DateTime<Utc>,
    pub seed: u64,
    pub generations: u64,
    pub successes: u64,
    pub fitness: f64,
    pub size: usize,
    pub formula: Formula,
}

/// Any JSON document a formula can be read from.
///
/// Accepts a full [`SolvedFormula`], a bare [`Formula`], or a bare expression tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormulaFile {
    Solved(SolvedFormula),
    Formula(Formula),
    Expr(Expr),
}

impl FormulaFile {
    pub fn into_formula(self) -> Formula {
        match self {
            FormulaFile::Solved(solved) => solved.formula,
            FormulaFile::Formula(formula) => formula,
            FormulaFile::Expr(expr) => Formula::new(expr),
        }
    }
}
