//! Scoring an expression against a [`Dataset`].
//!
//! Fitness is the sum of absolute prediction errors over all records, so lower
//! is better and `0.0` is a perfect fit. An expression that fails to evaluate
//! on any record scores [`WORST_FITNESS`].

use crate::{Dataset, EvalError, Expr};

/// Score given to expressions whose evaluation fails.
pub const WORST_FITNESS: f64 = f64::MAX;

/// Prediction of an expression on one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub predicted: f64,
    pub actual: f64,
    pub error: f64,
}

/// Computes the fitness of `expr`, mapping any evaluation failure to
/// [`WORST_FITNESS`].
///
/// # Examples
///
/// ```
/// use numeric_expr::{Dataset, Expr, Record, fitness};
///
/// let records: Vec<Record> = vec![
///     [("x", 1.0), ("y", 3.0)].into_iter().collect(),
///     [("x", 2.0), ("y", 5.0)].into_iter().collect(),
/// ];
/// let dataset = Dataset::new("y", records).unwrap();
/// assert_eq!(fitness(&Expr::input("x"), &dataset), 2.0 + 3.0);
/// ```
#[must_use]
pub fn fitness(expr: &Expr, dataset: &Dataset) -> f64 {
    try_fitness(expr, dataset).unwrap_or(WORST_FITNESS)
}

/// Computes the fitness of `expr`, reporting why evaluation failed.
pub fn try_fitness(expr: &Expr, dataset: &Dataset) -> Result<f64, EvalError> {
    let target = dataset.target();
    let mut total = 0.0;
    for record in dataset.records() {
        let predicted = expr.evaluate(record)?;
        total += (predicted - record.get(target)).abs();
    }
    if total.is_finite() {
        Ok(total)
    } else {
        Err(EvalError::ErrorOverflow)
    }
}

/// Evaluates `expr` on every record, in dataset order.
pub fn residuals(expr: &Expr, dataset: &Dataset) -> Result<Vec<Residual>, EvalError> {
    let target = dataset.target();
    dataset
        .records()
        .iter()
        .map(|record| {
            let predicted = expr.evaluate(record)?;
            let actual = record.get(target);
            Ok(Residual {
                predicted,
                actual,
                error: (predicted - actual).abs(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operator, Record};

    fn dataset() -> Dataset {
        let records: Vec<Record> = vec![
            [("first", 1.0), ("second", 500.0), ("third", -12.0), ("target", 17.0)]
                .into_iter()
                .collect(),
            [("first", 1024.0), ("second", -12.0), ("third", 45.0), ("target", 125.0)]
                .into_iter()
                .collect(),
        ];
        Dataset::new("target", records).unwrap()
    }

    #[test]
    fn test_input_reference_fitness() {
        // |1 - 17| + |1024 - 125|
        assert_eq!(fitness(&Expr::input("first"), &dataset()), 915.0);
    }

    #[test]
    fn test_literal_fitness() {
        // |17 - 17| + |17 - 125|
        assert_eq!(fitness(&Expr::literal(17.0), &dataset()), 108.0);
    }

    #[test]
    fn test_perfect_fit_is_zero() {
        // y = x * 2 + 1
        let records: Vec<Record> = vec![
            [("x", 2.0), ("y", 5.0)].into_iter().collect(),
            [("x", 4.0), ("y", 9.0)].into_iter().collect(),
        ];
        let dataset = Dataset::new("y", records).unwrap();
        let expr = Expr::binary(
            Operator::Add,
            Expr::binary(Operator::Multiply, Expr::input("x"), Expr::literal(2.0)),
            Expr::literal(1.0),
        );
        assert_eq!(fitness(&expr, &dataset), 0.0);
    }

    #[test]
    fn test_evaluation_failure_scores_worst() {
        let expr = Expr::binary(
            Operator::Multiply,
            Expr::literal(f64::MAX),
            Expr::input("second"),
        );
        assert_eq!(
            try_fitness(&expr, &dataset()),
            Err(EvalError::Overflow {
                op: Operator::Multiply
            })
        );
        assert_eq!(fitness(&expr, &dataset()), WORST_FITNESS);
    }

    #[test]
    fn test_accumulated_overflow_scores_worst() {
        // each prediction is finite but the summed error is not
        let expr = Expr::literal(f64::MAX);
        assert_eq!(try_fitness(&expr, &dataset()), Err(EvalError::ErrorOverflow));
        assert_eq!(fitness(&expr, &dataset()), WORST_FITNESS);
    }

    #[test]
    fn test_residuals() {
        let residuals = residuals(&Expr::input("first"), &dataset()).unwrap();
        assert_eq!(
            residuals,
            [
                Residual {
                    predicted: 1.0,
                    actual: 17.0,
                    error: 16.0
                },
                Residual {
                    predicted: 1024.0,
                    actual: 125.0,
                    error: 899.0
                },
            ]
        );
    }
}
