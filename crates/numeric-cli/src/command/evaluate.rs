use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use numeric_expr::{Dataset, Residual};
use numeric_search::formula::Formula;

use crate::{data, schema::formula_file::FormulaFile, util};

use super::DEFAULT_JSON_OUTPUT;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Formula JSON file (a solved formula, a bare formula, or an expression tree)
    #[arg(long, default_value = DEFAULT_JSON_OUTPUT)]
    formula: PathBuf,
    /// Dataset JSON file (defaults to the built-in sample)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg { formula, dataset } = arg;

    let dataset = data::load_dataset(dataset.as_deref())?;
    let formula = util::read_json_file::<FormulaFile, _>("formula", formula)?.into_formula();
    if let Err(e) = formula.validate(&dataset) {
        eprintln!("Warning: {e}");
    }

    let report = render_report(&formula, &dataset);
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .context("Failed to write evaluation report")?;
    Ok(())
}

fn render_report(formula: &Formula, dataset: &Dataset) -> String {
    let mut out = String::new();
    out += &format!("Formula: {formula}\n");
    out += &format!("Size: {}\n", formula.size());
    out += &format!("Depth: {}\n", formula.root().depth());
    out += &format!("Fitness: {}\n", formula.fitness(dataset));
    match numeric_expr::residuals(formula.root(), dataset) {
        Ok(residuals) => {
            out += &format!("Records ({}):\n", dataset.target());
            for (i, Residual { predicted, actual, error }) in residuals.iter().enumerate() {
                out += &format!(
                    "  {i:3}: predicted {predicted}, actual {actual}, error {error}\n"
                );
            }
        }
        Err(e) => out += &format!("Evaluation failed: {e} (scored as the worst fitness)\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use numeric_expr::{Expr, Operator};

    use super::*;

    #[test]
    fn test_report_for_sample_dataset() {
        let dataset = data::sample_dataset().unwrap();
        let formula = Formula::new(Expr::binary(
            Operator::Add,
            Expr::input("first"),
            Expr::literal(16.0),
        ));
        let report = render_report(&formula, &dataset);
        assert_eq!(
            report,
            "Formula: ({first} + 16)\n\
             Size: 3\n\
             Depth: 2\n\
             Fitness: 915\n\
             Records (target):\n    \
             0: predicted 17, actual 17, error 0\n    \
             1: predicted 1040, actual 125, error 915\n"
        );
    }

    #[test]
    fn test_report_for_overflow() {
        let dataset = data::sample_dataset().unwrap();
        let formula = Formula::new(Expr::binary(
            Operator::Multiply,
            Expr::literal(f64::MAX),
            Expr::literal(10.0),
        ));
        let report = render_report(&formula, &dataset);
        assert!(report.contains(&format!("Fitness: {}\n", f64::MAX)));
        assert!(report.contains("Evaluation failed:"));
    }
}
