use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use numeric_expr::Dataset;
use numeric_search::{
    cancel::GenerationLimit,
    formula::Formula,
    solver::{SearchSummary, Solver, SolverConfig},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    data,
    schema::formula_file::{FormulaFile, SolvedFormula},
    terminal::{KeyWatcher, StatusDisplay},
    util::{self, Json, Output},
};

use super::{DEFAULT_JSON_OUTPUT, DEFAULT_TEXT_OUTPUT};

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct SolveArg {
    /// Formula JSON file to continue from (a fresh formula is generated if it cannot be used)
    #[arg(long)]
    start: Option<PathBuf>,
    /// Dataset JSON file (defaults to the built-in sample)
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Solver configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many generations
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_generations: Option<u64>,
    /// Output path for the solved formula JSON (`-` for stdout)
    #[arg(long, default_value = DEFAULT_JSON_OUTPUT)]
    json_output: PathBuf,
    /// Output path for the rendered formula (`-` for stdout)
    #[arg(long, default_value = DEFAULT_TEXT_OUTPUT)]
    text_output: PathBuf,
}

impl Default for SolveArg {
    fn default() -> Self {
        Self {
            start: None,
            dataset: None,
            config: None,
            seed: None,
            max_generations: None,
            json_output: PathBuf::from(DEFAULT_JSON_OUTPUT),
            text_output: PathBuf::from(DEFAULT_TEXT_OUTPUT),
        }
    }
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        start,
        dataset,
        config,
        seed,
        max_generations,
        json_output,
        text_output,
    } = arg;

    let dataset = data::load_dataset(dataset.as_deref())?;
    let config = match config {
        Some(path) => util::read_json_file::<SolverConfig, _>("config", path)?,
        None => SolverConfig::default(),
    };
    let start = start
        .as_deref()
        .and_then(|path| load_start(path, &dataset));

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    let rng = Pcg32::seed_from_u64(seed);
    let solver = Solver::new(&dataset, &config, rng, start).context("Failed to set up solver")?;

    eprintln!("Searching... press Esc to stop");
    let watcher = match KeyWatcher::new() {
        Ok(watcher) => Some(watcher),
        Err(e) if max_generations.is_some() => {
            eprintln!("Warning: keyboard unavailable ({e}), running until the generation limit");
            None
        }
        Err(e) => {
            return Err(e).context(
                "Failed to read the keyboard; pass --max-generations to run without it",
            );
        }
    };
    let limit = max_generations.map(GenerationLimit::new);

    let mut cancel = (limit, watcher);
    let mut display = StatusDisplay::new();
    let summary = solver.run(&mut cancel, &mut display);
    let (_, watcher) = cancel;
    if let Some(watcher) = watcher {
        watcher
            .cleanup()
            .context("Failed to restore the terminal mode")?;
    }
    display.finish();

    save(&summary, seed, json_output, text_output)
}

/// Reads and checks a start formula, or explains on stderr why it is not used.
fn load_start(path: &Path, dataset: &Dataset) -> Option<Formula> {
    let formula = match util::read_json_file::<FormulaFile, _>("start formula", path) {
        Ok(file) => file.into_formula(),
        Err(e) => {
            eprintln!("Warning: {e:#}; starting from a fresh formula");
            return None;
        }
    };
    if let Err(e) = formula.validate(dataset) {
        eprintln!(
            "Warning: start formula {} does not fit the dataset ({e}); starting from a fresh formula",
            path.display()
        );
        return None;
    }
    eprintln!("Starting from {}: {formula}", path.display());
    Some(formula)
}

fn save(
    summary: &SearchSummary,
    seed: u64,
    json_output: &Path,
    text_output: &Path,
) -> anyhow::Result<()> {
    let solved = SolvedFormula {
        solved_at: Utc::now(),
        seed,
        generations: summary.generations,
        successes: summary.successes,
        fitness: summary.best.fitness,
        size: summary.best.size,
        formula: summary.best.formula.clone(),
    };

    let mut json = Output::create(json_output)?;
    json.save(&Json(&solved))?;
    let mut text = Output::create(text_output)?;
    text.save(solved.formula.to_string().as_str())?;

    eprintln!();
    eprintln!("Formula saved successfully");
    eprintln!("  JSON: {}", json.label());
    eprintln!("  Text: {}", text.label());
    eprintln!("  Generations: {}", solved.generations);
    eprintln!("  Successes: {}", solved.successes);
    eprintln!("  Fitness: {}", solved.fitness);
    eprintln!("  Size: {}", solved.size);
    eprintln!("  Formula: {}", solved.formula);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use numeric_expr::{Expr, Operator};
    use numeric_search::solver::SearchStatus;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("numeric-solve-{}-{name}", process::id()))
    }

    #[test]
    fn test_load_start_accepts_bare_expression() {
        let dataset = data::sample_dataset().unwrap();
        let path = temp_path("bare.json");
        fs::write(
            &path,
            r#"{"type":"binary","op":"add","left":{"type":"input","name":"first"},"right":{"type":"literal","value":16.0}}"#,
        )
        .unwrap();

        let formula = load_start(&path, &dataset);
        fs::remove_file(&path).unwrap();
        let expected = Expr::binary(Operator::Add, Expr::input("first"), Expr::literal(16.0));
        assert_eq!(formula.map(Formula::into_root), Some(expected));
    }

    #[test]
    fn test_load_start_rejects_target_reference() {
        let dataset = data::sample_dataset().unwrap();
        let path = temp_path("target.json");
        fs::write(&path, r#"{"type":"input","name":"target"}"#).unwrap();

        let formula = load_start(&path, &dataset);
        fs::remove_file(&path).unwrap();
        assert!(formula.is_none());
    }

    #[test]
    fn test_load_start_missing_or_malformed() {
        let dataset = data::sample_dataset().unwrap();
        assert!(load_start(&temp_path("missing.json"), &dataset).is_none());

        let path = temp_path("garbage.json");
        fs::write(&path, "not json").unwrap();
        let formula = load_start(&path, &dataset);
        fs::remove_file(&path).unwrap();
        assert!(formula.is_none());
    }

    #[test]
    fn test_save_writes_both_outputs() {
        let dataset = data::sample_dataset().unwrap();
        let config = SolverConfig::default();
        let start = Formula::new(Expr::literal(17.0));
        let solver = Solver::new(&dataset, &config, Pcg32::seed_from_u64(1), Some(start)).unwrap();
        let summary = solver.run(&mut GenerationLimit::new(200), &mut |_: &SearchStatus| {});

        let json_path = temp_path("out.json");
        let text_path = temp_path("out.txt");
        save(&summary, 1, &json_path, &text_path).unwrap();

        let solved: SolvedFormula = util::read_json_file("output", &json_path).unwrap();
        let text = fs::read_to_string(&text_path).unwrap();
        fs::remove_file(&json_path).unwrap();
        fs::remove_file(&text_path).unwrap();

        assert_eq!(solved.generations, 200);
        assert_eq!(solved.formula, summary.best.formula);
        assert!(solved.fitness <= 108.0);
        assert_eq!(text.trim_end(), summary.best.formula.to_string());
    }
}
