use clap::{Parser, Subcommand};

use self::{evaluate::EvaluateArg, solve::SolveArg};

mod evaluate;
mod solve;

const DEFAULT_JSON_OUTPUT: &str = "formula.json";
const DEFAULT_TEXT_OUTPUT: &str = "formula.txt";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for a formula fitting the dataset (press Esc to stop)
    Solve(#[clap(flatten)] SolveArg),
    /// Score a saved formula against the dataset
    Evaluate(#[clap(flatten)] EvaluateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Solve(SolveArg::default())) {
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_solve() {
        let args = CommandArgs::try_parse_from(["numeric"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_solve_default_matches_parsed_defaults() {
        let args = CommandArgs::try_parse_from(["numeric", "solve"]).unwrap();
        let Some(Mode::Solve(parsed)) = args.mode else {
            panic!("expected solve mode");
        };
        assert_eq!(parsed, SolveArg::default());
    }

    #[test]
    fn test_max_generations_must_be_positive() {
        assert!(
            CommandArgs::try_parse_from(["numeric", "solve", "--max-generations", "0"]).is_err()
        );
        let args =
            CommandArgs::try_parse_from(["numeric", "solve", "--max-generations", "10"]).unwrap();
        assert!(matches!(args.mode, Some(Mode::Solve(_))));
    }
}
