use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process;
use water_sort_solver::cli::{init_logging, SearchArgs};
use water_sort_solver::error::Result;
use water_sort_solver::solver::{solve_best_first, solve_dfs};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Algorithm {
    /// Depth-first search: any solution, found quickly
    Dfs,
    /// Best-first search: a shortest solution
    Optimal,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm to run
    #[clap(short, long, value_enum, default_value_t = Algorithm::Optimal)]
    algorithm: Algorithm,

    #[clap(flatten)]
    search: SearchArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the puzzle file (one tube per line, bottom to top)
    puzzle_file: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let (state, params) = args.search.load_puzzle(&args.puzzle_file)?;
    info!("Loaded puzzle from {}: {:?}", args.puzzle_file.display(), params);
    println!("Initial state:\n{}\n", state);
    println!("Searching with {:?}...\n", args.algorithm);

    let config = args.search.to_config();
    let solution = match args.algorithm {
        Algorithm::Dfs => solve_dfs(&state, &config),
        Algorithm::Optimal => solve_best_first(&state, &params, &config),
    };

    if solution.solution_found {
        println!("Solution found:\n");
        println!("Moves ({}):", solution.moves.len());
        if solution.moves.is_empty() {
            println!("  No moves needed.");
        } else {
            for (i, mv) in solution.moves.iter().enumerate() {
                println!("  Move {}: {}", i + 1, mv);
            }
        }
        let final_state = state.replay(&solution.moves)?;
        println!("\nFinal state:\n{}\n", final_state);
    } else if solution.stats.budget_exhausted {
        println!("No solution found within the search budget.\n");
    } else {
        println!("No solution found.\n");
    }
    println!("States explored: {}", solution.stats.states_explored);
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
