use clap::Parser;
use std::path::PathBuf;
use std::process;
use water_sort_solver::cli::{init_logging, SearchArgs};
use water_sort_solver::solver::{solve_best_first, solve_dfs, Solution};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare DFS and best-first search on puzzle files", long_about = None)]
struct Args {
    #[clap(flatten)]
    search: SearchArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Puzzle files to solve
    #[clap(required = true)]
    puzzle_files: Vec<PathBuf>,
}

fn describe(solution: &Solution) -> String {
    if solution.solution_found {
        format!("{} moves", solution.moves.len())
    } else if solution.stats.budget_exhausted {
        "budget".to_string()
    } else {
        "none".to_string()
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.search.to_config();

    let mut compared = 0usize;
    let mut dfs_total = 0usize;
    let mut best_total = 0usize;
    let mut regressions = Vec::new();

    println!(
        "{:<32} {:>12} {:>10} {:>12} {:>10}",
        "Puzzle", "DFS", "states", "Best-first", "states"
    );

    for path in &args.puzzle_files {
        let (state, params) = match args.search.load_puzzle(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let dfs = solve_dfs(&state, &config);
        let best = solve_best_first(&state, &params, &config);
        println!(
            "{:<32} {:>12} {:>10} {:>12} {:>10}",
            path.display().to_string(),
            describe(&dfs),
            dfs.stats.states_explored,
            describe(&best),
            best.stats.states_explored
        );

        if dfs.solution_found && best.solution_found {
            compared += 1;
            dfs_total += dfs.moves.len();
            best_total += best.moves.len();
            if best.moves.len() > dfs.moves.len() {
                regressions.push(path.clone());
            }
        }
    }

    println!("\n--- Comparison Complete ---");
    println!("Puzzles solved by both: {}", compared);
    if compared > 0 {
        println!(
            "Average moves: DFS = {:.2}, Best-first = {:.2}",
            dfs_total as f64 / compared as f64,
            best_total as f64 / compared as f64
        );
    }
    if !regressions.is_empty() {
        for path in &regressions {
            eprintln!("Best-first longer than DFS on {}", path.display());
        }
        process::exit(1);
    }
}
