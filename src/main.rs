use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use sudoku_ga::ga::GaConfig;
use sudoku_ga::generator::{generate_puzzle, Difficulty};
use sudoku_ga::random::rng_from_seed;
use sudoku_ga::session::Session;
use sudoku_ga::{io, SudokuResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a puzzle
    Generate(GenerateArgs),
    /// Solve a board file with the genetic algorithm
    Solve(SolveArgs),
    /// Check a board file for conflicts
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Board size: 4, 6 or 9
    #[arg(short, long, default_value_t = 9)]
    size: usize,

    /// easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    #[arg(long)]
    seed: Option<u64>,

    /// Write the puzzle here (.csv for CSV) instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the solution the puzzle was cut from
    #[arg(long, default_value_t = false)]
    show_solution: bool,
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Board file, one row per line
    path: PathBuf,

    #[arg(long)]
    population_size: Option<usize>,

    #[arg(long)]
    max_generations: Option<usize>,

    #[arg(long)]
    mutation_rate: Option<f64>,

    #[arg(long)]
    elite_ratio: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Score candidates on a single thread
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Save the best board here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a text report of the run here
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print run metrics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl SolveArgs {
    fn ga_config(&self) -> GaConfig {
        let mut config = GaConfig::default();
        if let Some(n) = self.population_size {
            config = config.with_population_size(n);
        }
        if let Some(n) = self.max_generations {
            config = config.with_max_generations(n);
        }
        if let Some(rate) = self.mutation_rate {
            config = config.with_mutation_rate(rate);
        }
        if let Some(ratio) = self.elite_ratio {
            config = config.with_elite_ratio(ratio);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit_ms(ms);
        }
        if self.sequential {
            config = config.with_parallel(false);
        }
        config
    }
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Board file, one row per line
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Solve(args) => solve(args),
        Commands::Validate(args) => validate(args),
    };

    if let Err(e) = outcome {
        error!("{e}");
        process::exit(1);
    }
}

fn generate(args: GenerateArgs) -> SudokuResult<()> {
    let mut rng = rng_from_seed(args.seed);
    let puzzle = generate_puzzle(args.size, args.difficulty, &mut rng)?;
    info!(
        size = args.size,
        difficulty = %args.difficulty,
        clues = puzzle.puzzle.given_count(),
        "puzzle generated"
    );

    match &args.output {
        Some(path) => {
            io::save_board(&puzzle.puzzle, path)?;
            info!(path = %path.display(), "puzzle saved");
        }
        None => print!("{}", puzzle.puzzle),
    }
    if args.show_solution {
        println!();
        print!("{}", puzzle.solution);
    }
    Ok(())
}

fn solve(args: SolveArgs) -> SudokuResult<()> {
    let config = args.ga_config();
    config.validate()?;

    let mut session = Session::new(config);
    let initial = session.load_file(&args.path)?;
    info!(
        path = %args.path.display(),
        size = initial.size(),
        givens = initial.given_count(),
        penalty = initial.penalty(),
        "board loaded"
    );

    let metrics = session.solve()?.clone();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else if let Some(best) = session.current() {
        print!("{best}");
        println!();
        println!(
            "{}: penalty {} after {} generations ({:.3} s)",
            metrics.cause,
            metrics.best_penalty,
            metrics.generations,
            metrics.duration.as_secs_f64()
        );
    }

    if let Some(path) = &args.output {
        session.save(path)?;
        info!(path = %path.display(), "best board saved");
    }
    if let Some(path) = &args.export {
        session.export_last_run(path)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> SudokuResult<()> {
    let board = io::load_board(&args.path)?;
    print!("{board}");
    println!();

    let penalty = board.penalty();
    let blanks = board.cells().iter().filter(|&&v| v == 0).count();
    if board.is_solved() {
        println!("solved");
    } else if penalty == 0 {
        println!("no conflicts, {blanks} blank cells");
    } else {
        println!("{penalty} conflicts, {blanks} blank cells");
    }
    Ok(())
}
