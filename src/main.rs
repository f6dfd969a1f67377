use clap::{Parser, Subcommand, ValueEnum};
use freecell_solver::game::Board;
use freecell_solver::game::render::{emit_fixture, to_json};
use freecell_solver::search::{
    ParallelConfig, SearchConfig, SearchMode, SearchResult, Termination, solve,
};
use log::{LevelFilter, info, warn};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "freecell")]
#[command(about = "freecell - Parallel A* FreeCell solver")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// CLI goal arbitration mode
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliSearchMode {
    /// Stop at the first goal any worker finds
    First,
    /// Keep searching for strictly shorter solutions
    Best,
}

impl From<CliSearchMode> for SearchMode {
    fn from(cli: CliSearchMode) -> Self {
        match cli {
            CliSearchMode::First => SearchMode::FirstGoal,
            CliSearchMode::Best => SearchMode::BestGoal,
        }
    }
}

/// CLI board output format
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CliFormat {
    /// Foundations, free cells and columns as text
    #[default]
    Text,
    /// Columns as a JSON array of card numbers
    Json,
    /// Rust source that rebuilds the board
    Fixture,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single deal and print the moves
    Solve {
        /// Deal number (Microsoft numbering)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        deal: u32,

        // --- Search options ---
        /// Goal arbitration mode
        #[arg(long, value_enum, default_value = "first")]
        mode: CliSearchMode,
        /// Skip playing safe foundation moves before searching
        #[arg(long)]
        no_auto_play: bool,
        /// Print every board along the solution
        #[arg(long)]
        boards: bool,

        // --- Parallel options ---
        /// Maximum number of worker threads
        #[arg(long, short = 'j')]
        cores: Option<usize>,
        /// Timeout in seconds for the search
        #[arg(long)]
        timeout: Option<u64>,
        /// Stop after this many distinct boards
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// Print the initial layout of a deal
    Show {
        /// Deal number (Microsoft numbering)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        deal: u32,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: CliFormat,
    },
    /// Solve a range of deals, appending one CSV line per deal
    Batch {
        /// First deal number
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,
        /// Last deal number (inclusive)
        #[arg(long)]
        to: u32,
        /// CSV file to append `deal,moves,visited,millis` lines to
        #[arg(long, short, default_value = "fc_games.csv")]
        output: PathBuf,
        /// Deals to skip, comma separated
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<u32>,

        // --- Parallel options ---
        /// Maximum number of worker threads
        #[arg(long, short = 'j')]
        cores: Option<usize>,
        /// Timeout in seconds for each deal
        #[arg(long)]
        timeout: Option<u64>,
        /// Stop each deal after this many distinct boards
        #[arg(long)]
        max_nodes: Option<usize>,
    },
}

/// Limits shared by `solve` and `batch`
struct ParallelOptions {
    cores: Option<usize>,
    timeout: Option<Duration>,
    max_nodes: Option<usize>,
}

impl ParallelOptions {
    fn config(&self) -> ParallelConfig {
        ParallelConfig::default()
            .with_workers(self.cores.unwrap_or_else(num_cpus::get))
            .with_timeout_option(self.timeout)
            .with_max_nodes_option(self.max_nodes)
    }
}

// --- Logging ---

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, overrides the -v level.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

// --- Commands ---

fn solve_deal(
    deal: u32,
    search_config: &SearchConfig,
    parallel: &ParallelOptions,
    print_boards: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = Board::from_deal_number(deal);
    if !root.is_valid() {
        return Err(format!("Deal {} produced an invalid board", deal).into());
    }

    println!("Deal #{}", deal);
    println!("{}\n", root);

    let config = parallel.config();
    if search_config.mode == SearchMode::BestGoal && !config.is_bounded() {
        warn!("Best-goal search has no --timeout or --max-nodes and may run for a long time");
    }
    println!(
        "Searching with up to {} workers (mode: {})...",
        config.num_workers, search_config.mode
    );
    let result = solve(&root, search_config, &config);

    match result.path() {
        Some(path) => {
            println!("\nSolved in {} moves:", path.len());
            println!("{}", path);
            if print_boards {
                for (i, step) in path.steps().iter().enumerate() {
                    println!("\n#{} {}", i + 1, step.mv);
                    println!("{}", step.board);
                }
            }
        }
        None => println!("\nNo solution found ({}).", result.termination),
    }

    print_search_statistics(&result);
    Ok(())
}

fn show_deal(deal: u32, format: CliFormat) -> Result<(), Box<dyn std::error::Error>> {
    let board = Board::from_deal_number(deal);
    match format {
        CliFormat::Text => println!("{}", board),
        CliFormat::Json => println!("{}", to_json(&board)),
        CliFormat::Fixture => println!("{}", emit_fixture(&board)?),
    }
    Ok(())
}

fn run_batch(
    from: u32,
    to: u32,
    output: &Path,
    excluded: &[u32],
    parallel: &ParallelOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if from > to {
        return Err(format!("Empty deal range: {} > {}", from, to).into());
    }

    let file = OpenOptions::new().create(true).append(true).open(output)?;
    let mut writer = BufWriter::new(file);
    let search_config = SearchConfig::default();
    let config = parallel.config();
    info!(
        "Solving deals {}..={} into {}",
        from,
        to,
        output.display()
    );

    let mut solved = 0u32;
    for deal in from..=to {
        if excluded.contains(&deal) {
            writeln!(writer, "{},0,0,0", deal)?;
            println!("{}: excluded", deal);
        } else {
            let start = Instant::now();
            let result = solve(&Board::from_deal_number(deal), &search_config, &config);
            let millis = start.elapsed().as_millis();
            let moves = result.move_count().unwrap_or(0);

            writeln!(
                writer,
                "{},{},{},{}",
                deal, moves, result.visited_nodes, millis
            )?;
            match result.termination {
                Termination::Solved => {
                    solved += 1;
                    println!("{}: {} moves", deal, moves);
                }
                termination => println!("{}: {}", deal, termination),
            }
        }

        if deal % 1000 == 0 {
            writer.flush()?;
            println!("---------------------");
        }
    }
    writer.flush()?;

    println!(
        "\nSolved {} of {} deals; results in {}",
        solved,
        to - from + 1,
        output.display()
    );
    Ok(())
}

fn print_search_statistics(result: &SearchResult) {
    println!("\nSearch Statistics:");
    println!("  Visited nodes: {}", result.visited_nodes);
    println!("  Threads used: {}", result.threads_used);
    for line in result.statistics.format_summary().lines() {
        println!("  {}", line);
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Solve {
            deal,
            mode,
            no_auto_play,
            boards,
            cores,
            timeout,
            max_nodes,
        } => {
            let search_config = SearchConfig::default()
                .with_mode(mode.into())
                .with_auto_play(!no_auto_play);
            let parallel = ParallelOptions {
                cores,
                timeout: timeout.map(Duration::from_secs),
                max_nodes,
            };

            if let Err(e) = solve_deal(deal, &search_config, &parallel, boards) {
                eprintln!("Error solving deal: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Show { deal, format } => {
            if let Err(e) = show_deal(deal, format) {
                eprintln!("Error showing deal: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Batch {
            from,
            to,
            output,
            exclude,
            cores,
            timeout,
            max_nodes,
        } => {
            let parallel = ParallelOptions {
                cores,
                timeout: timeout.map(Duration::from_secs),
                max_nodes,
            };

            if let Err(e) = run_batch(from, to, &output, &exclude, &parallel) {
                eprintln!("Error during batch run: {}", e);
                std::process::exit(1);
            }
        }
    }
}
