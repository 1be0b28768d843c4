use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use division_elimination::{Algorithm, Division, EliminationReport, Eliminator};

/// Reports which teams of a division can no longer finish with the most wins.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Division file; `-` reads standard input
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Max-flow strategy used for non-trivial cases
    #[arg(short, long, value_enum, default_value_t = Algorithm::EdmondsKarp)]
    algorithm: Algorithm,
    /// Only report these teams (repeatable)
    #[arg(short, long = "team", value_name = "NAME")]
    teams: Vec<String>,
    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let division = if cli.input.as_os_str() == "-" {
        Division::from_reader(io::stdin().lock()).context("failed to read division from stdin")?
    } else {
        let file = File::open(&cli.input)
            .with_context(|| format!("failed to open {}", cli.input.display()))?;
        Division::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to read division from {}", cli.input.display()))?
    };
    info!(
        "loaded {} teams, solving with {}",
        division.number_of_teams(),
        cli.algorithm
    );

    let eliminator = Eliminator::with_engine(&division, cli.algorithm);
    let report = if cli.teams.is_empty() {
        EliminationReport::for_division(&eliminator)?
    } else {
        EliminationReport::for_teams(&eliminator, cli.teams.as_slice())?
    };
    print!("{report}");
    Ok(())
}
