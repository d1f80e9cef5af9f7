use std::io::{self, Write};
use std::time::Instant;

use clap::{ArgAction, Parser};
use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

use insurance_analysis::{load_csv, write_report, AnalysisError};

static DATA_FILE: &str = "insurance.csv";

#[derive(Parser, Debug)]
#[command(author, version, about = "Insurance charges report", long_about = None)]
struct Args {
    #[arg(short, long, action = ArgAction::Count, help = "Verbose level")]
    verbose: u8,
}

fn main() -> Result<(), AnalysisError> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let env = Env::new().filter("ANALYSIS_LOG");
    Builder::new()
        .filter(Some("insurance_analysis"), log_level)
        .parse_env(env)
        .init();

    debug!("Arguments {:#?}", args);
    let start_time = Instant::now();

    let dataset = load_csv(DATA_FILE)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &dataset)?;
    out.flush()?;

    debug!("report finished in {:?}", start_time.elapsed());
    Ok(())
}
