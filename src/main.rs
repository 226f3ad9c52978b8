use std::{
    fs::File,
    io::{BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

use bank_tracker::{errors::Error, io, types::Ledger};
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Loads transactions from a CSV file and prints the tracker's reports.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file of transactions with columns name, amount, type, category
    input: PathBuf,

    /// Which report to print
    #[arg(long, value_enum, default_value_t = Report::All)]
    report: Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Report {
    /// Balance, income and expenses
    Summary,
    /// Every transaction in display order
    Transactions,
    /// Expense breakdown per category with chart colors
    Chart,
    /// All of the above, separated by blank lines
    All,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bank_tracker=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let log_file = File::open(&cli.input)?;
    let mut log_reader = BufReader::new(log_file);
    let mut ledger = Ledger::new();
    io::load_transactions_from_csv(&mut log_reader, &mut ledger)?;

    let mut stdout = std::io::stdout().lock();
    if matches!(cli.report, Report::Summary | Report::All) {
        io::write_summary_csv(&mut stdout, &ledger.summary())?;
    }
    if cli.report == Report::All {
        writeln!(stdout)?;
    }
    if matches!(cli.report, Report::Transactions | Report::All) {
        io::write_transactions_csv(&mut stdout, ledger.transactions())?;
    }
    if cli.report == Report::All {
        writeln!(stdout)?;
    }
    if matches!(cli.report, Report::Chart | Report::All) {
        io::write_chart_csv(&mut stdout, &ledger.chart_series())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(input = %cli.input.display(), "{err}");
            ExitCode::FAILURE
        }
    }
}
