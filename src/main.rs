use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{debug, LevelFilter};

use circbuf::script::Interpreter;
use circbuf::Status;

/// Run a ring buffer command script.
#[derive(Parser, Debug)]
#[command(name = "circbuf")]
#[command(version)]
struct Cli {
    /// Script to run; `-` or nothing reads standard input
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn reads_stdin(&self) -> bool {
        match self.script {
            None => true,
            Some(ref path) => path.as_os_str() == "-",
        }
    }
}

fn init_logging(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init()?;
    Ok(())
}

fn run(cli: &Cli) -> Status {
    let stdout = io::stdout();
    let mut interp = Interpreter::new(stdout.lock());
    match cli.script {
        Some(ref path) if !cli.reads_stdin() => interp.run_file(path),
        _ => interp.run(io::stdin().lock()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_level()) {
        eprintln!("Error: cannot set up logging: {:?}", err);
        return ExitCode::FAILURE;
    }

    let status = run(&cli);
    if let Some(err) = status.error() {
        eprintln!("{}", err);
    }
    debug!("finished: {}", status);
    ExitCode::from(status.exit_code())
}
