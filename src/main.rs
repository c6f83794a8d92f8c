#[macro_use]
extern crate log;

use clap::Parser;
use mymake::{CyclePolicy, Engine, MakefileError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::exit;

/// Print the targets needed to build TARGET, dependencies first, along with
/// their commands
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The makefile to read
    makefile: PathBuf,

    /// The target to build
    target: String,

    /// Truncate target and dependency names to this many characters
    #[arg(long, value_name = "N")]
    name_limit: Option<usize>,

    /// Fail instead of skipping the edge when a dependency cycle is found
    #[arg(long)]
    reject_cycles: bool,
}

fn run(cli: &Cli) -> Result<(), MakefileError> {
    let mut engine = Engine::default();
    engine.name_limit = cli.name_limit;
    if cli.reject_cycles {
        engine.cycle_policy = CyclePolicy::Reject;
    }

    let file_name = cli.makefile.to_string_lossy();
    let inf = File::open(&cli.makefile)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", file_name, e)))?;
    let mut bufreader = BufReader::new(inf);
    engine.read_makefile(&mut bufreader, &file_name)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    engine.print_postorder(&cli.target, &mut out)
}

fn main() {
    env_logger::builder().init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        debug!("mymake failed: {:?}", e);
        eprintln!("Error: {}", e);
        exit(1);
    }
}
