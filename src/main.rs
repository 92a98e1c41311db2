//! Minim compiler CLI
//!
//! Command-line interface for checking and code-generating Minim programs
//! already parsed to JSON by an external front end.

use clap::Parser as ClapParser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "minimc")]
#[command(about = "Minim compiler - check and generate VM code for Minim programs", long_about = None)]
struct Cli {
    /// Input JSON-serialized Program, or `-` for stdin
    input: PathBuf,

    /// Output path for the generated VM program; defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raise the tracing filter to debug
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), minimc::CompileError> {
    let source = read_input(&cli.input).unwrap_or_else(|e| {
        eprintln!("Error: failed to read {}: {e}", cli.input.display());
        process::exit(1);
    });

    let program: minimc::Program = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error: failed to parse input JSON: {e}");
        process::exit(1);
    });

    let vm_program = minimc::compile(&program)?;
    write_output(cli.output.as_deref(), &vm_program);
    Ok(())
}

fn read_input(path: &std::path::Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: Option<&std::path::Path>, vm_program: &str) {
    match path {
        Some(path) => {
            if let Err(e) = fs::write(path, vm_program) {
                eprintln!("Error: failed to write {}: {e}", path.display());
                process::exit(1);
            }
        }
        None => {
            let _ = io::stdout().write_all(vm_program.as_bytes());
        }
    }
}
