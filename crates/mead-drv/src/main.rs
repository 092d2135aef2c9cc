//! The meadc command-line interface.

use clap::Parser;
use mead_drv::{Config, Session};

/// Meadc - compiler front-end for the Mead language
#[derive(Parser, Debug)]
#[command(name = "meadc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile a Mead source file", long_about = None)]
struct Cli {
    /// Source file to compile; the embedded sample program when omitted
    input: Option<std::path::PathBuf>,

    /// Print the token stream after lexing
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree after parsing
    #[arg(long)]
    dump_ast: bool,

    /// Print the parser's derivation trace
    #[arg(long)]
    trace: bool,

    /// Enable verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("logger init");

    let session = Session::new(Config {
        input: cli.input,
        dump_tokens: cli.dump_tokens,
        dump_ast: cli.dump_ast,
        trace: cli.trace,
    });

    match session.run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(error) => {
            eprintln!("error: {:#}", error);
            std::process::exit(1);
        }
    }
}
