//! mead-drv - The compiler driver.
//!
//! Orchestrates the pipeline: read source, lex, parse, compile, and report.
//! Each phase maps to an exit code so scripts can tell failures apart:
//! 0 success, 1 lex failure, 2 parse failure, 3 compile failure.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use mead_lex::Lexer;
use mead_par::Parser;
use mead_sem::Compiler;
use mead_util::Handler;

/// The sample program compiled when no input file is given.
pub const SAMPLE_PROGRAM: &str = "\
u8 foo = 0x42;

fn main(argc: i32, argv: u8**) -> i32 {
    return i32(foo);
}
";

/// Exit status of one compiler run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    LexFailure,
    ParseFailure,
    CompileFailure,
}

impl Outcome {
    /// The process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::LexFailure => 1,
            Outcome::ParseFailure => 2,
            Outcome::CompileFailure => 3,
        }
    }
}

/// Driver configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Source file; the embedded sample program when absent.
    pub input: Option<PathBuf>,
    /// Print the token stream after lexing.
    pub dump_tokens: bool,
    /// Print the tree of each top-level node after parsing.
    pub dump_ast: bool,
    /// Print the parser's derivation trace.
    pub trace: bool,
}

/// One compiler run over one source text.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline, printing output to stdout and diagnostics to
    /// stderr.
    pub fn run(&self) -> anyhow::Result<Outcome> {
        let source = match &self.config.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => SAMPLE_PROGRAM.to_owned(),
        };

        let mut handler = Handler::new();

        // Phase 1: lexing.
        let mut lexer = Lexer::new();
        if !lexer.lex(&source) {
            handler.error("unlexable input", lexer.location());
            report(&handler);
            return Ok(Outcome::LexFailure);
        }
        log::info!("lexed {} tokens", lexer.tokens.len());
        if self.config.dump_tokens {
            for token in &lexer.tokens {
                println!("\t{}", token);
            }
        }

        // Phase 2: parsing.
        let mut parser = Parser::new(lexer.tokens);
        let (nodes, leftover) = parser.parse();
        if self.config.trace {
            eprintln!("{}", parser.trace().render());
        }
        if let Some(token) = leftover {
            handler.error(format!("could not parse {}", token), token.location);
            report(&handler);
            return Ok(Outcome::ParseFailure);
        }
        log::info!("parsed {} top-level nodes", nodes.len());
        if self.config.dump_ast {
            for &node in &nodes {
                print!("{}", parser.ast.dump(node));
            }
        }

        // Phase 3: compilation.
        let mut compiler = Compiler::new();
        match compiler.compile(&parser.ast, &nodes) {
            Ok(output) => {
                print!("{}", output);
                Ok(Outcome::Success)
            }
            Err(error) => {
                let token = parser.ast.token(error.node);
                handler.error(error.to_string(), token.location);
                report(&handler);
                Ok(Outcome::CompileFailure)
            }
        }
    }
}

/// Print collected diagnostics to stderr.
fn report(handler: &Handler) {
    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_program_compiles() {
        let session = Session::new(Config::default());
        assert_eq!(session.run().unwrap(), Outcome::Success);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::LexFailure.exit_code(), 1);
        assert_eq!(Outcome::ParseFailure.exit_code(), 2);
        assert_eq!(Outcome::CompileFailure.exit_code(), 3);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let session = Session::new(Config {
            input: Some(PathBuf::from("/nonexistent/input.mead")),
            ..Config::default()
        });
        assert!(session.run().is_err());
    }
}
