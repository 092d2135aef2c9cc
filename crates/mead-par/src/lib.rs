//! mead-par - Recursive-descent parser for the Mead language.
//!
//! The parser consumes a token vector in one shot and produces a vector of
//! top-level AST nodes: variable declarations and definitions, function
//! declarations and definitions. Expressions are parsed by a sixteen-level
//! precedence ladder; every production backtracks cleanly, so a failed
//! alternative leaves the token cursor exactly where it started.
//!
//! Each attempted production leaves Start / Success / Failure breadcrumbs in
//! a deferred [`Trace`], which makes failed parses diagnosable after the
//! fact without paying for output during the parse.

mod ast;
mod expr;
mod items;
mod stmt;
mod trace;
mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::{Ast, Node, NodeId, NodeKind};
pub use expr::ExprCtx;
pub use trace::Trace;
pub use types::TypeNames;

use mead_lex::{Token, TokenKind};
use thiserror::Error;

/// Why and where a production failed.
///
/// The token is the one the cursor was looking at when the failure was
/// raised; for failures at the end of input it is the end marker.
#[derive(Clone, Debug, Error)]
#[error("{message} at {token}")]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

/// Result of one production attempt.
pub type PResult<T> = Result<T, ParseError>;

/// The Mead parser.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Arena holding every node built during this parse.
    pub ast: Ast,
    type_names: TypeNames,
    trace: Trace,
}

impl Parser {
    /// Create a parser over a token vector.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            ast: Ast::new(),
            type_names: TypeNames::with_primitives(),
            trace: Trace::new(),
        }
    }

    /// Parse the whole token stream.
    ///
    /// Returns the top-level nodes parsed plus the first token no
    /// alternative applied to, or `None` if the stream was fully consumed.
    /// Stray top-level semicolons are consumed silently.
    pub fn parse(&mut self) -> (Vec<NodeId>, Option<Token>) {
        let mut nodes = Vec::new();

        let leftover = loop {
            if self.at_end() {
                break None;
            }
            if self.take(TokenKind::Semicolon).is_some() {
                continue;
            }

            let item = self
                .take_function_definition()
                .or_else(|_| self.take_function_declaration())
                .or_else(|_| self.take_variable_definition())
                .or_else(|_| self.take_variable_declaration());

            match item {
                Ok(node) => nodes.push(node),
                Err(_) => break Some(self.current()),
            }
        };

        if log::log_enabled!(log::Level::Trace) {
            for line in self.trace.lines() {
                log::trace!("{}", line);
            }
        }

        (nodes, leftover)
    }

    /// The derivation trace collected so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Register a type name the parser should treat as known.
    pub fn register_type_name(&mut self, name: impl Into<String>) {
        self.type_names.insert(name);
    }

    // ------------------------------------------------------------------
    // Cursor primitives
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The token under the cursor, or the end marker past the last token.
    fn current(&self) -> Token {
        match self.tokens.get(self.position) {
            Some(token) => token.clone(),
            None => {
                let location = self
                    .tokens
                    .last()
                    .map(|t| t.location)
                    .unwrap_or_default();
                Token::end_marker(location)
            }
        }
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| t.kind == kind)
    }

    /// Consume the current token if it has the given kind.
    fn take(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind(kind) {
            let token = self.tokens[self.position].clone();
            self.position += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail with a message naming it.
    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        self.take(kind)
            .ok_or_else(|| self.error(format!("expected {}", what)))
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            token: self.current(),
        }
    }

    // ------------------------------------------------------------------
    // Backtracking
    // ------------------------------------------------------------------

    /// Run a production with full save/restore and trace breadcrumbs.
    ///
    /// On failure the token cursor and the node arena are rolled back to
    /// their state at entry, so repeated failures leave the input untouched.
    fn scoped<T>(
        &mut self,
        production: &'static str,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let position = self.position;
        let nodes = self.ast.len();
        self.trace.start(production, self.current());

        match f(self) {
            Ok(value) => {
                self.trace.success(production);
                Ok(value)
            }
            Err(error) => {
                self.trace.failure(production, &error.message);
                self.position = position;
                self.ast.truncate(nodes);
                Err(error)
            }
        }
    }

    /// Save/restore without a trace frame, for speculative sub-steps such
    /// as one fold iteration of a binary level.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let position = self.position;
        let nodes = self.ast.len();
        match f(self) {
            ok @ Ok(_) => ok,
            Err(error) => {
                self.position = position;
                self.ast.truncate(nodes);
                Err(error)
            }
        }
    }
}
