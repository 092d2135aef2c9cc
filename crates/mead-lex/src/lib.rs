//! mead-lex - Lexical analyzer for the Mead language.
//!
//! The lexer turns source text into a stream of [`Token`]s. It is driven by
//! a fixed rule table: every rule is attempted against the start of the
//! remaining input, the longest match wins, and ties are broken by the
//! [`TokenKind`] ordinal (lower wins). Keywords therefore sit below
//! [`TokenKind::Identifier`] in the enumeration so that `fn`, `const` and
//! friends tokenize as keywords while `fnord` stays an identifier.
//!
//! Nothing here fails with an error value: an input that cannot be fully
//! tokenized simply leaves [`Lexer::lex`] returning `false`, with the
//! unconsumed rest of the input pointing at the first unmatched byte.

mod lexer;
mod rules;
mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use rules::{LexRule, Pattern};
pub use token::{Token, TokenKind};
