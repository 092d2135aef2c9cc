//! The maximal-munch lexer.

use mead_util::SourceLocation;

use crate::rules::RULES;
use crate::{Token, TokenKind};

/// Tokenizes Mead source text.
///
/// The lexer owns its output token vector, mirroring its use: the driver
/// lexes a whole input once and hands the tokens to the parser.
#[derive(Debug, Default)]
pub struct Lexer {
    /// Tokens emitted so far, in input order.
    pub tokens: Vec<Token>,
    location: SourceLocation,
}

impl Lexer {
    /// Create a lexer positioned at the start of the input.
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            location: SourceLocation::START,
        }
    }

    /// Lex everything in `input`.
    ///
    /// Returns whether the whole input was consumed. On failure the tokens
    /// produced before the first unmatched byte are retained and the
    /// location of that byte is available via [`Lexer::location`].
    pub fn lex(&mut self, input: &str) -> bool {
        let mut rest = self.skip_whitespace(input);

        while !rest.is_empty() && self.next(&mut rest) {
            rest = self.skip_whitespace(rest);
        }

        let ok = rest.is_empty();
        if !ok {
            let head: String = rest.chars().take(16).collect();
            log::debug!("lexing stopped at {}: {:?}...", self.location, head);
        }
        ok
    }

    /// Try to lex one token off the front of `input`.
    ///
    /// On success the token is appended to [`Lexer::tokens`] and `input` is
    /// advanced past its lexeme. On failure `input` is left untouched.
    pub fn next(&mut self, input: &mut &str) -> bool {
        if input.is_empty() {
            return false;
        }

        // Longest match wins; the rule table is in ordinal order, so the
        // strict comparison keeps the lowest ordinal among equal lengths.
        let mut best: Option<(usize, TokenKind)> = None;
        for rule in RULES.iter() {
            if let Some(length) = rule.attempt(input) {
                if length > 0 && best.map_or(true, |(len, _)| length > len) {
                    best = Some((length, rule.kind));
                }
            }
        }

        let Some((length, kind)) = best else {
            return false;
        };

        let lexeme = &input[..length];
        self.tokens.push(Token::new(kind, lexeme, self.location));
        self.advance(lexeme);
        *input = &input[length..];
        true
    }

    /// The location of the next byte to be lexed.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    fn skip_whitespace<'a>(&mut self, input: &'a str) -> &'a str {
        let trimmed = input.trim_start();
        self.advance(&input[..input.len() - trimmed.len()]);
        trimmed
    }

    fn advance(&mut self, consumed: &str) {
        for ch in consumed.chars() {
            self.location.advance(ch);
        }
    }
}
