//! The lexer rule table.
//!
//! Two rule flavors exist: regex rules for the open-ended token classes
//! (literals, integer-type tokens, identifiers) and literal rules for fixed
//! keywords and punctuation. All patterns are anchored at the start of the
//! remaining input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::TokenKind;

static FLOAT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d[\d']*\.\d+(?:[eE][+-]?\d+)?").unwrap());

static INTEGER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[1-9][0-9']*|0x[0-9a-fA-F][0-9a-fA-F']*|0[0-7']*)").unwrap());

static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(?:\\[\\0abefnrt"]|[^\\"])*""#).unwrap());

static CHAR_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^'(?:\\(?:[\\0abefnrt']|x[0-9a-fA-F]{2})|[^\\'])'").unwrap());

static INTEGER_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[iu](?:8|16|32|64)").unwrap());

// Identifiers start with anything that is not a digit, ASCII punctuation or
// whitespace, and continue with anything that is not punctuation or
// whitespace. Non-ASCII bytes are legal throughout.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^0-9!-/:-@\[-\^`{-~\s][^!-/:-@\[-\^`{-~\s]*").unwrap()
});

/// How a rule recognizes its prefix.
pub enum Pattern {
    /// Anchored regular expression
    Regex(&'static Lazy<Regex>),
    /// Fixed string
    Literal(&'static str),
}

/// One tokenization rule: a pattern paired with the kind it produces.
pub struct LexRule {
    pub kind: TokenKind,
    pub pattern: Pattern,
}

impl LexRule {
    const fn regex(kind: TokenKind, pattern: &'static Lazy<Regex>) -> Self {
        Self {
            kind,
            pattern: Pattern::Regex(pattern),
        }
    }

    const fn literal(kind: TokenKind, literal: &'static str) -> Self {
        Self {
            kind,
            pattern: Pattern::Literal(literal),
        }
    }

    /// Attempt this rule against the start of `input`, returning the match
    /// length in bytes.
    pub fn attempt(&self, input: &str) -> Option<usize> {
        match &self.pattern {
            Pattern::Regex(regex) => regex.find(input).map(|m| m.end()),
            Pattern::Literal(literal) => input.starts_with(literal).then(|| literal.len()),
        }
    }
}

/// The full rule table, in [`TokenKind`] ordinal order.
///
/// Ordering matters for ties only: [`crate::Lexer`] picks the longest match
/// and falls back to the earliest rule among equal lengths.
pub static RULES: Lazy<Vec<LexRule>> = Lazy::new(|| {
    use TokenKind::*;

    vec![
        LexRule::regex(FloatLiteral, &FLOAT_LITERAL),
        LexRule::regex(IntegerLiteral, &INTEGER_LITERAL),
        LexRule::regex(StringLiteral, &STRING_LITERAL),
        LexRule::regex(CharLiteral, &CHAR_LITERAL),
        LexRule::regex(IntegerType, &INTEGER_TYPE),
        LexRule::literal(Fn, "fn"),
        LexRule::literal(Const, "const"),
        LexRule::literal(Void, "void"),
        LexRule::literal(If, "if"),
        LexRule::literal(Else, "else"),
        LexRule::literal(Return, "return"),
        LexRule::literal(New, "new"),
        LexRule::literal(Delete, "delete"),
        LexRule::literal(Sizeof, "sizeof"),
        LexRule::literal(Cast, "cast"),
        LexRule::literal(Spaceship, "<=>"),
        LexRule::literal(Scope, "::"),
        LexRule::literal(Arrow, "->"),
        LexRule::literal(PlusEquals, "+="),
        LexRule::literal(MinusEquals, "-="),
        LexRule::literal(StarEquals, "*="),
        LexRule::literal(SlashEquals, "/="),
        LexRule::literal(PercentEquals, "%="),
        LexRule::literal(ShiftLeftEquals, "<<="),
        LexRule::literal(ShiftRightEquals, ">>="),
        LexRule::literal(AmpersandEquals, "&="),
        LexRule::literal(CaretEquals, "^="),
        LexRule::literal(PipeEquals, "|="),
        LexRule::literal(DoubleAmpersandEquals, "&&="),
        LexRule::literal(DoublePipeEquals, "||="),
        LexRule::literal(DoublePlus, "++"),
        LexRule::literal(DoubleMinus, "--"),
        LexRule::literal(ShiftLeft, "<<"),
        LexRule::literal(ShiftRight, ">>"),
        LexRule::literal(LessEquals, "<="),
        LexRule::literal(GreaterEquals, ">="),
        LexRule::literal(DoubleEquals, "=="),
        LexRule::literal(NotEquals, "!="),
        LexRule::literal(DoubleAmpersand, "&&"),
        LexRule::literal(DoublePipe, "||"),
        LexRule::literal(DotStar, ".*"),
        LexRule::literal(DotAmpersand, ".&"),
        LexRule::literal(Plus, "+"),
        LexRule::literal(Minus, "-"),
        LexRule::literal(Star, "*"),
        LexRule::literal(Slash, "/"),
        LexRule::literal(Percent, "%"),
        LexRule::literal(Ampersand, "&"),
        LexRule::literal(Caret, "^"),
        LexRule::literal(Pipe, "|"),
        LexRule::literal(Bang, "!"),
        LexRule::literal(Tilde, "~"),
        LexRule::literal(Equals, "="),
        LexRule::literal(OpeningAngle, "<"),
        LexRule::literal(ClosingAngle, ">"),
        LexRule::literal(Dot, "."),
        LexRule::literal(Comma, ","),
        LexRule::literal(Semicolon, ";"),
        LexRule::literal(Colon, ":"),
        LexRule::literal(OpeningParen, "("),
        LexRule::literal(ClosingParen, ")"),
        LexRule::literal(OpeningSquare, "["),
        LexRule::literal(ClosingSquare, "]"),
        LexRule::literal(OpeningBrace, "{"),
        LexRule::literal(ClosingBrace, "}"),
        LexRule::regex(Identifier, &IDENTIFIER),
    ]
});
