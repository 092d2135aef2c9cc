//! Expression parsing: a sixteen-level precedence ladder.
//!
//! Every level `k` parses `E(k) = E(k-1) P(k)` where `P(k)` folds further
//! operators of that level left-associatively. Levels 0 through 3 are the
//! primary, scope, postfix and prefix productions; levels 4 through 14 are
//! the binary operator groups; level 15 is right-associative assignment plus
//! the if-expression; level 16 folds comma sequences when the context allows
//! them.
//!
//! One fold step is speculative: if the right-hand side fails after the
//! operator was consumed, the step unwinds and the accumulated left-hand
//! side is produced unchanged.

use mead_lex::TokenKind;

use crate::{NodeId, NodeKind, PResult, Parser};

/// Precedence levels, lowest binding at the bottom of the ladder.
pub(crate) mod prec {
    pub const PRIMARY: u8 = 0;
    pub const SCOPE: u8 = 1;
    pub const POSTFIX: u8 = 2;
    pub const PREFIX: u8 = 3;
    pub const MULTIPLICATIVE: u8 = 4;
    pub const ADDITIVE: u8 = 5;
    pub const SHIFT: u8 = 6;
    pub const SPACESHIP: u8 = 7;
    pub const RELATIONAL: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const BITWISE_AND: u8 = 10;
    pub const BITWISE_XOR: u8 = 11;
    pub const BITWISE_OR: u8 = 12;
    pub const LOGICAL_AND: u8 = 13;
    pub const LOGICAL_OR: u8 = 14;
    pub const ASSIGNMENT: u8 = 15;
    pub const COMMA: u8 = 16;
}

/// Context threaded through expression productions.
///
/// Argument lists force `comma_allowed` off so that `f(a, b)` parses as two
/// arguments rather than one comma expression; parentheses and statement
/// positions restore it.
#[derive(Clone, Copy, Debug)]
pub struct ExprCtx {
    pub comma_allowed: bool,
}

impl Default for ExprCtx {
    fn default() -> Self {
        Self { comma_allowed: true }
    }
}

impl ExprCtx {
    /// The context inside an argument list.
    pub fn argument() -> Self {
        Self {
            comma_allowed: false,
        }
    }
}

const COMPOUND_ASSIGN: &[TokenKind] = &[
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::StarEquals,
    TokenKind::SlashEquals,
    TokenKind::PercentEquals,
    TokenKind::ShiftLeftEquals,
    TokenKind::ShiftRightEquals,
    TokenKind::AmpersandEquals,
    TokenKind::CaretEquals,
    TokenKind::PipeEquals,
    TokenKind::DoubleAmpersandEquals,
    TokenKind::DoublePipeEquals,
];

impl Parser {
    /// Parse one expression.
    pub fn take_expression(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        self.scoped("expression", |p| p.take_expr(prec::COMMA, ctx))
    }

    fn take_expr(&mut self, level: u8, ctx: ExprCtx) -> PResult<NodeId> {
        match level {
            prec::PRIMARY => self.take_primary(),
            prec::SCOPE => self.take_scope_level(ctx),
            prec::POSTFIX => self.take_postfix_level(ctx),
            prec::PREFIX => self.take_prefix_level(ctx),
            prec::ASSIGNMENT => self.take_assignment_level(ctx),
            prec::COMMA => self.take_comma_level(ctx),
            _ => self.take_binary_level(level, ctx),
        }
    }

    // ------------------------------------------------------------------
    // Level 0: primary
    // ------------------------------------------------------------------

    fn take_primary(&mut self) -> PResult<NodeId> {
        if self.take(TokenKind::OpeningParen).is_some() {
            let inner = self.take_expr(prec::COMMA, ExprCtx::default())?;
            self.expect(TokenKind::ClosingParen, "')' to close the parenthetical")?;
            return Ok(inner);
        }

        if let Some(token) = self.take(TokenKind::Identifier) {
            return Ok(self.ast.alloc(NodeKind::Identifier, token));
        }

        let number = self
            .take(TokenKind::IntegerLiteral)
            .or_else(|| self.take(TokenKind::FloatLiteral))
            .or_else(|| self.take(TokenKind::CharLiteral));
        if let Some(token) = number {
            return Ok(self.ast.alloc(NodeKind::Number, token));
        }

        if let Some(token) = self.take(TokenKind::StringLiteral) {
            return Ok(self.ast.alloc(NodeKind::String, token));
        }

        Err(self.error("expected an expression"))
    }

    // ------------------------------------------------------------------
    // Level 1: scope resolution
    // ------------------------------------------------------------------

    fn take_scope_level(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        let mut acc = self.take_expr(prec::PRIMARY, ctx)?;

        while self.peek_kind(TokenKind::Scope) {
            let step = self.attempt(|p| {
                let token = p.take(TokenKind::Scope).expect("peeked");
                let rhs = p.take_expr(prec::PRIMARY, ctx)?;
                Ok((token, rhs))
            });
            match step {
                Ok((token, rhs)) => acc = self.fold_pair(NodeKind::ScopeResolution, token, acc, rhs),
                Err(_) => break,
            }
        }

        Ok(acc)
    }

    // ------------------------------------------------------------------
    // Level 2: postfix
    // ------------------------------------------------------------------

    fn take_postfix_level(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        let mut acc = match self.attempt(|p| p.take_constructor_call()) {
            Ok(node) => node,
            Err(_) => self.take_expr(prec::SCOPE, ctx)?,
        };

        loop {
            if self.peek_kind(TokenKind::OpeningParen) {
                let step = self.attempt(|p| {
                    let token = p.take(TokenKind::OpeningParen).expect("peeked");
                    let arguments = p.take_call_arguments()?;
                    p.expect(TokenKind::ClosingParen, "')' to close the argument list")?;
                    Ok((token, arguments))
                });
                match step {
                    Ok((token, arguments)) => {
                        let node = self.ast.alloc(NodeKind::FunctionCall, token);
                        self.ast.reparent(acc, node);
                        for argument in arguments {
                            self.ast.reparent(argument, node);
                        }
                        acc = node;
                    }
                    Err(_) => break,
                }
            } else if self.peek_kind(TokenKind::OpeningSquare) {
                let step = self.attempt(|p| {
                    let token = p.take(TokenKind::OpeningSquare).expect("peeked");
                    let index = p.take_expr(prec::COMMA, ExprCtx::default())?;
                    p.expect(TokenKind::ClosingSquare, "']' to close the subscript")?;
                    Ok((token, index))
                });
                match step {
                    Ok((token, index)) => acc = self.fold_pair(NodeKind::Subscript, token, acc, index),
                    Err(_) => break,
                }
            } else if self.peek_kind(TokenKind::Dot) {
                let step = self.attempt(|p| {
                    let token = p.take(TokenKind::Dot).expect("peeked");
                    let member = p.expect(TokenKind::Identifier, "a member name after '.'")?;
                    Ok((token, member))
                });
                match step {
                    Ok((token, member)) => {
                        let member_node = self.ast.alloc(NodeKind::Identifier, member);
                        acc = self.fold_pair(NodeKind::AccessMember, token, acc, member_node);
                    }
                    Err(_) => break,
                }
            } else if let Some(token) = self.take(TokenKind::DotStar) {
                acc = self.fold_single(NodeKind::Deref, token, acc);
            } else if let Some(token) = self.take(TokenKind::DotAmpersand) {
                acc = self.fold_single(NodeKind::GetAddress, token, acc);
            } else if let Some(token) = self.take(TokenKind::DoublePlus) {
                acc = self.fold_single(NodeKind::PostfixIncrement, token, acc);
            } else if let Some(token) = self.take(TokenKind::DoubleMinus) {
                acc = self.fold_single(NodeKind::PostfixDecrement, token, acc);
            } else {
                break;
            }
        }

        Ok(acc)
    }

    /// `type "(" arguments ")"`
    fn take_constructor_call(&mut self) -> PResult<NodeId> {
        let ty = self.take_type(true)?;
        self.expect(TokenKind::OpeningParen, "'(' after the constructed type")?;
        let arguments = self.take_call_arguments()?;
        self.expect(TokenKind::ClosingParen, "')' to close the argument list")?;

        let token = self.ast.token(ty).clone();
        let node = self.ast.alloc(NodeKind::ConstructorCall, token);
        self.ast.reparent(ty, node);
        for argument in arguments {
            self.ast.reparent(argument, node);
        }
        Ok(node)
    }

    /// Comma-separated arguments up to a closing parenthesis. Comma folding
    /// is off for each argument.
    fn take_call_arguments(&mut self) -> PResult<Vec<NodeId>> {
        let mut arguments = Vec::new();
        if self.peek_kind(TokenKind::ClosingParen) {
            return Ok(arguments);
        }

        arguments.push(self.take_expr(prec::COMMA, ExprCtx::argument())?);
        while self.take(TokenKind::Comma).is_some() {
            arguments.push(self.take_expr(prec::COMMA, ExprCtx::argument())?);
        }
        Ok(arguments)
    }

    // ------------------------------------------------------------------
    // Level 3: unary prefix
    // ------------------------------------------------------------------

    fn take_prefix_level(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        let prefix = [
            (TokenKind::DoublePlus, NodeKind::PrefixIncrement),
            (TokenKind::DoubleMinus, NodeKind::PrefixDecrement),
            (TokenKind::Plus, NodeKind::UnaryPlus),
            (TokenKind::Minus, NodeKind::UnaryMinus),
            (TokenKind::Bang, NodeKind::LogicalNot),
            (TokenKind::Tilde, NodeKind::BitwiseNot),
        ];
        for (token_kind, node_kind) in prefix {
            if let Some(token) = self.take(token_kind) {
                let operand = self.take_expr(prec::PREFIX, ctx)?;
                return Ok(self.fold_single(node_kind, token, operand));
            }
        }

        if self.peek_kind(TokenKind::Cast) {
            return self.take_cast();
        }
        if self.peek_kind(TokenKind::Sizeof) {
            return self.take_sizeof();
        }
        if self.peek_kind(TokenKind::New) {
            return self.take_new();
        }
        if let Some(token) = self.take(TokenKind::Delete) {
            let operand = self.take_expr(prec::PREFIX, ctx)?;
            return Ok(self.fold_single(NodeKind::Delete, token, operand));
        }

        self.take_expr(prec::POSTFIX, ctx)
    }

    /// `"cast" "<" type ">" "(" expression ")"`
    fn take_cast(&mut self) -> PResult<NodeId> {
        let token = self.expect(TokenKind::Cast, "'cast'")?;
        self.expect(TokenKind::OpeningAngle, "'<' after 'cast'")?;
        let ty = self.take_type(true)?;
        self.expect(TokenKind::ClosingAngle, "'>' after the cast type")?;
        self.expect(TokenKind::OpeningParen, "'(' after the cast type")?;
        let value = self.take_expr(prec::COMMA, ExprCtx::default())?;
        self.expect(TokenKind::ClosingParen, "')' to close the cast")?;

        let node = self.ast.alloc(NodeKind::Cast, token);
        self.ast.reparent(ty, node);
        self.ast.reparent(value, node);
        Ok(node)
    }

    /// `"sizeof" "(" expression ")"`; the operand is an expression, never
    /// a bare type name.
    fn take_sizeof(&mut self) -> PResult<NodeId> {
        let token = self.expect(TokenKind::Sizeof, "'sizeof'")?;
        self.expect(TokenKind::OpeningParen, "'(' after 'sizeof'")?;
        let value = self.take_expr(prec::COMMA, ExprCtx::default())?;
        self.expect(TokenKind::ClosingParen, "')' to close the sizeof")?;
        Ok(self.fold_single(NodeKind::Sizeof, token, value))
    }

    /// `"new" type ("(" arguments ")" | "[" expression "]")?`
    fn take_new(&mut self) -> PResult<NodeId> {
        let token = self.expect(TokenKind::New, "'new'")?;
        let ty = self.take_type(true)?;

        if self.take(TokenKind::OpeningParen).is_some() {
            let arguments = self.take_call_arguments()?;
            self.expect(TokenKind::ClosingParen, "')' to close the argument list")?;
            let node = self.ast.alloc(NodeKind::SingleNew, token);
            self.ast.reparent(ty, node);
            for argument in arguments {
                self.ast.reparent(argument, node);
            }
            return Ok(node);
        }

        if self.take(TokenKind::OpeningSquare).is_some() {
            let count = self.take_expr(prec::COMMA, ExprCtx::default())?;
            self.expect(TokenKind::ClosingSquare, "']' to close the array length")?;
            let node = self.ast.alloc(NodeKind::ArrayNew, token);
            self.ast.reparent(ty, node);
            self.ast.reparent(count, node);
            return Ok(node);
        }

        let node = self.ast.alloc(NodeKind::SingleNew, token);
        self.ast.reparent(ty, node);
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Levels 4-14: binary operator groups
    // ------------------------------------------------------------------

    fn binary_operators(level: u8) -> &'static [TokenKind] {
        use TokenKind::*;
        match level {
            prec::MULTIPLICATIVE => &[Star, Slash, Percent],
            prec::ADDITIVE => &[Plus, Minus],
            prec::SHIFT => &[ShiftLeft, ShiftRight],
            prec::SPACESHIP => &[Spaceship],
            prec::RELATIONAL => &[OpeningAngle, LessEquals, ClosingAngle, GreaterEquals],
            prec::EQUALITY => &[DoubleEquals, NotEquals],
            prec::BITWISE_AND => &[Ampersand],
            prec::BITWISE_XOR => &[Caret],
            prec::BITWISE_OR => &[Pipe],
            prec::LOGICAL_AND => &[DoubleAmpersand],
            prec::LOGICAL_OR => &[DoublePipe],
            _ => unreachable!("no binary operator table for level {level}"),
        }
    }

    fn take_binary_level(&mut self, level: u8, ctx: ExprCtx) -> PResult<NodeId> {
        let operators = Self::binary_operators(level);
        let mut acc = self.take_expr(level - 1, ctx)?;

        loop {
            let Some(&op) = operators.iter().find(|&&kind| self.peek_kind(kind)) else {
                break;
            };
            let step = self.attempt(|p| {
                let token = p.take(op).expect("peeked");
                let rhs = p.take_expr(level - 1, ctx)?;
                Ok((token, rhs))
            });
            match step {
                Ok((token, rhs)) => acc = self.fold_pair(NodeKind::Binary, token, acc, rhs),
                Err(_) => break,
            }
        }

        Ok(acc)
    }

    // ------------------------------------------------------------------
    // Level 15: assignment and if-expression
    // ------------------------------------------------------------------

    fn take_assignment_level(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        if self.peek_kind(TokenKind::If) {
            return self.take_if_expression();
        }

        let lhs = self.take_expr(prec::LOGICAL_OR, ctx)?;

        let op = if self.peek_kind(TokenKind::Equals) {
            Some((TokenKind::Equals, NodeKind::Assign))
        } else {
            COMPOUND_ASSIGN
                .iter()
                .find(|&&kind| self.peek_kind(kind))
                .map(|&kind| (kind, NodeKind::CompoundAssign))
        };

        let Some((token_kind, node_kind)) = op else {
            return Ok(lhs);
        };

        // Right-associative: the right-hand side re-enters this level.
        let step = self.attempt(|p| {
            let token = p.take(token_kind).expect("peeked");
            let rhs = p.take_expr(prec::ASSIGNMENT, ctx)?;
            Ok((token, rhs))
        });
        match step {
            Ok((token, rhs)) => Ok(self.fold_pair(node_kind, token, lhs, rhs)),
            Err(_) => Ok(lhs),
        }
    }

    /// `"if" expression block ("else" block)?` in expression position.
    fn take_if_expression(&mut self) -> PResult<NodeId> {
        let token = self.expect(TokenKind::If, "'if'")?;
        let condition = self.take_expr(prec::COMMA, ExprCtx::default())?;
        let then_block = self.take_block()?;
        let else_block = if self.take(TokenKind::Else).is_some() {
            Some(self.take_block()?)
        } else {
            None
        };

        let node = self.ast.alloc(NodeKind::ConditionalExpression, token);
        self.ast.reparent(condition, node);
        self.ast.reparent(then_block, node);
        if let Some(else_block) = else_block {
            self.ast.reparent(else_block, node);
        }
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Level 16: comma
    // ------------------------------------------------------------------

    fn take_comma_level(&mut self, ctx: ExprCtx) -> PResult<NodeId> {
        let mut acc = self.take_expr(prec::ASSIGNMENT, ctx)?;
        if !ctx.comma_allowed {
            return Ok(acc);
        }

        while self.peek_kind(TokenKind::Comma) {
            let step = self.attempt(|p| {
                let token = p.take(TokenKind::Comma).expect("peeked");
                let rhs = p.take_expr(prec::ASSIGNMENT, ctx)?;
                Ok((token, rhs))
            });
            match step {
                Ok((token, rhs)) => acc = self.fold_pair(NodeKind::Comma, token, acc, rhs),
                Err(_) => break,
            }
        }

        Ok(acc)
    }

    // ------------------------------------------------------------------
    // Node folding helpers
    // ------------------------------------------------------------------

    fn fold_single(&mut self, kind: NodeKind, token: mead_lex::Token, operand: NodeId) -> NodeId {
        let node = self.ast.alloc(kind, token);
        self.ast.reparent(operand, node);
        node
    }

    fn fold_pair(
        &mut self,
        kind: NodeKind,
        token: mead_lex::Token,
        lhs: NodeId,
        rhs: NodeId,
    ) -> NodeId {
        let node = self.ast.alloc(kind, token);
        self.ast.reparent(lhs, node);
        self.ast.reparent(rhs, node);
        node
    }
}
