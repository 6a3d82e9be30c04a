// ABOUTME: Recursive-descent parser turning a token stream into AST expressions

use crate::error::SignoError;
use crate::position::Position;
use crate::token::{Literal, Token, TokenKind};
use crate::value::{Expr, Number};

/// Consumes the flat token stream produced by the lexer and builds the AST.
/// Kept separate from the lexer so that position bookkeeping lives in one
/// place and this stage only ever reasons about token boundaries.
pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, idx: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.idx]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.idx].clone();
        if self.idx + 1 < self.tokens.len() {
            self.idx += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::EndOfInput)
    }

    /// Parses every top-level expression up to end-of-input.
    pub fn parse_program(mut self) -> Result<Vec<Expr>, SignoError> {
        let mut exprs = Vec::new();
        while !self.at_end() {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> Result<Expr, SignoError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Literal(Literal::Number(value, had_dot)) => {
                if had_dot {
                    Ok(Expr::Number(Number::Float(value)))
                } else {
                    Ok(Expr::Number(Number::Int(value as i64)))
                }
            }
            TokenKind::Literal(Literal::Atom(name)) => Ok(Expr::Atom(name)),
            TokenKind::Literal(Literal::String(s)) => Ok(Expr::String(s)),
            TokenKind::Symbol(name) => Ok(Expr::Symbol(name, tok.pos)),
            TokenKind::QuotePrefix => {
                let inner = self.parse_expr()?;
                Ok(quote(inner))
            }
            TokenKind::OpeningParen => self.parse_list(tok.pos),
            TokenKind::ClosingParen => Err(SignoError::parse(
                "unexpected ')'".to_string(),
                tok.pos,
            )),
            TokenKind::EndOfInput => Err(SignoError::parse(
                "unexpected end of input".to_string(),
                tok.pos,
            )),
        }
    }

    /// `open_pos` is the position of the `(` that was already consumed.
    fn parse_list(&mut self, open_pos: Position) -> Result<Expr, SignoError> {
        let mut items = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::ClosingParen => {
                    self.advance();
                    break;
                }
                TokenKind::EndOfInput => {
                    return Err(SignoError::parse("unclosed list".to_string(), open_pos));
                }
                _ => items.push(self.parse_expr()?),
            }
        }
        if items.is_empty() {
            Ok(Expr::Nil)
        } else {
            Ok(Expr::List(items, open_pos))
        }
    }
}

/// `'expr` desugars to the Value directly when `expr` is already
/// self-evaluating, and to `Quoted(expr)` otherwise (spec.md §4.2).
fn quote(inner: Expr) -> Expr {
    match inner {
        Expr::Nil
        | Expr::Number(_)
        | Expr::Atom(_)
        | Expr::String(_)
        | Expr::Lambda(_)
        | Expr::Builtin(_)
        | Expr::SpecialForm(_) => inner,
        other => Expr::Quoted(Box::new(other)),
    }
}

/// Convenience entry point matching the host API's `parse`.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Expr>, SignoError> {
    Parser::new(tokens).parse_program()
}
