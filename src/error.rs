// ABOUTME: Error taxonomy for lexing, parsing and evaluation failures

use crate::position::Position;
use thiserror::Error;

/// The five error kinds from spec.md §7, each carrying the [`Position`] at
/// which the problem was detected.
#[derive(Error, Debug, Clone)]
pub enum SignoError {
    #[error("[LexError] {message} at {pos}")]
    Lex { message: String, pos: Position },

    #[error("[ParseError] {message} at {pos}")]
    Parse { message: String, pos: Position },

    #[error("[ReferenceError] undefined symbol '{name}' at {pos}")]
    Reference { name: String, pos: Position },

    #[error("[TypeError] {message} at {pos}")]
    Type { message: String, pos: Position },

    #[error("[RuntimeError] {message} at {pos}")]
    Runtime { message: String, pos: Position },
}

impl SignoError {
    pub fn lex(message: impl Into<String>, pos: Position) -> Self {
        SignoError::Lex {
            message: message.into(),
            pos,
        }
    }

    pub fn parse(message: impl Into<String>, pos: Position) -> Self {
        SignoError::Parse {
            message: message.into(),
            pos,
        }
    }

    pub fn reference(name: impl Into<String>, pos: Position) -> Self {
        SignoError::Reference {
            name: name.into(),
            pos,
        }
    }

    pub fn type_error(message: impl Into<String>, pos: Position) -> Self {
        SignoError::Type {
            message: message.into(),
            pos,
        }
    }

    pub fn runtime(message: impl Into<String>, pos: Position) -> Self {
        SignoError::Runtime {
            message: message.into(),
            pos,
        }
    }

    /// The position the error was raised at, regardless of kind.
    pub fn position(&self) -> &Position {
        match self {
            SignoError::Lex { pos, .. }
            | SignoError::Parse { pos, .. }
            | SignoError::Reference { pos, .. }
            | SignoError::Type { pos, .. }
            | SignoError::Runtime { pos, .. } => pos,
        }
    }
}
