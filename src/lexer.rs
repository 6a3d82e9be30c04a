// ABOUTME: Turns source text into a token stream, tracking position per grapheme

use crate::error::SignoError;
use crate::position::{Origin, Position};
use crate::token::{Literal, Token, TokenKind};
use unicode_segmentation::UnicodeSegmentation;

const SPECIALS: &str = "_=+-*/^%&@!?~<>";

fn is_special(g: &str) -> bool {
    g.len() == g.chars().count() && g.chars().next().map_or(false, |c| SPECIALS.contains(c))
}

fn is_digit(g: &str) -> bool {
    let mut chars = g.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

fn is_letter(g: &str) -> bool {
    !g.is_empty() && g.chars().all(char::is_alphabetic)
}

fn is_whitespace(g: &str) -> bool {
    matches!(g, " " | "\t" | "\u{0B}" | "\r" | "\n")
}

/// Scans a source string into a flat [`Token`] stream. Position advances one
/// column per grapheme (so multi-byte UTF-8 never skews error coordinates),
/// resetting to column 1 on every `\n`.
pub struct Lexer {
    graphemes: Vec<String>,
    idx: usize,
    pos: Position,
}

impl Lexer {
    pub fn new(source: &str, origin: Origin) -> Self {
        let normalized = source.replace("\r\n", "\n");
        let graphemes = normalized
            .graphemes(true)
            .map(|g| g.to_string())
            .collect();
        Lexer {
            graphemes,
            idx: 0,
            pos: Position::start(origin),
        }
    }

    fn peek(&self) -> Option<&str> {
        self.graphemes.get(self.idx).map(|s| s.as_str())
    }

    fn peek_at(&self, offset: usize) -> Option<&str> {
        self.graphemes.get(self.idx + offset).map(|s| s.as_str())
    }

    fn advance(&mut self) -> String {
        let g = self.graphemes[self.idx].clone();
        self.pos.advance(&g);
        self.idx += 1;
        g
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SignoError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let start = self.pos.clone();
            match self.peek() {
                None => {
                    tokens.push(Token::new(TokenKind::EndOfInput, String::new(), start));
                    break;
                }
                Some(g) => {
                    let g = g.to_string();
                    tokens.push(self.next_token(&g, start)?);
                }
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(g) if is_whitespace(g) => {
                    self.advance();
                }
                Some(";") => {
                    while let Some(g) = self.peek() {
                        if g == "\n" {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self, g: &str, start: Position) -> Result<Token, SignoError> {
        match g {
            "(" => {
                self.advance();
                Ok(Token::new(TokenKind::OpeningParen, "(".into(), start))
            }
            ")" => {
                self.advance();
                Ok(Token::new(TokenKind::ClosingParen, ")".into(), start))
            }
            "'" => {
                self.advance();
                Ok(Token::new(TokenKind::QuotePrefix, "'".into(), start))
            }
            "\"" => self.lex_string(start),
            "#" => self.lex_atom(start),
            "-" if self.peek_at(1).map_or(false, is_digit) => self.lex_number(start),
            g if is_digit(g) => self.lex_number(start),
            g if is_letter(g) || is_special(g) => self.lex_symbol(start),
            g => {
                let ch = g.to_string();
                self.advance();
                Err(SignoError::lex(
                    format!("unexpected character '{}'", ch),
                    start,
                ))
            }
        }
    }

    fn lex_number(&mut self, start: Position) -> Result<Token, SignoError> {
        let mut lexeme = String::new();
        if self.peek() == Some("-") {
            lexeme.push_str(&self.advance());
        }
        while let Some(g) = self.peek() {
            if is_digit(g) {
                lexeme.push_str(&self.advance());
            } else {
                break;
            }
        }
        let mut had_dot = false;
        if self.peek() == Some(".") && self.peek_at(1).map_or(false, is_digit) {
            had_dot = true;
            lexeme.push_str(&self.advance());
            while let Some(g) = self.peek() {
                if is_digit(g) {
                    lexeme.push_str(&self.advance());
                } else {
                    break;
                }
            }
        }
        let value: f64 = lexeme
            .parse()
            .map_err(|_| SignoError::lex(format!("malformed number '{}'", lexeme), start.clone()))?;
        Ok(Token::new(
            TokenKind::Literal(Literal::Number(value, had_dot)),
            lexeme,
            start,
        ))
    }

    fn lex_string(&mut self, start: Position) -> Result<Token, SignoError> {
        self.advance();
        let mut s = String::new();
        loop {
            match self.peek() {
                None => return Err(SignoError::lex("unterminated string", start)),
                Some("\"") => {
                    self.advance();
                    break;
                }
                Some(g) => {
                    s.push_str(g);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::Literal(Literal::String(s.clone())), s, start))
    }

    fn lex_atom(&mut self, start: Position) -> Result<Token, SignoError> {
        self.advance();
        let mut name = String::new();
        while let Some(g) = self.peek() {
            if is_letter(g) || is_digit(g) || is_special(g) {
                name.push_str(&self.advance());
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(SignoError::lex("'#' with no atom name", start));
        }
        let lexeme = format!("#{}", name);
        Ok(Token::new(TokenKind::Literal(Literal::Atom(name)), lexeme, start))
    }

    fn lex_symbol(&mut self, start: Position) -> Result<Token, SignoError> {
        let mut name = String::new();
        while let Some(g) = self.peek() {
            if is_letter(g) || is_digit(g) || is_special(g) {
                name.push_str(&self.advance());
            } else {
                break;
            }
        }
        Ok(Token::new(TokenKind::Symbol(name.clone()), name, start))
    }
}

/// Convenience entry point matching the host API's `lex`.
pub fn lex(source: &str, origin: Origin) -> Result<Vec<Token>, SignoError> {
    Lexer::new(source, origin).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src, Origin::Repl)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_parens_and_symbols() {
        let ks = kinds("(+ 1 2)");
        assert_eq!(
            ks,
            vec![
                TokenKind::OpeningParen,
                TokenKind::Symbol("+".into()),
                TokenKind::Literal(Literal::Number(1.0, false)),
                TokenKind::Literal(Literal::Number(2.0, false)),
                TokenKind::ClosingParen,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn lexes_negative_number_vs_minus_symbol() {
        let ks = kinds("(- -3 x)");
        assert_eq!(
            ks,
            vec![
                TokenKind::OpeningParen,
                TokenKind::Symbol("-".into()),
                TokenKind::Literal(Literal::Number(-3.0, false)),
                TokenKind::Symbol("x".into()),
                TokenKind::ClosingParen,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn lexes_float_with_decimal_point() {
        let ks = kinds("2.5");
        assert_eq!(ks[0], TokenKind::Literal(Literal::Number(2.5, true)));
    }

    #[test]
    fn lexes_atom_string_and_quote() {
        let ks = kinds("'(#true \"hi\")");
        assert_eq!(
            ks,
            vec![
                TokenKind::QuotePrefix,
                TokenKind::OpeningParen,
                TokenKind::Literal(Literal::Atom("true".into())),
                TokenKind::Literal(Literal::String("hi".into())),
                TokenKind::ClosingParen,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn discards_whitespace_and_line_comments() {
        let ks = kinds("; a comment\n  42 ; trailing\n");
        assert_eq!(
            ks,
            vec![
                TokenKind::Literal(Literal::Number(42.0, false)),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn unexpected_character_is_a_lex_error() {
        let err = lex("@", Origin::Repl).unwrap();
        // '@' is a special character, valid as a symbol start.
        assert_eq!(err[0].kind, TokenKind::Symbol("@".into()));
        let err = lex("$", Origin::Repl).unwrap_err();
        assert!(matches!(err, SignoError::Lex { .. }));
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let err = lex("\"abc", Origin::Repl).unwrap_err();
        assert!(matches!(err, SignoError::Lex { .. }));
    }

    #[test]
    fn position_tracks_rows_and_columns() {
        let tokens = lex("1\n22", Origin::Repl).unwrap();
        assert_eq!(tokens[0].pos.row, 1);
        assert_eq!(tokens[0].pos.col, 1);
        assert_eq!(tokens[1].pos.row, 2);
        assert_eq!(tokens[1].pos.col, 1);
    }
}
