//! String operations: length, upcase, downcase, capitalize, trim, concat
//!
//! `length` and `concat` dispatch on either Strings or Lists, matching
//! `concat`'s "strings OR lists — dispatched on element type" wording
//! (spec.md §4.8); `first`/`last`/`nth` are the same dual-dispatch builtins
//! registered by [`crate::builtins::lists`].

use crate::env::Environment;
use crate::error::SignoError;
use crate::position::Position;
use crate::value::{Expr, Number};
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

fn type_err(pos: &Position, msg: impl Into<String>) -> SignoError {
    SignoError::type_error(msg.into(), pos.clone())
}

fn as_str(expr: &Expr, pos: &Position, who: &str) -> Result<&str, SignoError> {
    match expr {
        Expr::String(s) => Ok(s.as_str()),
        other => Err(type_err(pos, format!("'{}' expects a string, got {}", who, other.type_name()))),
    }
}

/// Grapheme count of a String, or element count of a List.
///
/// # Examples
///
/// ```lisp
/// (length "hello") => 5
/// (length '(1 2 3)) => 3
/// ```
pub fn builtin_length(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'length' expects 1 argument"));
    }
    let n = match &args[0] {
        Expr::String(s) => s.graphemes(true).count(),
        Expr::List(items, _) => items.len(),
        Expr::Nil => 0,
        other => return Err(type_err(pos, format!("'length' expects a string or list, got {}", other.type_name()))),
    };
    Ok(Expr::Number(Number::Int(n as i64)))
}

pub fn builtin_upcase(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'upcase' expects 1 argument"));
    }
    Ok(Expr::String(as_str(&args[0], pos, "upcase")?.to_uppercase()))
}

pub fn builtin_downcase(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'downcase' expects 1 argument"));
    }
    Ok(Expr::String(as_str(&args[0], pos, "downcase")?.to_lowercase()))
}

/// Uppercases the first grapheme, lowercases the rest.
pub fn builtin_capitalize(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'capitalize' expects 1 argument"));
    }
    let s = as_str(&args[0], pos, "capitalize")?;
    let mut graphemes = s.graphemes(true);
    let capitalized = match graphemes.next() {
        Some(first) => first.to_uppercase() + &graphemes.as_str().to_lowercase(),
        None => String::new(),
    };
    Ok(Expr::String(capitalized))
}

pub fn builtin_trim(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'trim' expects 1 argument"));
    }
    Ok(Expr::String(as_str(&args[0], pos, "trim")?.trim().to_string()))
}

/// Concatenates all arguments: Strings concatenate into a String, Lists
/// concatenate into a List. Mixing the two kinds is a type error.
///
/// # Examples
///
/// ```lisp
/// (concat "foo" "bar") => "foobar"
/// (concat '(1 2) '(3 4)) => (1 2 3 4)
/// ```
pub fn builtin_concat(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    match args.first() {
        None => Ok(Expr::Nil),
        Some(Expr::String(_)) => {
            let mut out = String::new();
            for arg in args {
                out.push_str(as_str(arg, pos, "concat")?);
            }
            Ok(Expr::String(out))
        }
        Some(Expr::List(..)) | Some(Expr::Nil) => {
            let mut out = Vec::new();
            for arg in args {
                match arg {
                    Expr::List(items, _) => out.extend(items.iter().cloned()),
                    Expr::Nil => {}
                    other => {
                        return Err(type_err(pos, format!("'concat' expects all lists, got {}", other.type_name())))
                    }
                }
            }
            if out.is_empty() {
                Ok(Expr::Nil)
            } else {
                Ok(Expr::List(out, pos.clone()))
            }
        }
        Some(other) => Err(type_err(pos, format!("'concat' expects strings or lists, got {}", other.type_name()))),
    }
}

pub fn register(env: &Rc<Environment>) {
    macro_rules! def {
        ($name:expr, $func:expr) => {
            env.define($name, Expr::Builtin(crate::value::Builtin { name: $name, func: $func }));
        };
    }
    def!("length", builtin_length);
    def!("upcase", builtin_upcase);
    def!("downcase", builtin_downcase);
    def!("capitalize", builtin_capitalize);
    def!("trim", builtin_trim);
    def!("concat", builtin_concat);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    #[test]
    fn length_counts_graphemes_not_bytes() {
        let result = builtin_length(&[Expr::String("héllo".into())], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 5.0));
    }

    #[test]
    fn capitalize_upcases_first_and_lowers_rest() {
        let result = builtin_capitalize(&[Expr::String("hELLO".into())], &pos()).unwrap();
        assert!(matches!(result, Expr::String(s) if s == "Hello"));
    }

    #[test]
    fn trim_strips_surrounding_whitespace() {
        let result = builtin_trim(&[Expr::String("  hi  ".into())], &pos()).unwrap();
        assert!(matches!(result, Expr::String(s) if s == "hi"));
    }

    #[test]
    fn concat_strings() {
        let result = builtin_concat(&[Expr::String("foo".into()), Expr::String("bar".into())], &pos()).unwrap();
        assert!(matches!(result, Expr::String(s) if s == "foobar"));
    }

    #[test]
    fn concat_lists() {
        let a = Expr::List(vec![Expr::int(1), Expr::int(2)], pos());
        let b = Expr::List(vec![Expr::int(3)], pos());
        let result = builtin_concat(&[a, b], &pos()).unwrap();
        assert!(matches!(result, Expr::List(items, _) if items.len() == 3));
    }
}
