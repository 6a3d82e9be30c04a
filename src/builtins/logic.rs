//! Logic operations: not, and, or, nor, xor
//!
//! Every operand is accepted — these use truthiness, not a boolean type —
//! and since builtins receive their arguments already evaluated, none of
//! these short-circuit (spec.md §4.4: "Builtins are NOT short-circuiting").

use crate::env::Environment;
use crate::error::SignoError;
use crate::position::Position;
use crate::value::Expr;
use std::rc::Rc;

/// Returns `#false` if every argument is truthy... no: returns the negation
/// of a single truthy/falsy value.
///
/// # Examples
///
/// ```lisp
/// (not #false) => #true
/// (not 5) => #false
/// ```
pub fn builtin_not(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(SignoError::type_error("'not' expects 1 argument", pos.clone()));
    }
    Ok(Expr::bool(!args[0].is_truthy()))
}

/// `#true` when every argument is truthy.
///
/// # Examples
///
/// ```lisp
/// (and #true #true) => #true
/// (and #true #false) => #false
/// ```
pub fn builtin_and(args: &[Expr], _pos: &Position) -> Result<Expr, SignoError> {
    Ok(Expr::bool(args.iter().all(Expr::is_truthy)))
}

/// `#true` when at least one argument is truthy.
pub fn builtin_or(args: &[Expr], _pos: &Position) -> Result<Expr, SignoError> {
    Ok(Expr::bool(args.iter().any(Expr::is_truthy)))
}

/// `#true` when every argument is falsy (negation of `or`).
pub fn builtin_nor(args: &[Expr], _pos: &Position) -> Result<Expr, SignoError> {
    Ok(Expr::bool(!args.iter().any(Expr::is_truthy)))
}

/// `#true` when an odd number of arguments are truthy.
///
/// # Examples
///
/// ```lisp
/// (xor #true #false) => #true
/// (xor #true #true) => #false
/// ```
pub fn builtin_xor(args: &[Expr], _pos: &Position) -> Result<Expr, SignoError> {
    let odd = args.iter().filter(|a| a.is_truthy()).count() % 2 == 1;
    Ok(Expr::bool(odd))
}

pub fn register(env: &Rc<Environment>) {
    env.define("not", Expr::Builtin(crate::value::Builtin { name: "not", func: builtin_not }));
    env.define("and", Expr::Builtin(crate::value::Builtin { name: "and", func: builtin_and }));
    env.define("or", Expr::Builtin(crate::value::Builtin { name: "or", func: builtin_or }));
    env.define("nor", Expr::Builtin(crate::value::Builtin { name: "nor", func: builtin_nor }));
    env.define("xor", Expr::Builtin(crate::value::Builtin { name: "xor", func: builtin_xor }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    #[test]
    fn and_requires_all_truthy() {
        assert!(builtin_and(&[Expr::bool(true), Expr::int(1)], &pos()).unwrap().is_truthy());
        assert!(!builtin_and(&[Expr::bool(true), Expr::bool(false)], &pos()).unwrap().is_truthy());
    }

    #[test]
    fn or_requires_one_truthy() {
        assert!(!builtin_or(&[Expr::bool(false), Expr::Nil], &pos()).unwrap().is_truthy());
        assert!(builtin_or(&[Expr::bool(false), Expr::int(0)], &pos()).unwrap().is_truthy());
    }

    #[test]
    fn nor_is_or_negated() {
        assert!(builtin_nor(&[Expr::bool(false), Expr::Nil], &pos()).unwrap().is_truthy());
    }

    #[test]
    fn xor_true_when_odd_count_truthy() {
        assert!(builtin_xor(&[Expr::bool(true), Expr::bool(false)], &pos()).unwrap().is_truthy());
        assert!(!builtin_xor(&[Expr::bool(true), Expr::bool(true)], &pos()).unwrap().is_truthy());
    }

    #[test]
    fn not_negates_truthiness_not_just_booleans() {
        assert!(!builtin_not(&[Expr::int(0)], &pos()).unwrap().is_truthy());
    }
}
