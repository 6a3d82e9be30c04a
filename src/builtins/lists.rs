//! List operations: tie, first, last, nth, push, pop, sum, product, join
//!
//! `first`/`last`/`nth` dispatch on either a List or a String (spec.md §4.8);
//! the string half of that dispatch is grounded here rather than duplicated
//! in the strings module.

use crate::env::Environment;
use crate::error::SignoError;
use crate::position::Position;
use crate::value::{Expr, Number};
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

fn type_err(pos: &Position, msg: impl Into<String>) -> SignoError {
    SignoError::type_error(msg.into(), pos.clone())
}

/// Collects its already-evaluated arguments into a List — the "evaluated"
/// counterpart to the quote prefix.
///
/// # Examples
///
/// ```lisp
/// (tie 1 2 (+ 1 2)) => (1 2 3)
/// '(1 2 (+ 1 2)) => (1 2 (+ 1 2))
/// ```
pub fn builtin_tie(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.is_empty() {
        Ok(Expr::Nil)
    } else {
        Ok(Expr::List(args.to_vec(), pos.clone()))
    }
}

fn list_items(expr: &Expr) -> Option<&[Expr]> {
    match expr {
        Expr::List(items, _) => Some(items),
        Expr::Nil => Some(&[]),
        _ => None,
    }
}

/// First element of a List, or first grapheme of a String. `(first ())` is
/// `Nil` (spec.md §8).
pub fn builtin_first(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'first' expects 1 argument"));
    }
    match &args[0] {
        Expr::String(s) => Ok(s
            .graphemes(true)
            .next()
            .map(|g| Expr::String(g.to_string()))
            .unwrap_or(Expr::Nil)),
        other => match list_items(other) {
            Some([]) => Ok(Expr::Nil),
            Some(items) => Ok(items[0].clone()),
            None => Err(type_err(pos, format!("'first' expects a list or string, got {}", other.type_name()))),
        },
    }
}

/// Last element of a List, or last grapheme of a String.
pub fn builtin_last(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'last' expects 1 argument"));
    }
    match &args[0] {
        Expr::String(s) => Ok(s
            .graphemes(true)
            .last()
            .map(|g| Expr::String(g.to_string()))
            .unwrap_or(Expr::Nil)),
        other => match list_items(other) {
            Some([]) => Ok(Expr::Nil),
            Some(items) => Ok(items[items.len() - 1].clone()),
            None => Err(type_err(pos, format!("'last' expects a list or string, got {}", other.type_name()))),
        },
    }
}

fn as_index(expr: &Expr, pos: &Position) -> Result<usize, SignoError> {
    match expr {
        Expr::Number(Number::Int(n)) if *n >= 0 => Ok(*n as usize),
        other => Err(type_err(pos, format!("'nth' expects a non-negative integer index, got {}", other.type_name()))),
    }
}

/// Element at a 0-based index of a List or String. Out of range yields
/// `Nil`.
///
/// # Examples
///
/// ```lisp
/// (nth 1 '(10 20 30)) => 20
/// ```
pub fn builtin_nth(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(type_err(pos, "'nth' expects 2 arguments (index, collection)"));
    }
    let index = as_index(&args[0], pos)?;
    match &args[1] {
        Expr::String(s) => Ok(s
            .graphemes(true)
            .nth(index)
            .map(|g| Expr::String(g.to_string()))
            .unwrap_or(Expr::Nil)),
        other => match list_items(other) {
            Some(items) => Ok(items.get(index).cloned().unwrap_or(Expr::Nil)),
            None => Err(type_err(pos, format!("'nth' expects a list or string, got {}", other.type_name()))),
        },
    }
}

/// Appends `x` to the tail of a List.
///
/// # Examples
///
/// ```lisp
/// (push 4 '(1 2 3)) => (1 2 3 4)
/// ```
pub fn builtin_push(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(type_err(pos, "'push' expects 2 arguments (item, list)"));
    }
    let mut items = list_items(&args[1])
        .ok_or_else(|| type_err(pos, format!("'push' expects a list, got {}", args[1].type_name())))?
        .to_vec();
    items.push(args[0].clone());
    Ok(Expr::List(items, pos.clone()))
}

/// Splits a List into `(head rest)`. `(pop ())` is `(() ())`.
pub fn builtin_pop(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'pop' expects 1 argument"));
    }
    let items = list_items(&args[0])
        .ok_or_else(|| type_err(pos, format!("'pop' expects a list, got {}", args[0].type_name())))?;
    let (head, rest) = match items {
        [] => (Expr::Nil, Expr::Nil),
        [only] => (only.clone(), Expr::Nil),
        [first, rest @ ..] => (first.clone(), Expr::List(rest.to_vec(), pos.clone())),
    };
    Ok(Expr::List(vec![head, rest], pos.clone()))
}

fn numeric_items(expr: &Expr, name: &str, pos: &Position) -> Result<Vec<Number>, SignoError> {
    let items = list_items(expr)
        .ok_or_else(|| type_err(pos, format!("'{}' expects a list, got {}", name, expr.type_name())))?;
    items
        .iter()
        .map(|item| match item {
            Expr::Number(n) => Ok(*n),
            other => Err(type_err(pos, format!("'{}' expects a list of numbers, got {}", name, other.type_name()))),
        })
        .collect()
}

/// Sum of a List of numbers. `(sum ())` is `0`.
pub fn builtin_sum(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'sum' expects 1 argument"));
    }
    let numbers = numeric_items(&args[0], "sum", pos)?;
    let total = numbers.iter().fold(Number::Int(0), |acc, n| match (acc, *n) {
        (Number::Int(a), Number::Int(b)) => Number::Int(a + b),
        (a, b) => Number::Float(a.as_f64() + b.as_f64()),
    });
    Ok(Expr::Number(total))
}

/// Product of a List of numbers. `(product ())` is `1`.
pub fn builtin_product(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(type_err(pos, "'product' expects 1 argument"));
    }
    let numbers = numeric_items(&args[0], "product", pos)?;
    let total = numbers.iter().fold(Number::Int(1), |acc, n| match (acc, *n) {
        (Number::Int(a), Number::Int(b)) => Number::Int(a * b),
        (a, b) => Number::Float(a.as_f64() * b.as_f64()),
    });
    Ok(Expr::Number(total))
}

/// Joins a List's elements' display form with a string separator.
///
/// # Examples
///
/// ```lisp
/// (join '(1 2 3) ", ") => "1, 2, 3"
/// ```
pub fn builtin_join(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(type_err(pos, "'join' expects 2 arguments (list, separator)"));
    }
    let items = list_items(&args[0])
        .ok_or_else(|| type_err(pos, format!("'join' expects a list, got {}", args[0].type_name())))?;
    let sep = match &args[1] {
        Expr::String(s) => s.as_str(),
        other => return Err(type_err(pos, format!("'join' expects a string separator, got {}", other.type_name()))),
    };
    let joined = items
        .iter()
        .map(Expr::display_form)
        .collect::<Vec<_>>()
        .join(sep);
    Ok(Expr::String(joined))
}

pub fn register(env: &Rc<Environment>) {
    env.define("tie", Expr::Builtin(crate::value::Builtin { name: "tie", func: builtin_tie }));
    env.define("first", Expr::Builtin(crate::value::Builtin { name: "first", func: builtin_first }));
    env.define("last", Expr::Builtin(crate::value::Builtin { name: "last", func: builtin_last }));
    env.define("nth", Expr::Builtin(crate::value::Builtin { name: "nth", func: builtin_nth }));
    env.define("push", Expr::Builtin(crate::value::Builtin { name: "push", func: builtin_push }));
    env.define("pop", Expr::Builtin(crate::value::Builtin { name: "pop", func: builtin_pop }));
    env.define("sum", Expr::Builtin(crate::value::Builtin { name: "sum", func: builtin_sum }));
    env.define("product", Expr::Builtin(crate::value::Builtin { name: "product", func: builtin_product }));
    env.define("join", Expr::Builtin(crate::value::Builtin { name: "join", func: builtin_join }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    fn list(items: Vec<Expr>) -> Expr {
        if items.is_empty() {
            Expr::Nil
        } else {
            Expr::List(items, pos())
        }
    }

    #[test]
    fn tie_collects_evaluated_args() {
        let result = builtin_tie(&[Expr::int(1), Expr::int(2), Expr::int(3)], &pos()).unwrap();
        assert!(matches!(result, Expr::List(items, _) if items.len() == 3));
    }

    #[test]
    fn first_and_last_on_empty_list_are_nil() {
        assert!(matches!(builtin_first(&[Expr::Nil], &pos()).unwrap(), Expr::Nil));
        assert!(matches!(builtin_last(&[Expr::Nil], &pos()).unwrap(), Expr::Nil));
    }

    #[test]
    fn nth_out_of_range_is_nil() {
        let xs = list(vec![Expr::int(1), Expr::int(2)]);
        let result = builtin_nth(&[Expr::int(5), xs], &pos()).unwrap();
        assert!(matches!(result, Expr::Nil));
    }

    #[test]
    fn push_appends_to_tail() {
        let xs = list(vec![Expr::int(1), Expr::int(2), Expr::int(3)]);
        let result = builtin_push(&[Expr::int(4), xs], &pos()).unwrap();
        match result {
            Expr::List(items, _) => {
                assert_eq!(items.len(), 4);
                assert!(matches!(items[3], Expr::Number(n) if n.as_f64() == 4.0));
            }
            other => panic!("expected List, got {:?}", other),
        }
    }

    #[test]
    fn pop_on_empty_list_returns_nil_nil() {
        let result = builtin_pop(&[Expr::Nil], &pos()).unwrap();
        match result {
            Expr::List(items, _) => {
                assert!(matches!(items[0], Expr::Nil));
                assert!(matches!(items[1], Expr::Nil));
            }
            other => panic!("expected List, got {:?}", other),
        }
    }

    #[test]
    fn sum_and_product_over_empty_list() {
        assert!(matches!(builtin_sum(&[Expr::Nil], &pos()).unwrap(), Expr::Number(n) if n.as_f64() == 0.0));
        assert!(matches!(builtin_product(&[Expr::Nil], &pos()).unwrap(), Expr::Number(n) if n.as_f64() == 1.0));
    }

    #[test]
    fn join_uses_display_form_and_separator() {
        let xs = list(vec![Expr::int(1), Expr::int(2), Expr::int(3)]);
        let result = builtin_join(&[xs, Expr::String(", ".into())], &pos()).unwrap();
        assert!(matches!(result, Expr::String(s) if s == "1, 2, 3"));
    }
}
