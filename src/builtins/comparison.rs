//! Comparison operations: ==, !=, >, >=, <, <=
//!
//! `==`/`!=` accept any two values and use recursive structural equality;
//! the ordering operators accept numbers only.

use crate::env::Environment;
use crate::error::SignoError;
use crate::position::Position;
use crate::value::{Expr, Number};
use std::rc::Rc;

fn as_number(expr: &Expr, pos: &Position) -> Result<Number, SignoError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        other => Err(SignoError::type_error(
            format!("expected a number, got {}", other.type_name()),
            pos.clone(),
        )),
    }
}

/// Structural equality over any two values.
///
/// # Examples
///
/// ```lisp
/// (== 1 1.0) => #true
/// (== '(1 2) '(1 2)) => #true
/// ```
pub fn builtin_eq(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(SignoError::type_error("'==' expects 2 arguments", pos.clone()));
    }
    Ok(Expr::bool(args[0].lisp_eq(&args[1])))
}

/// Negation of `==`.
pub fn builtin_neq(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(SignoError::type_error("'!=' expects 2 arguments", pos.clone()));
    }
    Ok(Expr::bool(!args[0].lisp_eq(&args[1])))
}

fn compare(
    args: &[Expr],
    name: &'static str,
    pos: &Position,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(SignoError::type_error(format!("'{}' expects 2 arguments", name), pos.clone()));
    }
    let a = as_number(&args[0], pos)?;
    let b = as_number(&args[1], pos)?;
    let ordering = a
        .partial_cmp(b)
        .ok_or_else(|| SignoError::type_error("numbers are not comparable (NaN)", pos.clone()))?;
    Ok(Expr::bool(test(ordering)))
}

/// # Examples
///
/// ```lisp
/// (> 3 2) => #true
/// ```
pub fn builtin_gt(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    compare(args, ">", pos, |o| o == std::cmp::Ordering::Greater)
}

pub fn builtin_gte(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    compare(args, ">=", pos, |o| o != std::cmp::Ordering::Less)
}

pub fn builtin_lt(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    compare(args, "<", pos, |o| o == std::cmp::Ordering::Less)
}

pub fn builtin_lte(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    compare(args, "<=", pos, |o| o != std::cmp::Ordering::Greater)
}

pub fn register(env: &Rc<Environment>) {
    env.define("==", Expr::Builtin(crate::value::Builtin { name: "==", func: builtin_eq }));
    env.define("!=", Expr::Builtin(crate::value::Builtin { name: "!=", func: builtin_neq }));
    env.define(">", Expr::Builtin(crate::value::Builtin { name: ">", func: builtin_gt }));
    env.define(">=", Expr::Builtin(crate::value::Builtin { name: ">=", func: builtin_gte }));
    env.define("<", Expr::Builtin(crate::value::Builtin { name: "<", func: builtin_lt }));
    env.define("<=", Expr::Builtin(crate::value::Builtin { name: "<=", func: builtin_lte }));
}
