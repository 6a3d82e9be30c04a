//! Arithmetic operations: +, -, *, /, ^, sqrt, abs
//!
//! Variadic where the operation is associative; binary-only where it isn't.
//! Integer operands stay integers except for `/` when it doesn't divide
//! evenly, and `^`, which always promotes to float.

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

fn add(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Number::Int(x + y),
        _ => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Number::Int(x - y),
        _ => Number::Float(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Number::Int(x * y),
        _ => Number::Float(a.as_f64() * b.as_f64()),
    }
}

fn div(a: Number, b: Number, pos: &Position) -> Result<Number, SignoError> {
    if b.is_zero() {
        return Err(SignoError::type_error("division by zero", pos.clone()));
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) if x % y == 0 => Ok(Number::Int(x / y)),
        _ => Ok(Number::Float(a.as_f64() / b.as_f64())),
    }
}

/// Sum of all arguments.
///
/// # Examples
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+) => 0
/// ```
pub fn builtin_add(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    let mut sum = Number::Int(0);
    for arg in args {
        sum = add(sum, as_number(arg, pos)?);
    }
    Ok(Expr::Number(sum))
}

/// Subtracts subsequent arguments from the first, or negates a single
/// argument.
///
/// # Examples
///
/// ```lisp
/// (- 10 3 2) => 5
/// (- 5) => -5
/// ```
pub fn builtin_sub(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.is_empty() {
        return Err(SignoError::type_error("'-' expects at least 1 argument", pos.clone()));
    }
    let first = as_number(&args[0], pos)?;
    if args.len() == 1 {
        let negated = match first {
            Number::Int(n) => Number::Int(-n),
            Number::Float(n) => Number::Float(-n),
        };
        return Ok(Expr::Number(negated));
    }
    let mut result = first;
    for arg in &args[1..] {
        result = sub(result, as_number(arg, pos)?);
    }
    Ok(Expr::Number(result))
}

/// Product of all arguments.
///
/// # Examples
///
/// ```lisp
/// (* 2 3 4) => 24
/// (*) => 1
/// ```
pub fn builtin_mul(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    let mut product = Number::Int(1);
    for arg in args {
        product = mul(product, as_number(arg, pos)?);
    }
    Ok(Expr::Number(product))
}

/// Divides the first argument by the rest, left to right. Stays integral
/// only when every division is exact.
///
/// # Examples
///
/// ```lisp
/// (/ 20 4) => 5
/// (/ 7 2) => 3.5
/// ```
pub fn builtin_div(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.is_empty() {
        return Err(SignoError::type_error("'/' expects at least 1 argument", pos.clone()));
    }
    let first = as_number(&args[0], pos)?;
    if args.len() == 1 {
        return Ok(Expr::Number(div(Number::Int(1), first, pos)?));
    }
    let mut result = first;
    for arg in &args[1..] {
        result = div(result, as_number(arg, pos)?, pos)?;
    }
    Ok(Expr::Number(result))
}

/// Raises the first argument to the power of the second. Always returns a
/// float.
///
/// # Examples
///
/// ```lisp
/// (^ 2 10) => 1024
/// ```
pub fn builtin_pow(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(SignoError::type_error("'^' expects 2 arguments", pos.clone()));
    }
    let base = as_number(&args[0], pos)?;
    let exponent = as_number(&args[1], pos)?;
    Ok(Expr::Number(Number::Float(base.as_f64().powf(exponent.as_f64()))))
}

/// Square root. Negative operands raise a domain error.
///
/// # Examples
///
/// ```lisp
/// (sqrt 16) => 4
/// ```
pub fn builtin_sqrt(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(SignoError::type_error("'sqrt' expects 1 argument", pos.clone()));
    }
    let n = as_number(&args[0], pos)?;
    if n.as_f64() < 0.0 {
        return Err(SignoError::type_error("sqrt of a negative number", pos.clone()));
    }
    Ok(Expr::Number(Number::Float(n.as_f64().sqrt())))
}

/// Absolute value, preserving the int/float tag.
///
/// # Examples
///
/// ```lisp
/// (abs -5) => 5
/// ```
pub fn builtin_abs(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(SignoError::type_error("'abs' expects 1 argument", pos.clone()));
    }
    let result = match as_number(&args[0], pos)? {
        Number::Int(n) => Number::Int(n.abs()),
        Number::Float(n) => Number::Float(n.abs()),
    };
    Ok(Expr::Number(result))
}

pub fn register(env: &Rc<Environment>) {
    env.define("+", Expr::Builtin(crate::value::Builtin { name: "+", func: builtin_add }));
    env.define("-", Expr::Builtin(crate::value::Builtin { name: "-", func: builtin_sub }));
    env.define("*", Expr::Builtin(crate::value::Builtin { name: "*", func: builtin_mul }));
    env.define("/", Expr::Builtin(crate::value::Builtin { name: "/", func: builtin_div }));
    env.define("^", Expr::Builtin(crate::value::Builtin { name: "^", func: builtin_pow }));
    env.define("sqrt", Expr::Builtin(crate::value::Builtin { name: "sqrt", func: builtin_sqrt }));
    env.define("abs", Expr::Builtin(crate::value::Builtin { name: "abs", func: builtin_abs }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    #[test]
    fn add_stays_integral() {
        let result = builtin_add(&[Expr::int(1), Expr::int(2), Expr::int(3)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(Number::Int(6))));
    }

    #[test]
    fn mixing_int_and_float_promotes() {
        let result = builtin_add(&[Expr::int(1), Expr::float(2.5)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(Number::Float(n)) if n == 3.5));
    }

    #[test]
    fn exact_division_stays_integral() {
        let result = builtin_div(&[Expr::int(20), Expr::int(4)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(Number::Int(5))));
    }

    #[test]
    fn inexact_division_promotes_to_float() {
        let result = builtin_div(&[Expr::int(7), Expr::int(2)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(Number::Float(n)) if n == 3.5));
    }

    #[test]
    fn division_by_zero_is_a_type_error() {
        let err = builtin_div(&[Expr::int(1), Expr::int(0)], &pos()).unwrap_err();
        assert!(matches!(err, SignoError::Type { .. }));
    }

    #[test]
    fn pow_always_returns_float() {
        let result = builtin_pow(&[Expr::int(2), Expr::int(10)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(Number::Float(n)) if n == 1024.0));
    }

    #[test]
    fn sqrt_of_negative_is_a_type_error() {
        let err = builtin_sqrt(&[Expr::int(-4)], &pos()).unwrap_err();
        assert!(matches!(err, SignoError::Type { .. }));
    }
}
