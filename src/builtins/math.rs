//! Math constants and transcendental functions: pi, tau, sin, cos, tan,
//! asin, acos, atan, ln, log, logn
//!
//! All always return a float, mirroring [`crate::builtins::arithmetic`]'s
//! rule that `^` and `sqrt` promote.

use crate::env::Environment;
use crate::error::SignoError;
use crate::position::Position;
use crate::value::{Expr, Number};
use std::rc::Rc;

fn as_f64(expr: &Expr, pos: &Position) -> Result<f64, SignoError> {
    match expr {
        Expr::Number(n) => Ok(n.as_f64()),
        other => Err(SignoError::type_error(
            format!("expected a number, got {}", other.type_name()),
            pos.clone(),
        )),
    }
}

fn nullary(args: &[Expr], name: &str, pos: &Position, value: f64) -> Result<Expr, SignoError> {
    if !args.is_empty() {
        return Err(SignoError::type_error(format!("'{}' expects no arguments", name), pos.clone()));
    }
    Ok(Expr::Number(Number::Float(value)))
}

fn unary(args: &[Expr], name: &str, pos: &Position, f: impl Fn(f64) -> f64) -> Result<Expr, SignoError> {
    if args.len() != 1 {
        return Err(SignoError::type_error(format!("'{}' expects 1 argument", name), pos.clone()));
    }
    Ok(Expr::Number(Number::Float(f(as_f64(&args[0], pos)?))))
}

pub fn builtin_pi(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    nullary(args, "pi", pos, std::f64::consts::PI)
}

pub fn builtin_tau(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    nullary(args, "tau", pos, std::f64::consts::TAU)
}

pub fn builtin_sin(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "sin", pos, f64::sin)
}

pub fn builtin_cos(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "cos", pos, f64::cos)
}

pub fn builtin_tan(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "tan", pos, f64::tan)
}

pub fn builtin_asin(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "asin", pos, f64::asin)
}

pub fn builtin_acos(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "acos", pos, f64::acos)
}

pub fn builtin_atan(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "atan", pos, f64::atan)
}

/// Natural logarithm.
pub fn builtin_ln(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "ln", pos, f64::ln)
}

/// Base-10 logarithm (spec.md §9 fixes this open question explicitly).
pub fn builtin_log(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    unary(args, "log", pos, f64::log10)
}

/// `logn(n, x)` — logarithm of `x` base `n`.
pub fn builtin_logn(args: &[Expr], pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != 2 {
        return Err(SignoError::type_error("'logn' expects 2 arguments (base, x)", pos.clone()));
    }
    let base = as_f64(&args[0], pos)?;
    let x = as_f64(&args[1], pos)?;
    Ok(Expr::Number(Number::Float(x.log(base))))
}

pub fn register(env: &Rc<Environment>) {
    macro_rules! def {
        ($name:expr, $func:expr) => {
            env.define($name, Expr::Builtin(crate::value::Builtin { name: $name, func: $func }));
        };
    }
    def!("pi", builtin_pi);
    def!("tau", builtin_tau);
    def!("sin", builtin_sin);
    def!("cos", builtin_cos);
    def!("tan", builtin_tan);
    def!("asin", builtin_asin);
    def!("acos", builtin_acos);
    def!("atan", builtin_atan);
    def!("ln", builtin_ln);
    def!("log", builtin_log);
    def!("logn", builtin_logn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    #[test]
    fn pi_and_tau_are_nullary_constants() {
        let pi = builtin_pi(&[], &pos()).unwrap();
        assert!(matches!(pi, Expr::Number(n) if (n.as_f64() - std::f64::consts::PI).abs() < 1e-12));
    }

    #[test]
    fn log_is_base_10_ln_is_natural() {
        let log = builtin_log(&[Expr::float(100.0)], &pos()).unwrap();
        assert!(matches!(log, Expr::Number(n) if (n.as_f64() - 2.0).abs() < 1e-12));
        let ln = builtin_ln(&[Expr::float(std::f64::consts::E)], &pos()).unwrap();
        assert!(matches!(ln, Expr::Number(n) if (n.as_f64() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn logn_uses_given_base() {
        let result = builtin_logn(&[Expr::float(2.0), Expr::float(8.0)], &pos()).unwrap();
        assert!(matches!(result, Expr::Number(n) if (n.as_f64() - 3.0).abs() < 1e-9));
    }
}
