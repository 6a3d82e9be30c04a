//! # Standard Library
//!
//! The kernel environment: special forms and built-in procedures, all bound
//! as ordinary symbols so the parser never needs to know about them
//! (spec.md §4.2, §9).
//!
//! ## Categories
//!
//! - **[arithmetic]**: +, -, *, /, ^, sqrt, abs
//! - **[comparison]**: ==, !=, >, >=, <, <=
//! - **[logic]**: not, and, or, nor, xor
//! - **[lists]**: tie, first, last, nth, push, pop, sum, product, join
//! - **[strings]**: length, upcase, downcase, capitalize, trim, concat
//! - **[math]**: pi, tau, sin, cos, tan, asin, acos, atan, ln, log, logn
//! - **[console]**: print

use crate::env::Environment;
use crate::value::{Expr, SpecialForm};
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod lists;
pub mod logic;
pub mod math;
pub mod strings;

fn register_special_forms(env: &Rc<Environment>) {
    let forms = [
        ("let", SpecialForm::Let),
        ("if", SpecialForm::If),
        ("do", SpecialForm::Do),
        ("lambda", SpecialForm::Lambda),
        ("def", SpecialForm::Def),
        ("eval", SpecialForm::Eval),
        ("include", SpecialForm::Include),
    ];
    for (name, form) in forms {
        env.define(name, Expr::SpecialForm(form));
    }
}

/// Populates a root environment with the kernel: every special form and
/// every standard library builtin.
pub fn register(env: &Rc<Environment>) {
    register_special_forms(env);
    arithmetic::register(env);
    comparison::register(env);
    logic::register(env);
    lists::register(env);
    strings::register(env);
    math::register(env);
    console::register(env);
}
