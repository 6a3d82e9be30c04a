// ABOUTME: Library root — exposes the lex/parse/evaluate pipeline as the host API

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;
pub mod value;

use env::Environment;
use error::SignoError;
use position::Origin;
use std::path::Path;
use std::rc::Rc;
use value::Expr;

/// `lex(source, origin) -> tokens`.
pub fn lex(source: &str, origin: Origin) -> Result<Vec<token::Token>, SignoError> {
    lexer::lex(source, origin)
}

/// `parse(tokens) -> ast`.
pub fn parse(tokens: Vec<token::Token>) -> Result<Vec<Expr>, SignoError> {
    parser::parse(tokens)
}

/// A fresh root environment containing every special form and builtin.
pub fn kernel_env() -> Rc<Environment> {
    let env = Environment::new_root();
    builtins::register(&env);
    env
}

/// `evaluate(ast) -> (value, env)`, with a fresh env containing kernel
/// bindings.
pub fn evaluate(ast: Vec<Expr>) -> Result<(Expr, Rc<Environment>), SignoError> {
    evaluate_with(ast, kernel_env())
}

/// `evaluate_with(ast, env) -> (value, env')` — for REPL continuation.
pub fn evaluate_with(
    ast: Vec<Expr>,
    env: Rc<Environment>,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    eval::eval_sequence(ast, env)
}

/// Lexes, parses and evaluates a whole file in one shot, using `path`'s
/// parent directory as the base for any `include`.
pub fn eval_file(path: &Path) -> Result<(Expr, Rc<Environment>), SignoError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        SignoError::runtime(
            format!("could not read '{}': {}", path.display(), e),
            position::Position::start(Origin::File(Rc::new(path.to_path_buf()))),
        )
    })?;

    let origin = Origin::File(Rc::new(path.to_path_buf()));
    let tokens = lex(&source, origin)?;
    let ast = parse(tokens)?;

    let env = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            Environment::new_root_with_base_dir(dir.to_path_buf())
        }
        _ => Environment::new_root(),
    };
    builtins::register(&env);
    evaluate_with(ast, env)
}

/// Lexes, parses and evaluates a source string against a fresh kernel
/// environment (no file, so `include` resolves relative to the current
/// working directory).
pub fn eval_source(source: &str) -> Result<(Expr, Rc<Environment>), SignoError> {
    let tokens = lex(source, Origin::Repl)?;
    let ast = parse(tokens)?;
    evaluate(ast)
}
