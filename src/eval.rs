// ABOUTME: Tree-walking evaluator — dispatches on Expression variant, threads the environment

use crate::env::{lookup, Environment};
use crate::error::SignoError;
use crate::position::{Origin, Position};
use crate::value::{Expr, LambdaData, SpecialForm};
use std::rc::Rc;

/// `eval(expr, env) -> (value, env')` (spec.md §4.4). `env'` only ever
/// differs from `env` when evaluation passed through a `let`/`def` at the
/// top level of the sequence that called this; nested scopes (lambda
/// bodies, `do` blocks) are discarded on exit.
pub fn eval(expr: Expr, env: Rc<Environment>) -> Result<(Expr, Rc<Environment>), SignoError> {
    match expr {
        Expr::Nil
        | Expr::Number(_)
        | Expr::Atom(_)
        | Expr::String(_)
        | Expr::Lambda(_)
        | Expr::Builtin(_)
        | Expr::SpecialForm(_) => Ok((expr, env)),

        Expr::Symbol(name, pos) => {
            let value = lookup(&env, &name, &pos)?;
            Ok((value, env))
        }

        Expr::Quoted(inner) => Ok((*inner, env)),

        Expr::List(items, pos) => eval_list(items, pos, env),
    }
}

fn eval_list(
    mut items: Vec<Expr>,
    pos: Position,
    env: Rc<Environment>,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    let head = items.remove(0);
    let (head_val, _) = eval(head, Rc::clone(&env))?;

    match head_val {
        Expr::Lambda(data) => {
            let (args, _) = eval_args(items, Rc::clone(&env))?;
            let result = apply_lambda(&data, args, &pos)?;
            Ok((result, env))
        }
        Expr::Builtin(builtin) => {
            let (args, _) = eval_args(items, Rc::clone(&env))?;
            let result = (builtin.func)(&args, &pos)?;
            Ok((result, env))
        }
        Expr::SpecialForm(form) => eval_special_form(form, items, env, &pos),
        other => Err(SignoError::runtime(
            format!("value of type '{}' is not callable", other.type_name()),
            pos,
        )),
    }
}

/// Evaluates each expression left-to-right, threading the environment
/// through (spec.md §4.4, "evaluation order inside arguments: strictly
/// left-to-right").
fn eval_args(
    exprs: Vec<Expr>,
    env: Rc<Environment>,
) -> Result<(Vec<Expr>, Rc<Environment>), SignoError> {
    let mut values = Vec::with_capacity(exprs.len());
    let mut current_env = env;
    for expr in exprs {
        let (value, next_env) = eval(expr, current_env)?;
        values.push(value);
        current_env = next_env;
    }
    Ok((values, current_env))
}

fn apply_lambda(data: &Rc<LambdaData>, args: Vec<Expr>, pos: &Position) -> Result<Expr, SignoError> {
    if args.len() != data.params.len() {
        return Err(SignoError::type_error(
            format!(
                "lambda expects {} argument(s), got {}",
                data.params.len(),
                args.len()
            ),
            pos.clone(),
        ));
    }
    let call_scope = Environment::with_parent(&data.env);
    for (param, value) in data.params.iter().zip(args) {
        call_scope.define(param.clone(), value);
    }
    if let Some(self_name) = &data.self_name {
        call_scope.define(self_name.clone(), Expr::Lambda(Rc::clone(data)));
    }
    let (result, _) = eval(data.body.clone(), call_scope)?;
    Ok(result)
}

/// Evaluates a sequence of top-level expressions, threading `env` across
/// them; the final value is the last expression's value (spec.md §4.4,
/// "top-level sequencing"). An empty sequence evaluates to `Nil`.
pub fn eval_sequence(
    exprs: Vec<Expr>,
    env: Rc<Environment>,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    let mut result = Expr::Nil;
    let mut current_env = env;
    for expr in exprs {
        let (value, next_env) = eval(expr, current_env)?;
        result = value;
        current_env = next_env;
    }
    Ok((result, current_env))
}

fn eval_special_form(
    form: SpecialForm,
    args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    match form {
        SpecialForm::Let => eval_let(args, env, pos),
        SpecialForm::If => eval_if(args, env, pos),
        SpecialForm::Do => eval_do(args, env, pos),
        SpecialForm::Lambda => eval_lambda(args, env, pos, None),
        SpecialForm::Def => eval_def(args, env, pos),
        SpecialForm::Eval => eval_eval(args, env, pos),
        SpecialForm::Include => eval_include(args, env, pos),
    }
}

fn arity_error(form: &str, expected: &str, got: usize, pos: &Position) -> SignoError {
    SignoError::type_error(
        format!("'{}' expects {}, got {} argument(s)", form, expected, got),
        pos.clone(),
    )
}

fn eval_let(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 2 {
        return Err(arity_error("let", "2 (symbol, expr)", args.len(), pos));
    }
    let value_expr = args.pop().unwrap();
    let name_expr = args.pop().unwrap();
    let name = match name_expr {
        Expr::Symbol(name, _) => name,
        other => {
            return Err(SignoError::type_error(
                format!("'let' expects a symbol, got {}", other.type_name()),
                pos.clone(),
            ))
        }
    };
    let (value, env_after) = eval(value_expr, env)?;
    let new_env = env_after.assign(name, value.clone());
    Ok((value, new_env))
}

fn eval_if(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(arity_error("if", "2 or 3", args.len(), pos));
    }
    let else_branch = if args.len() == 3 { Some(args.remove(2)) } else { None };
    let then_branch = args.remove(1);
    let cond = args.remove(0);

    let (cond_val, _) = eval(cond, Rc::clone(&env))?;
    let result = if cond_val.is_truthy() {
        eval(then_branch, Rc::clone(&env))?.0
    } else if let Some(else_branch) = else_branch {
        eval(else_branch, Rc::clone(&env))?.0
    } else {
        Expr::Nil
    };
    Ok((result, env))
}

fn eval_do(
    args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.is_empty() {
        return Err(arity_error("do", "at least 1", 0, pos));
    }
    let block_env = Environment::with_parent(&env);
    let (result, _) = eval_sequence(args, block_env)?;
    Ok((result, env))
}

fn eval_lambda(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
    self_name: Option<String>,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 2 {
        return Err(arity_error("lambda", "2 (params, body)", args.len(), pos));
    }
    let body = args.pop().unwrap();
    let params_expr = args.pop().unwrap();
    let params = parse_params(params_expr, pos)?;
    let data = LambdaData {
        self_name,
        params,
        body,
        env: Rc::clone(&env),
    };
    Ok((Expr::Lambda(Rc::new(data)), env))
}

/// `params` is either a bare Symbol (desugared to a one-element list) or a
/// List of Symbols (spec.md §4.5).
fn parse_params(params_expr: Expr, pos: &Position) -> Result<Vec<String>, SignoError> {
    match params_expr {
        Expr::Symbol(name, _) => Ok(vec![name]),
        Expr::Nil => Ok(Vec::new()),
        Expr::List(items, _) => items
            .into_iter()
            .map(|item| match item {
                Expr::Symbol(name, _) => Ok(name),
                other => Err(SignoError::type_error(
                    format!("lambda parameter must be a symbol, got {}", other.type_name()),
                    pos.clone(),
                )),
            })
            .collect(),
        other => Err(SignoError::type_error(
            format!(
                "lambda parameters must be a symbol or list of symbols, got {}",
                other.type_name()
            ),
            pos.clone(),
        )),
    }
}

fn eval_def(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 3 {
        return Err(arity_error("def", "3 (symbol, params, body)", args.len(), pos));
    }
    let body = args.pop().unwrap();
    let params_expr = args.pop().unwrap();
    let name_expr = args.pop().unwrap();
    let name = match name_expr {
        Expr::Symbol(name, _) => name,
        other => {
            return Err(SignoError::type_error(
                format!("'def' expects a symbol, got {}", other.type_name()),
                pos.clone(),
            ))
        }
    };
    let params = parse_params(params_expr, pos)?;
    let data = LambdaData {
        self_name: Some(name.clone()),
        params,
        body,
        env: Rc::clone(&env),
    };
    let lambda = Expr::Lambda(Rc::new(data));
    let new_env = env.assign(name, lambda.clone());
    Ok((lambda, new_env))
}

fn eval_eval(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 1 {
        return Err(arity_error("eval", "1", args.len(), pos));
    }
    let expr = args.pop().unwrap();
    let (inner, _) = eval(expr, Rc::clone(&env))?;
    let (result, _) = eval(inner, Rc::clone(&env))?;
    Ok((result, env))
}

fn eval_include(
    mut args: Vec<Expr>,
    env: Rc<Environment>,
    pos: &Position,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    if args.len() != 1 {
        return Err(arity_error("include", "1 (path string)", args.len(), pos));
    }
    let path_expr = args.pop().unwrap();
    let (path_val, env_after) = eval(path_expr, env)?;
    let path_str = match path_val {
        Expr::String(s) => s,
        other => {
            return Err(SignoError::type_error(
                format!("'include' expects a string path, got {}", other.type_name()),
                pos.clone(),
            ))
        }
    };

    let resolved = match env_after.base_dir() {
        Some(base) => base.join(&path_str),
        None => std::path::PathBuf::from(&path_str),
    };
    let source = std::fs::read_to_string(&resolved).map_err(|e| {
        SignoError::runtime(format!("could not read '{}': {}", resolved.display(), e), pos.clone())
    })?;

    let origin = Origin::File(Rc::new(resolved));
    let tokens = crate::lexer::lex(&source, origin)?;
    let exprs = crate::parser::parse(tokens)?;

    // Evaluated directly in the calling scope, so top-level defs in the
    // included file become visible to the includer. A file included from
    // deep inside another include resolves its own relative paths against
    // the originally active base_dir rather than its own directory.
    eval_sequence(exprs, env_after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::position::Origin;

    fn run(src: &str) -> Expr {
        let env = Environment::new_root();
        builtins::register(&env);
        let tokens = lex(src, Origin::Repl).unwrap();
        let exprs = parse(tokens).unwrap();
        eval_sequence(exprs, env).unwrap().0
    }

    #[test]
    fn arithmetic_and_print_roundtrip() {
        let result = run("(+ 40 2)");
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 42.0));
    }

    #[test]
    fn if_picks_correct_branch_and_keeps_original_env() {
        let result = run("(if #false 1 2)");
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 2.0));
        let result = run("(if #false 1)");
        assert!(matches!(result, Expr::Nil));
    }

    #[test]
    fn def_supports_self_recursion() {
        let result = run("(def fact (n) (if (!= n 1) (* n (fact (- n 1))) 1)) (fact 4)");
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 24.0));
    }

    #[test]
    fn closures_capture_the_environment_at_construction() {
        let result = run("(let x 10) (def f (n) (+ n x)) (let x 20) (f 1)");
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 11.0));
    }

    #[test]
    fn do_block_scopes_lets_to_itself() {
        let env = Environment::new_root();
        builtins::register(&env);
        let tokens = lex("(do (let y 5) y)", Origin::Repl).unwrap();
        let exprs = parse(tokens).unwrap();
        let (value, final_env) = eval_sequence(exprs, env).unwrap();
        assert!(matches!(value, Expr::Number(n) if n.as_f64() == 5.0));
        assert!(final_env.get("y").is_none());
    }

    #[test]
    fn quote_eval_duality() {
        let result = run("(eval '(+ 1 2))");
        assert!(matches!(result, Expr::Number(n) if n.as_f64() == 3.0));
        let result = run("(eval ''(+ 1 2))");
        assert!(matches!(result, Expr::List(..)));
    }

    #[test]
    fn calling_a_number_is_a_runtime_error() {
        let env = Environment::new_root();
        builtins::register(&env);
        let tokens = lex("(1 2 3)", Origin::Repl).unwrap();
        let exprs = parse(tokens).unwrap();
        let err = eval_sequence(exprs, env).unwrap_err();
        assert!(matches!(err, SignoError::Runtime { .. }));
    }

    #[test]
    fn undefined_symbol_is_a_reference_error_with_position() {
        let env = Environment::new_root();
        builtins::register(&env);
        let tokens = lex("(do (let y 5) (print y)) (print y)", Origin::Repl).unwrap();
        let exprs = parse(tokens).unwrap();
        let err = eval_sequence(exprs, env).unwrap_err();
        assert!(matches!(err, SignoError::Reference { .. }));
    }
}
