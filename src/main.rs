mod config;

use clap::Parser;
use config::{VERSION, WELCOME_FOOTER, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use signo::builtins::console::HIDDEN_OK;
use signo::env::Environment;
use signo::error::SignoError;
use signo::position::Origin;
use signo::value::Expr;
use signo::{eval_file, evaluate_with, kernel_env, lex, parse};
use std::path::PathBuf;
use std::rc::Rc;

/// An interactive evaluator for the Signo Lisp-family language
#[derive(Parser, Debug)]
#[command(name = "signo")]
#[command(version = VERSION)]
#[command(about = "An interactive evaluator for the Signo Lisp-family language")]
struct CliArgs {
    /// Source file to run. Starts the REPL when omitted.
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

fn main() {
    let args = CliArgs::parse();

    match args.path {
        Some(path) => run_file(&path),
        None => run_repl(),
    }
}

/// One-shot CLI mode: evaluate a file, report side effects only, exit
/// non-zero on any error (spec.md §6).
fn run_file(path: &PathBuf) {
    match eval_file(path) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn run_repl() {
    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);
    println!("{}", WELCOME_FOOTER);

    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), rustyline::history::FileHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("failed to initialize REPL: {}", e);
            return;
        }
    };

    let history_file = ".signo_history";
    let _ = rl.load_history(history_file);

    let mut env = kernel_env();
    let mut index: usize = 1;

    loop {
        let prompt = format!("sig({})> ", index);
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if matches!(line.trim(), "(quit)" | "(exit)") {
                    println!("goodbye");
                    break;
                }
                run_repl_line(&line, &mut env);
                index += 1;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
}

/// Runs one REPL input: on error, formats and prints the diagnostic and
/// keeps the prior environment; on success, prints the value's debug form
/// unless it's the hidden `#ok` sentinel `print` returns (spec.md §6, §9).
fn run_repl_line(line: &str, env: &mut Rc<Environment>) {
    match repl_step(line, Rc::clone(env)) {
        Ok((value, next_env)) => {
            *env = next_env;
            if !matches!(&value, Expr::Atom(a) if a == HIDDEN_OK) {
                println!("{}", value.debug_form());
            }
        }
        Err(err) => eprintln!("{}", err),
    }
}

fn repl_step(
    line: &str,
    env: Rc<Environment>,
) -> Result<(Expr, Rc<Environment>), SignoError> {
    let tokens = lex(line, Origin::Repl)?;
    let ast = parse(tokens)?;
    evaluate_with(ast, env)
}
