// ABOUTME: Lexical scope chain — bindings live in RefCell'd maps behind Rc scopes

use crate::error::SignoError;
use crate::position::Position;
use crate::value::Expr;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// A single scope in the chain. `let`/`def` only ever write to the scope
/// they were evaluated in; a child scope is a fresh `Environment` whose
/// parent link is never rewritten, so a closure's captured `Rc<Environment>`
/// keeps seeing exactly what it saw at construction (spec.md §9, "closure
/// capture with rebinding").
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Expr>>,
    parent: Option<Rc<Environment>>,
    base_dir: Option<PathBuf>,
}

impl Environment {
    /// The root (kernel) scope: no parent, no bindings yet.
    pub fn new_root() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            base_dir: None,
        })
    }

    /// A fresh child scope of `parent` — used for lambda application, `do`
    /// blocks, and `eval`.
    pub fn with_parent(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
            base_dir: None,
        })
    }

    /// A root scope tagged with the directory `include` should resolve
    /// relative paths against.
    pub fn new_root_with_base_dir(base_dir: PathBuf) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            base_dir: Some(base_dir),
        })
    }

    /// Defines a binding in THIS scope only; never walks the parent chain.
    pub fn define(&self, name: impl Into<String>, value: Expr) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// `assign(env, name, value) -> Env` from the scope contract: builds a
    /// fresh child scope carrying the new binding and returns it, leaving
    /// `self` untouched. This is what makes a previously-captured `Rc<Environment>`
    /// immune to a later `let`/`def` in the scope it was captured from —
    /// mutating `self` in place would let every existing closure over it see
    /// the rebinding too, which spec.md §9's "closure capture with rebinding"
    /// note and the §8 testable property both forbid.
    pub fn assign(self: &Rc<Self>, name: impl Into<String>, value: Expr) -> Rc<Environment> {
        let child = Environment::with_parent(self);
        child.define(name, value);
        child
    }

    /// Walks this scope then its ancestors; `None` if nowhere binds `name`.
    pub fn get(&self, name: &str) -> Option<Expr> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// The nearest enclosing `base_dir`, used to resolve `include` paths
    /// relative to the file that is including them.
    pub fn base_dir(&self) -> Option<&PathBuf> {
        self.base_dir
            .as_ref()
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.base_dir()))
    }
}

/// `lookup(env, name, position) -> Value` — fails with a positioned
/// ReferenceError when no reachable scope binds `name`.
pub fn lookup(env: &Rc<Environment>, name: &str, pos: &Position) -> Result<Expr, SignoError> {
    env.get(name)
        .ok_or_else(|| SignoError::reference(name, pos.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Origin;

    fn pos() -> Position {
        Position::start(Origin::Repl)
    }

    #[test]
    fn define_and_get() {
        let env = Environment::new_root();
        env.define("x", Expr::int(42));
        assert!(matches!(env.get("x"), Some(Expr::Number(_))));
    }

    #[test]
    fn undefined_symbol_lookup_fails() {
        let env = Environment::new_root();
        let err = lookup(&env, "missing", &pos()).unwrap_err();
        assert!(matches!(err, SignoError::Reference { .. }));
    }

    #[test]
    fn child_shadows_without_touching_parent() {
        let parent = Environment::new_root();
        parent.define("x", Expr::int(1));
        let child = Environment::with_parent(&parent);
        child.define("x", Expr::int(2));

        assert!(matches!(child.get("x"), Some(Expr::Number(n)) if n.as_f64() == 2.0));
        assert!(matches!(parent.get("x"), Some(Expr::Number(n)) if n.as_f64() == 1.0));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Environment::new_root();
        parent.define("x", Expr::int(42));
        let child = Environment::with_parent(&parent);
        assert!(matches!(child.get("x"), Some(Expr::Number(n)) if n.as_f64() == 42.0));
    }

    #[test]
    fn assign_returns_a_new_child_scope_leaving_the_original_untouched() {
        let env = Environment::new_root();
        let next = env.assign("x", Expr::int(10));
        assert!(!Rc::ptr_eq(&env, &next));
        assert!(env.get("x").is_none());
        assert!(matches!(next.get("x"), Some(Expr::Number(_))));
    }

    #[test]
    fn assign_after_capture_does_not_change_what_the_captured_env_sees() {
        let env = Environment::new_root();
        let captured = env.assign("x", Expr::int(10));
        let rebound = captured.assign("x", Expr::int(20));
        assert!(matches!(captured.get("x"), Some(Expr::Number(n)) if n.as_f64() == 10.0));
        assert!(matches!(rebound.get("x"), Some(Expr::Number(n)) if n.as_f64() == 20.0));
    }

    #[test]
    fn base_dir_is_inherited_through_children() {
        let root = Environment::new_root_with_base_dir(PathBuf::from("/scripts"));
        let child = Environment::with_parent(&root);
        assert_eq!(child.base_dir(), Some(&PathBuf::from("/scripts")));
    }
}
