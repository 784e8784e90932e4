//! Lexical environments.
//!
//! A chain of scopes, innermost first. Function scopes (and the global
//! scope) receive `var` bindings; block scopes hold only `let`/`const`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::value::Value;

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

struct Scope {
    bindings: FxHashMap<String, Binding>,
    parent: Option<Environment>,
    is_function_scope: bool,
}

struct Binding {
    value: Value,
    mutable: bool,
}

/// Failure to assign to an existing binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    ConstAssignment,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Environment")
            .field("bindings", &scope.bindings.len())
            .field("is_function_scope", &scope.is_function_scope)
            .finish()
    }
}

impl Environment {
    pub fn global() -> Environment {
        Environment::with_parent(None, true)
    }

    pub fn child(&self, is_function_scope: bool) -> Environment {
        Environment::with_parent(Some(self.clone()), is_function_scope)
    }

    fn with_parent(parent: Option<Environment>, is_function_scope: bool) -> Environment {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            parent,
            is_function_scope,
        })))
    }

    /// Create or overwrite a binding in this scope.
    pub fn declare(&self, name: &str, value: Value, mutable: bool) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), Binding { value, mutable });
    }

    /// Declare `name` as `undefined` unless this scope already binds it.
    pub fn declare_var(&self, name: &str) {
        let mut scope = self.0.borrow_mut();
        if !scope.bindings.contains_key(name) {
            scope.bindings.insert(
                name.to_string(),
                Binding {
                    value: Value::Undefined,
                    mutable: true,
                },
            );
        }
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.borrow();
                if let Some(binding) = scope.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                scope.parent.clone()?
            };
            current = next;
        }
    }

    /// Assign to the nearest binding of `name`. Returns `Ok(false)` when no
    /// scope binds it.
    pub fn assign(&self, name: &str, value: Value) -> Result<bool, AssignError> {
        let mut current = self.clone();
        loop {
            let next = {
                let mut scope = current.0.borrow_mut();
                if let Some(binding) = scope.bindings.get_mut(name) {
                    if !binding.mutable {
                        return Err(AssignError::ConstAssignment);
                    }
                    binding.value = value;
                    return Ok(true);
                }
                match scope.parent.clone() {
                    Some(parent) => parent,
                    None => return Ok(false),
                }
            };
            current = next;
        }
    }

    /// The nearest enclosing function (or global) scope.
    pub fn function_scope(&self) -> Environment {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.borrow();
                if scope.is_function_scope {
                    break;
                }
                match scope.parent.clone() {
                    Some(parent) => parent,
                    None => break,
                }
            };
            current = next;
        }
        current
    }

    /// The outermost scope.
    pub fn root(&self) -> Environment {
        let mut current = self.clone();
        loop {
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}
