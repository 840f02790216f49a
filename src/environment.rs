use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, LantanaError},
    value::Value,
};

pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// A chained name-to-value mapping. Children hold a shared reference to
/// their parent; parents never reference children.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<EnvironmentRef>,
    bindings: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            parent: None,
            bindings: IndexMap::new(),
        }))
    }

    pub fn with_parent(parent: EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            bindings: IndexMap::new(),
        }))
    }

    /// Binds or rebinds `name` in this environment. Variables are implicitly
    /// declared on first assignment; enclosing bindings are shadowed, never
    /// overwritten.
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Looks up `name`, walking outward through enclosing environments.
    pub fn get(env: &EnvironmentRef, name: &str, line: usize) -> Result<Value, LantanaError> {
        if let Some(value) = env.borrow().bindings.get(name) {
            return Ok(value.clone());
        }
        if let Some(parent) = env.borrow().parent.clone() {
            return Environment::get(&parent, name, line);
        }
        Err(LantanaError::from(
            Diagnostic::new(
                DiagnosticKind::UndefinedVariable,
                format!("undefined variable `{name}`"),
            )
            .with_line(line),
        ))
    }
}
