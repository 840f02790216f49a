use std::{fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    ast::Stmt,
    diagnostics::{Diagnostic, DiagnosticKind, LantanaError},
    environment::EnvironmentRef,
};

#[derive(Clone)]
pub struct Value(pub Rc<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn nil() -> Self {
        Self::new(ValueKind::Nil)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(ValueKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Str(value.into()))
    }

    pub fn module(name: impl Into<String>, exports: IndexMap<String, Value>) -> Self {
        Self::new(ValueKind::Module(ModuleValue {
            name: name.into(),
            exports,
        }))
    }

    /// `nil` is false, booleans are themselves, and every other value is
    /// true. `0` and the empty string are truthy by design.
    pub fn is_truthy(&self) -> bool {
        match &*self.0 {
            ValueKind::Nil => false,
            ValueKind::Bool(b) => *b,
            _ => true,
        }
    }

    /// Structural equality. `nil` equals only `nil`; values of different
    /// kinds are never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (&*self.0, &*other.0) {
            (ValueKind::Nil, ValueKind::Nil) => true,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Number(a), ValueKind::Number(b)) => a == b,
            (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
            (ValueKind::Function(a), ValueKind::Function(b)) => {
                std::ptr::eq(a as *const UserFunction, b as *const UserFunction)
            }
            (ValueKind::NativeFunction(a), ValueKind::NativeFunction(b)) => a.name == b.name,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            ValueKind::Nil => "Nil",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Number(_) => "Number",
            ValueKind::Str(_) => "String",
            ValueKind::Module(_) => "Module",
            ValueKind::Function(_) => "Function",
            ValueKind::NativeFunction(_) => "Function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match &*self.0 {
            ValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &*self.0 {
            ValueKind::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Str(s) => write!(f, "\"{s}\""),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Nil => write!(f, "nil"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            ValueKind::Str(s) => write!(f, "{s}"),
            ValueKind::Module(module) => write!(f, "<module {}>", module.name),
            ValueKind::Function(fun) => write!(f, "<fn {}>", fun.name),
            ValueKind::NativeFunction(fun) => write!(f, "<native fn {}>", fun.name),
        }
    }
}

#[derive(Clone)]
pub enum ValueKind {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Module(ModuleValue),
    Function(UserFunction),
    NativeFunction(NativeFunction),
}

/// A resolved module handle: a named bag of exported values.
#[derive(Clone)]
pub struct ModuleValue {
    pub name: String,
    pub exports: IndexMap<String, Value>,
}

/// A user-defined function closing over the environment that was active at
/// its declaration.
#[derive(Clone)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub closure: EnvironmentRef,
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub callback: fn(&[Value]) -> Result<Value, LantanaError>,
}

impl NativeFunction {
    /// `usize::MAX` arity marks a variadic native.
    pub fn call(&self, args: &[Value]) -> Result<Value, LantanaError> {
        if self.arity != usize::MAX && args.len() != self.arity {
            return Err(LantanaError::from(Diagnostic::new(
                DiagnosticKind::Arity,
                format!(
                    "function `{}` expected {} arguments but received {}",
                    self.name,
                    self.arity,
                    args.len()
                ),
            )));
        }
        (self.callback)(args)
    }
}
