//! Core library for the Lantana scripting language: scanner, parser,
//! tree-walking interpreter, and REPL utilities.

pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod lexer;
pub mod modules;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod stdlib;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, LantanaError};
pub use modules::{BuiltinModules, ModuleResolver};
pub use repl::Repl;
pub use runtime::Interpreter;
pub use value::Value;
