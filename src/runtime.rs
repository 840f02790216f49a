use std::rc::Rc;

use crate::{
    ast::{BinaryOp, CompareOp, Expr, ExprKind, Literal, Stmt, StmtKind, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticKind, LantanaError, Result},
    environment::{Environment, EnvironmentRef},
    modules::{BuiltinModules, ModuleResolver},
    parser,
    value::{NativeFunction, UserFunction, Value, ValueKind},
};

/// Tree-walking evaluator. Each instance owns an independent global
/// environment; the prelude and the module resolver are installed at
/// construction and never change afterwards.
pub struct Interpreter {
    globals: EnvironmentRef,
    env: EnvironmentRef,
    resolver: Box<dyn ModuleResolver>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_resolver(Box::new(BuiltinModules::default()))
    }

    pub fn with_resolver(resolver: Box<dyn ModuleResolver>) -> Self {
        let globals = Environment::new();
        crate::stdlib::install(&globals);
        Self {
            env: Rc::clone(&globals),
            globals,
            resolver,
        }
    }

    /// Installs a host binding into the global environment.
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.borrow_mut().define(name.into(), value);
    }

    /// Registers a native function under `name` in the global environment.
    /// Pass `usize::MAX` as arity for a variadic native.
    pub fn define_native(
        &mut self,
        name: &'static str,
        arity: usize,
        callback: fn(&[Value]) -> Result<Value>,
    ) {
        let value = Value::new(ValueKind::NativeFunction(NativeFunction {
            name,
            arity,
            callback,
        }));
        self.define_global(name, value);
    }

    /// Parses and runs `source`, yielding the value of its last expression
    /// statement (`nil` when there is none).
    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let statements = parser::parse_program(source).map_err(LantanaError::from)?;
        self.run(&statements)
    }

    /// Executes a statement sequence against the global environment. The
    /// first runtime error aborts the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        self.run(statements).map(|_| ())
    }

    fn run(&mut self, statements: &[Stmt]) -> Result<Value> {
        let mut last_value: Option<Value> = None;
        for stmt in statements {
            if let Some(value) = self.execute_statement(stmt)? {
                last_value = Some(value);
            }
        }
        Ok(last_value.unwrap_or_else(Value::nil))
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<Option<Value>> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.evaluate(expr)?;
                Ok(Some(value))
            }
            StmtKind::Function { name, params, body } => {
                let function = UserFunction {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    closure: Rc::clone(&self.env),
                };
                self.env
                    .borrow_mut()
                    .define(name.clone(), Value::new(ValueKind::Function(function)));
                Ok(None)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(branch) = else_branch {
                    self.execute_block(branch)
                } else {
                    Ok(None)
                }
            }
            StmtKind::Import { module } => {
                let value = self.resolver.resolve_module(module).ok_or_else(|| {
                    LantanaError::from(
                        Diagnostic::new(
                            DiagnosticKind::Import,
                            format!("cannot resolve module `{module}`"),
                        )
                        .with_line(stmt.line),
                    )
                })?;
                self.env.borrow_mut().define(module.clone(), value);
                Ok(None)
            }
            StmtKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.borrow_mut().define(name.clone(), value);
                Ok(None)
            }
            StmtKind::Block(statements) => self.execute_block(statements),
        }
    }

    /// Runs `statements` in a fresh child environment, discarded on exit.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<Option<Value>> {
        let prev = Rc::clone(&self.env);
        self.env = Environment::with_parent(Rc::clone(&prev));
        let mut last_value: Option<Value> = None;
        for stmt in statements {
            match self.execute_statement(stmt) {
                Ok(Some(value)) => last_value = Some(value),
                Ok(None) => {}
                Err(err) => {
                    self.env = prev;
                    return Err(err);
                }
            }
        }
        self.env = prev;
        Ok(last_value)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal(lit)),
            ExprKind::Variable(name) => Environment::get(&self.env, name, expr.line),
            ExprKind::Binary { op, left, right } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                binary(*op, left_value, right_value, expr.line)
            }
            ExprKind::Compare { op, left, right } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                compare(*op, left_value, right_value, expr.line)
            }
            ExprKind::Unary { op, expr: right } => {
                let value = self.evaluate(right)?;
                unary(*op, value, expr.line)
            }
            ExprKind::Call { callee, args } => {
                let callee_value = self.evaluate(callee)?;
                let mut eval_args = Vec::with_capacity(args.len());
                for arg in args {
                    eval_args.push(self.evaluate(arg)?);
                }
                self.call(callee_value, eval_args, expr.line)
            }
            ExprKind::Field { target, field } => {
                let target_value = self.evaluate(target)?;
                match &*target_value.0 {
                    ValueKind::Module(module) => {
                        module.exports.get(field).cloned().ok_or_else(|| {
                            LantanaError::from(
                                Diagnostic::new(
                                    DiagnosticKind::Import,
                                    format!(
                                        "module `{}` has no export `{field}`",
                                        module.name
                                    ),
                                )
                                .with_line(expr.line),
                            )
                        })
                    }
                    _ => Err(LantanaError::from(
                        Diagnostic::new(
                            DiagnosticKind::Type,
                            format!(
                                "field access expects a module value, found {}",
                                target_value.type_name()
                            ),
                        )
                        .with_line(expr.line),
                    )),
                }
            }
            ExprKind::Group(inner) => self.evaluate(inner),
        }
    }

    fn call(&mut self, callee: Value, args: Vec<Value>, line: usize) -> Result<Value> {
        match &*callee.0 {
            ValueKind::NativeFunction(fun) => fun.call(&args),
            ValueKind::Function(fun) => {
                if args.len() != fun.params.len() {
                    return Err(LantanaError::from(
                        Diagnostic::new(
                            DiagnosticKind::Arity,
                            format!(
                                "function `{}` expected {} arguments but received {}",
                                fun.name,
                                fun.params.len(),
                                args.len()
                            ),
                        )
                        .with_line(line),
                    ));
                }
                let call_env = Environment::with_parent(Rc::clone(&fun.closure));
                for (name, value) in fun.params.iter().zip(args) {
                    call_env.borrow_mut().define(name.clone(), value);
                }
                let prev = Rc::clone(&self.env);
                self.env = call_env;
                let mut result = Value::nil();
                for stmt in &fun.body {
                    match self.execute_statement(stmt) {
                        Ok(Some(value)) => result = value,
                        Ok(None) => {}
                        Err(err) => {
                            self.env = prev;
                            return Err(err);
                        }
                    }
                }
                self.env = prev;
                Ok(result)
            }
            _ => Err(LantanaError::from(
                Diagnostic::new(
                    DiagnosticKind::Type,
                    format!("value of type {} is not callable", callee.type_name()),
                )
                .with_line(line),
            )),
        }
    }
}

fn literal(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::number(*n),
        Literal::Bool(b) => Value::bool(*b),
        Literal::String(s) => Value::string(s.clone()),
        Literal::Nil => Value::nil(),
    }
}

fn binary(op: BinaryOp, left: Value, right: Value, line: usize) -> Result<Value> {
    match op {
        BinaryOp::Add => match (&*left.0, &*right.0) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::number(a + b)),
            (ValueKind::Str(a), ValueKind::Str(b)) => {
                let mut joined = a.clone();
                joined.push_str(b);
                Ok(Value::string(joined))
            }
            _ => Err(type_error(
                format!(
                    "operands to `+` must be two numbers or two strings, found {} and {}",
                    left.type_name(),
                    right.type_name()
                ),
                line,
            )),
        },
        BinaryOp::Sub => {
            let (a, b) = number_operands("-", &left, &right, line)?;
            Ok(Value::number(a - b))
        }
        BinaryOp::Mul => {
            let (a, b) = number_operands("*", &left, &right, line)?;
            Ok(Value::number(a * b))
        }
        BinaryOp::Div => {
            let (a, b) = number_operands("/", &left, &right, line)?;
            if b == 0.0 {
                return Err(LantanaError::from(
                    Diagnostic::new(DiagnosticKind::DivisionByZero, "division by zero")
                        .with_line(line),
                ));
            }
            Ok(Value::number(a / b))
        }
    }
}

fn compare(op: CompareOp, left: Value, right: Value, line: usize) -> Result<Value> {
    match op {
        CompareOp::Equal => Ok(Value::bool(left.equals(&right))),
        CompareOp::NotEqual => Ok(Value::bool(!left.equals(&right))),
        CompareOp::Less => ordering("<", left, right, line, |a, b| a < b),
        CompareOp::LessEqual => ordering("<=", left, right, line, |a, b| a <= b),
        CompareOp::Greater => ordering(">", left, right, line, |a, b| a > b),
        CompareOp::GreaterEqual => ordering(">=", left, right, line, |a, b| a >= b),
    }
}

fn unary(op: UnaryOp, value: Value, line: usize) -> Result<Value> {
    match op {
        UnaryOp::Negate => match value.as_number() {
            Some(n) => Ok(Value::number(-n)),
            None => Err(type_error(
                format!("unary `-` expects a number, found {}", value.type_name()),
                line,
            )),
        },
        UnaryOp::Not => Ok(Value::bool(!value.is_truthy())),
    }
}

fn ordering<F>(op: &str, left: Value, right: Value, line: usize, cmp: F) -> Result<Value>
where
    F: Fn(f64, f64) -> bool,
{
    let (a, b) = number_operands(op, &left, &right, line)?;
    Ok(Value::bool(cmp(a, b)))
}

fn number_operands(op: &str, left: &Value, right: &Value, line: usize) -> Result<(f64, f64)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(type_error(
            format!(
                "operands to `{op}` must be numbers, found {} and {}",
                left.type_name(),
                right.type_name()
            ),
            line,
        )),
    }
}

fn type_error(message: String, line: usize) -> LantanaError {
    LantanaError::from(Diagnostic::new(DiagnosticKind::Type, message).with_line(line))
}
