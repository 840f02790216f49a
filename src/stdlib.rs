use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, LantanaError, Result},
    environment::EnvironmentRef,
    value::{NativeFunction, Value, ValueKind},
};

/// Installs the global prelude: the output primitive plus a few generally
/// useful helpers. Hosts can layer their own natives on top afterwards.
pub fn install(env: &EnvironmentRef) {
    let mut scope = env.borrow_mut();
    scope.define("print".into(), native("print", usize::MAX, io_print));
    scope.define("clock".into(), native("clock", 0, time_clock));
    scope.define("len".into(), native("len", 1, string_len));
    scope.define("number".into(), native("number", 1, convert_number));
    scope.define("string".into(), native("string", 1, convert_string));
}

/// Builds the table backing the default module resolver.
pub fn module_table() -> IndexMap<String, Value> {
    let mut math = IndexMap::new();
    math.insert("abs".into(), native("abs", 1, math_abs));
    math.insert("floor".into(), native("floor", 1, math_floor));
    math.insert("ceil".into(), native("ceil", 1, math_ceil));
    math.insert("sqrt".into(), native("sqrt", 1, math_sqrt));
    math.insert("round".into(), native("round", 1, math_round));
    math.insert("pow".into(), native("pow", 2, math_pow));
    math.insert("pi".into(), Value::number(std::f64::consts::PI));

    let mut strings = IndexMap::new();
    strings.insert("upper".into(), native("upper", 1, string_upper));
    strings.insert("lower".into(), native("lower", 1, string_lower));
    strings.insert("trim".into(), native("trim", 1, string_trim));
    strings.insert("contains".into(), native("contains", 2, string_contains));
    strings.insert("replace".into(), native("replace", 3, string_replace));
    strings.insert(
        "starts_with".into(),
        native("starts_with", 2, string_starts_with),
    );
    strings.insert(
        "ends_with".into(),
        native("ends_with", 2, string_ends_with),
    );

    let mut time = IndexMap::new();
    time.insert("now".into(), native("now", 0, time_clock));

    let mut table = IndexMap::new();
    table.insert("math".into(), Value::module("math", math));
    table.insert("strings".into(), Value::module("strings", strings));
    table.insert("time".into(), Value::module("time", time));
    table
}

fn native(name: &'static str, arity: usize, callback: fn(&[Value]) -> Result<Value>) -> Value {
    Value::new(ValueKind::NativeFunction(NativeFunction {
        name,
        arity,
        callback,
    }))
}

fn expect_string(value: &Value, name: &str) -> Result<String> {
    match value.as_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(LantanaError::from(Diagnostic::new(
            DiagnosticKind::Type,
            format!("`{name}` expected String but found {}", value.type_name()),
        ))),
    }
}

fn expect_number(value: &Value, name: &str) -> Result<f64> {
    match value.as_number() {
        Some(n) => Ok(n),
        None => Err(LantanaError::from(Diagnostic::new(
            DiagnosticKind::Type,
            format!("`{name}` expected Number but found {}", value.type_name()),
        ))),
    }
}

fn io_print(args: &[Value]) -> Result<Value> {
    let mut out = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    println!("{out}");
    Ok(Value::nil())
}

fn time_clock(_: &[Value]) -> Result<Value> {
    match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        Ok(duration) => Ok(Value::number(duration.as_secs_f64())),
        Err(_) => Err(LantanaError::from(Diagnostic::new(
            DiagnosticKind::Type,
            "system clock went backwards",
        ))),
    }
}

fn string_len(args: &[Value]) -> Result<Value> {
    let text = expect_string(&args[0], "len")?;
    Ok(Value::number(text.chars().count() as f64))
}

fn convert_number(args: &[Value]) -> Result<Value> {
    match &*args[0].0 {
        ValueKind::Number(n) => Ok(Value::number(*n)),
        ValueKind::Str(s) => s.trim().parse::<f64>().map(Value::number).map_err(|_| {
            LantanaError::from(Diagnostic::new(
                DiagnosticKind::Type,
                format!("cannot convert `{s}` to a number"),
            ))
        }),
        _ => Err(LantanaError::from(Diagnostic::new(
            DiagnosticKind::Type,
            format!(
                "`number` expected Number or String but found {}",
                args[0].type_name()
            ),
        ))),
    }
}

fn convert_string(args: &[Value]) -> Result<Value> {
    Ok(Value::string(args[0].to_string()))
}

fn math_abs(args: &[Value]) -> Result<Value> {
    Ok(Value::number(expect_number(&args[0], "math.abs")?.abs()))
}

fn math_floor(args: &[Value]) -> Result<Value> {
    Ok(Value::number(expect_number(&args[0], "math.floor")?.floor()))
}

fn math_ceil(args: &[Value]) -> Result<Value> {
    Ok(Value::number(expect_number(&args[0], "math.ceil")?.ceil()))
}

fn math_sqrt(args: &[Value]) -> Result<Value> {
    let number = expect_number(&args[0], "math.sqrt")?;
    if number < 0.0 {
        return Err(LantanaError::from(Diagnostic::new(
            DiagnosticKind::Type,
            "math.sqrt expects non-negative input",
        )));
    }
    Ok(Value::number(number.sqrt()))
}

fn math_round(args: &[Value]) -> Result<Value> {
    Ok(Value::number(expect_number(&args[0], "math.round")?.round()))
}

fn math_pow(args: &[Value]) -> Result<Value> {
    let base = expect_number(&args[0], "math.pow")?;
    let exponent = expect_number(&args[1], "math.pow")?;
    Ok(Value::number(base.powf(exponent)))
}

fn string_upper(args: &[Value]) -> Result<Value> {
    Ok(Value::string(
        expect_string(&args[0], "strings.upper")?.to_uppercase(),
    ))
}

fn string_lower(args: &[Value]) -> Result<Value> {
    Ok(Value::string(
        expect_string(&args[0], "strings.lower")?.to_lowercase(),
    ))
}

fn string_trim(args: &[Value]) -> Result<Value> {
    Ok(Value::string(
        expect_string(&args[0], "strings.trim")?.trim().to_string(),
    ))
}

fn string_contains(args: &[Value]) -> Result<Value> {
    let text = expect_string(&args[0], "strings.contains")?;
    let needle = expect_string(&args[1], "strings.contains")?;
    Ok(Value::bool(text.contains(&needle)))
}

fn string_replace(args: &[Value]) -> Result<Value> {
    let text = expect_string(&args[0], "strings.replace")?;
    let from = expect_string(&args[1], "strings.replace")?;
    let to = expect_string(&args[2], "strings.replace")?;
    Ok(Value::string(text.replace(&from, &to)))
}

fn string_starts_with(args: &[Value]) -> Result<Value> {
    let text = expect_string(&args[0], "strings.starts_with")?;
    let prefix = expect_string(&args[1], "strings.starts_with")?;
    Ok(Value::bool(text.starts_with(&prefix)))
}

fn string_ends_with(args: &[Value]) -> Result<Value> {
    let text = expect_string(&args[0], "strings.ends_with")?;
    let suffix = expect_string(&args[1], "strings.ends_with")?;
    Ok(Value::bool(text.ends_with(&suffix)))
}
