//! Host functions seeded into the global scope of every interpreter.

use std::fs;
use std::io::Write;

use chrono::Utc;
use log::debug;

use crate::interpreter::Interpreter;
use crate::value::Value;

type NativeResult = std::result::Result<Value, String>;

pub(crate) fn install(interpreter: &mut Interpreter) {
    interpreter.define_native("clock", 0, clock);
    interpreter.define_native("input", 1, input);
    interpreter.define_native("read_file", 1, read_file);
    interpreter.define_native("write_file", 2, write_file);
}

/// Seconds since the UNIX epoch, with millisecond resolution.
fn clock(_: &mut Interpreter, _: &[Value]) -> NativeResult {
    let millis: i64 = Utc::now().timestamp_millis();

    Ok(Value::Number(millis as f64 / 1000.0))
}

/// Writes the prompt to the interpreter's output, then reads one line.
/// End of input yields an empty string.
fn input(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let out: &mut dyn Write = interpreter.out();
    write!(out, "{}", args[0]).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    interpreter
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;

    let trimmed: &str = line.trim_end_matches(['\n', '\r']);

    Ok(Value::String(trimmed.to_string()))
}

fn read_file(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let path: &str = string_arg(&args[0], "path")?;

    debug!("read_file({})", path);

    fs::read_to_string(path)
        .map(Value::String)
        .map_err(|e| format!("cannot read '{}': {}", path, e))
}

fn write_file(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let path: &str = string_arg(&args[0], "path")?;

    debug!("write_file({})", path);

    fs::write(path, args[1].to_string())
        .map(|()| Value::Nil)
        .map_err(|e| format!("cannot write '{}': {}", path, e))
}

fn string_arg<'v>(value: &'v Value, what: &str) -> std::result::Result<&'v str, String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(format!("{} must be a string, got {}", what, other.type_name())),
    }
}
