// Standard library primitives of the guest runtime

pub mod basic;
pub mod string;

use std::rc::Rc;

use crate::lua_value::{LuaValue, TableRef};
use crate::lua_vm::number_to_string;
use crate::lua_vm::{LuaError, LuaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stdlib {
    Basic,
    String,

    All,
}

/// Argument at a 1-based position, nil when absent
#[inline(always)]
pub fn get_arg(args: &[LuaValue], index: usize) -> LuaValue {
    args.get(index - 1).cloned().unwrap_or_default()
}

/// "bad argument #<n> to '<func>' (<msg>)"
pub fn arg_error(index: usize, func_name: &str, msg: &str) -> LuaError {
    LuaError::runtime(format!("bad argument #{} to '{}' ({})", index, func_name, msg))
}

fn type_error(index: usize, func_name: &str, expected: &str, got: Option<&LuaValue>) -> LuaError {
    let got = got.map_or("no value", LuaValue::type_name);
    arg_error(index, func_name, &format!("{} expected, got {}", expected, got))
}

pub fn require_table<'a>(args: &'a [LuaValue], index: usize, func_name: &str) -> LuaResult<&'a TableRef> {
    match args.get(index - 1) {
        Some(LuaValue::Table(t)) => Ok(t),
        other => Err(type_error(index, func_name, "table", other)),
    }
}

/// String argument; numbers are accepted in their canonical string form
pub fn require_string(args: &[LuaValue], index: usize, func_name: &str) -> LuaResult<Rc<str>> {
    match args.get(index - 1) {
        Some(LuaValue::String(s)) => Ok(s.clone()),
        Some(LuaValue::Number(n)) => Ok(number_to_string(*n).into()),
        other => Err(type_error(index, func_name, "string", other)),
    }
}

pub fn require_integer(args: &[LuaValue], index: usize, func_name: &str) -> LuaResult<i64> {
    match args.get(index - 1) {
        Some(LuaValue::Number(n)) => crate::lua_value::float_to_integer(*n)
            .ok_or_else(|| arg_error(index, func_name, "number has no integer representation")),
        other => Err(type_error(index, func_name, "number", other)),
    }
}

/// Integer argument that may be absent or nil
pub fn opt_integer(args: &[LuaValue], index: usize, func_name: &str, default: i64) -> LuaResult<i64> {
    match args.get(index - 1) {
        None | Some(LuaValue::Nil) => Ok(default),
        Some(_) => require_integer(args, index, func_name),
    }
}
