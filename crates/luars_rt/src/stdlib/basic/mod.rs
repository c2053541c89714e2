// Basic library (_G global functions)
// Implements: print, type, tostring, error, assert, select, pcall, ipairs,
// pairs, pack, unpack, getmetatable, setmetatable, rawget, rawset, rawlen,
// rawequal
use std::cell::RefCell;

use tracing::trace;

use crate::lib_registry::LibraryModule;
use crate::lua_value::{LuaFunction, LuaTable, LuaValue, MultiValue};
use crate::lua_vm::{self, LuaError, LuaResult, LuaVM};
use crate::stdlib::{arg_error, get_arg, require_integer, require_table};

pub fn create_basic_lib() -> LibraryModule {
    crate::lib_module!("_G", {
        "print" => lua_print,
        "type" => lua_type,
        "tostring" => lua_tostring,
        "error" => lua_error,
        "assert" => lua_assert,
        "select" => lua_select,
        "pcall" => lua_pcall,
        "ipairs" => lua_ipairs,
        "pairs" => lua_pairs,
        "pack" => lua_pack,
        "unpack" => lua_unpack,
        "getmetatable" => lua_getmetatable,
        "setmetatable" => lua_setmetatable,
        "rawget" => lua_rawget,
        "rawset" => lua_rawset,
        "rawlen" => lua_rawlen,
        "rawequal" => lua_rawequal,
    })
    .with_value("_G", |vm| LuaValue::table(vm.globals().clone()))
}

/// print(...) - tostring each argument, tab separated, one line
fn lua_print(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push('\t');
        }
        line.push_str(&vm.tostring(arg)?);
    }
    vm.write_line(&line)?;
    Ok(MultiValue::empty())
}

/// type(v) - Return the type of a value as a string
fn lua_type(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let Some(value) = args.first() else {
        return Err(arg_error(1, "type", "value expected"));
    };
    Ok(MultiValue::single(value.type_name()))
}

fn lua_tostring(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let text = vm.tostring(&get_arg(args, 1))?;
    Ok(MultiValue::single(text))
}

/// error(message) - Raise a script fault
fn lua_error(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let message = vm.tostring(&get_arg(args, 1))?;
    Err(LuaError::runtime(&*message))
}

/// assert(v [, message]) - Raise a fault if v is false or nil
fn lua_assert(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    if get_arg(args, 1).is_truthy() {
        return Ok(MultiValue::multiple(args.to_vec()));
    }
    match get_arg(args, 2) {
        LuaValue::Nil => Err(LuaError::runtime("assertion failed!")),
        message => Err(LuaError::runtime(&*vm.tostring(&message)?)),
    }
}

/// select(index, ...) / select('#', ...)
fn lua_select(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let rest = args.get(1..).unwrap_or_default();
    if get_arg(args, 1).as_str() == Some("#") {
        return Ok(MultiValue::single(rest.len() as f64));
    }

    let index = require_integer(args, 1, "select")?;
    let start = if index > 0 {
        (index - 1) as usize
    } else {
        let back = index.unsigned_abs() as usize;
        if index == 0 || back > rest.len() {
            return Err(arg_error(1, "select", "index out of range"));
        }
        rest.len() - back
    };
    Ok(rest.get(start..).unwrap_or_default().iter().cloned().collect())
}

/// pcall(f, ...) - Catch script faults raised by f
///
/// Returns true followed by the results of f, or false and the fault
/// message. Rust panics are not faults and pass straight through.
fn lua_pcall(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let func = get_arg(args, 1);
    let func_args = args.get(1..).unwrap_or_default();
    match vm.call(&func, func_args) {
        Ok(results) => Ok(results.prepend(LuaValue::boolean(true))),
        Err(err) => {
            trace!(error = %err, "pcall caught script fault");
            Ok(MultiValue::two(false, err.into_message()))
        }
    }
}

/// ipairs(t) - Returns (iterator, t, 0)
fn lua_ipairs(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    Ok(MultiValue::multiple(vec![
        LuaValue::cfunction(ipairs_next),
        get_arg(args, 1),
        LuaValue::number(0.0),
    ]))
}

/// Iterator step: (i + 1, t[i + 1]) through `index`, empty at the first nil
fn ipairs_next(vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = get_arg(args, 1);
    let i = get_arg(args, 2).as_number().unwrap_or(0.0) + 1.0;
    let value = vm.index(&table, &LuaValue::number(i))?;
    if value.is_nil() {
        Ok(MultiValue::empty())
    } else {
        Ok(MultiValue::two(i, value))
    }
}

/// pairs(t) - Returns (next, t, nil) over a fresh traversal cursor
fn lua_pairs(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = require_table(args, 1, "pairs")?.clone();
    let cursor = RefCell::new(table.pairs());
    let next = LuaFunction::new(move |_, _| {
        Ok(match cursor.borrow_mut().next() {
            Some((key, value)) => MultiValue::two(key, value),
            None => MultiValue::empty(),
        })
    });
    Ok(MultiValue::multiple(vec![
        LuaValue::function(next),
        LuaValue::table(table),
        LuaValue::nil(),
    ]))
}

/// pack(...) - Fresh table holding the arguments under 1..n
fn lua_pack(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = LuaTable::make(Vec::new(), Some((1.0, args.to_vec())))?;
    Ok(MultiValue::single(table))
}

/// unpack(t) - t[1], t[2], ... up to the first nil, read raw
fn lua_unpack(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = get_arg(args, 1);
    let mut values = Vec::new();
    loop {
        let value = lua_vm::rawget(&table, &LuaValue::number((values.len() + 1) as f64))?;
        if value.is_nil() {
            break;
        }
        values.push(value);
    }
    Ok(MultiValue::multiple(values))
}

fn lua_getmetatable(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let meta = lua_vm::getmetatable(&get_arg(args, 1));
    Ok(MultiValue::single(meta))
}

fn lua_setmetatable(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = lua_vm::setmetatable(&get_arg(args, 1), &get_arg(args, 2))?;
    Ok(MultiValue::single(table))
}

fn lua_rawget(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let value = lua_vm::rawget(&get_arg(args, 1), &get_arg(args, 2))?;
    Ok(MultiValue::single(value))
}

/// rawset(t, k, v) - Raw write, returns t
fn lua_rawset(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let table = get_arg(args, 1);
    lua_vm::rawset(&table, get_arg(args, 2), get_arg(args, 3))?;
    Ok(MultiValue::single(table))
}

fn lua_rawlen(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let len = lua_vm::rawlen(&get_arg(args, 1))?;
    Ok(MultiValue::single(len as f64))
}

fn lua_rawequal(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let equal = get_arg(args, 1).raw_equal(&get_arg(args, 2));
    Ok(MultiValue::single(equal))
}
