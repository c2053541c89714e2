// String library
// Implements: find, len, lower, rep, sub, upper
// Positions are 1-based byte offsets; patterns are matched literally.
use crate::lib_registry::LibraryModule;
use crate::lua_value::{LuaValue, MultiValue};
use crate::lua_vm::{LuaError, LuaResult, LuaVM};
use crate::stdlib::{opt_integer, require_integer, require_string};

const MAX_STRING_SIZE: usize = 0x7fff_ffff;

pub fn create_string_lib() -> LibraryModule {
    crate::lib_module!("string", {
        "find" => string_find,
        "len" => string_len,
        "lower" => string_lower,
        "rep" => string_rep,
        "sub" => string_sub,
        "upper" => string_upper,
    })
}

/// Relative string position: negative counts from the end, clamped at 0
fn posrelat(pos: i64, len: usize) -> usize {
    if pos >= 0 {
        pos as usize
    } else if pos.unsigned_abs() as usize > len {
        0
    } else {
        len - pos.unsigned_abs() as usize + 1
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Byte range to string, invalid UTF-8 at a cut becomes U+FFFD
fn bytes_to_value(bytes: &[u8]) -> LuaValue {
    LuaValue::from(String::from_utf8_lossy(bytes).into_owned())
}

/// string.find(s, pattern [, init]) - Literal search
fn string_find(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "find")?;
    let pattern = require_string(args, 2, "find")?;
    let len = s.len();

    let init = posrelat(opt_integer(args, 3, "find", 1)?, len).max(1);
    if init > len + 1 {
        return Ok(MultiValue::empty());
    }

    match find_bytes(&s.as_bytes()[init - 1..], pattern.as_bytes()) {
        Some(offset) => {
            let start = init + offset;
            let end = start + pattern.len() - 1;
            Ok(MultiValue::two(start as f64, end as f64))
        }
        None => Ok(MultiValue::empty()),
    }
}

/// string.len(s) - Length in bytes
fn string_len(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "len")?;
    Ok(MultiValue::single(s.len() as f64))
}

fn string_lower(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "lower")?;
    Ok(MultiValue::single(s.to_ascii_lowercase()))
}

fn string_upper(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "upper")?;
    Ok(MultiValue::single(s.to_ascii_uppercase()))
}

/// string.rep(s, n [, sep])
fn string_rep(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "rep")?;
    let n = require_integer(args, 2, "rep")?;
    let sep = match args.get(2) {
        None | Some(LuaValue::Nil) => None,
        Some(_) => Some(require_string(args, 3, "rep")?),
    };
    let sep = sep.as_deref().unwrap_or("");
    if n <= 0 || (s.is_empty() && sep.is_empty()) {
        return Ok(MultiValue::single(""));
    }

    let n = n as usize;
    let total = s
        .len()
        .checked_add(sep.len())
        .and_then(|piece| piece.checked_mul(n))
        .filter(|&total| total <= MAX_STRING_SIZE)
        .ok_or_else(|| LuaError::runtime("resulting string too large"))?;

    let mut result = String::with_capacity(total);
    for i in 0..n {
        if i > 0 {
            result.push_str(sep);
        }
        result.push_str(&s);
    }
    Ok(MultiValue::single(result))
}

/// string.sub(s, i [, j]) - Substring over byte positions i..=j
fn string_sub(_vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
    let s = require_string(args, 1, "sub")?;
    let len = s.len();
    let start = posrelat(require_integer(args, 2, "sub")?, len).max(1);
    let end = posrelat(opt_integer(args, 3, "sub", -1)?, len).min(len);

    if start > end {
        return Ok(MultiValue::single(""));
    }
    Ok(MultiValue::single(bytes_to_value(&s.as_bytes()[start - 1..end])))
}
