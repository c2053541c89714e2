// Comparison operators
use std::cmp::Ordering;

use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaResult, LuaVM, TmKind};

/// Host ordering: numbers by value, strings bytewise.
/// Any other pairing is unordered.
fn raw_compare(a: &LuaValue, b: &LuaValue) -> Option<Ordering> {
    match (a, b) {
        (LuaValue::Number(x), LuaValue::Number(y)) => x.partial_cmp(y),
        (LuaValue::String(x), LuaValue::String(y)) => Some(x.as_bytes().cmp(y.as_bytes())),
        _ => None,
    }
}

impl LuaVM {
    /// `a == b`
    pub fn eq(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
        self.dispatch_comparison(TmKind::Eq, a, b, || Ok(a.raw_equal(b)))
    }

    /// `a < b`
    pub fn lt(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
        self.dispatch_comparison(TmKind::Lt, a, b, || {
            Ok(raw_compare(a, b) == Some(Ordering::Less))
        })
    }

    /// `a <= b`
    pub fn le(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<bool> {
        self.dispatch_comparison(TmKind::Le, a, b, || {
            Ok(matches!(
                raw_compare(a, b),
                Some(Ordering::Less | Ordering::Equal)
            ))
        })
    }
}
