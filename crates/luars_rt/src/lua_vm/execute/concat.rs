// Concatenation operator
use std::borrow::Cow;

use crate::lua_value::LuaValue;
use crate::lua_vm::execute::number_to_string;
use crate::lua_vm::{LuaError, LuaResult, LuaVM, TmKind};

/// String form of a concatenation operand, None if it has none
fn concat_piece(value: &LuaValue) -> Option<Cow<'_, str>> {
    match value {
        LuaValue::String(s) => Some(Cow::Borrowed(&**s)),
        LuaValue::Number(n) => Some(Cow::Owned(number_to_string(*n))),
        _ => None,
    }
}

impl LuaVM {
    /// `a .. b`
    pub fn concat(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.dispatch_binary(TmKind::Concat, a, b, || {
            let left = concat_piece(a).ok_or_else(|| LuaError::attempt_to("concatenate", a.kind()))?;
            let right = concat_piece(b).ok_or_else(|| LuaError::attempt_to("concatenate", b.kind()))?;

            let mut result = String::with_capacity(left.len() + right.len());
            result.push_str(&left);
            result.push_str(&right);
            Ok(LuaValue::from(result))
        })
    }
}
