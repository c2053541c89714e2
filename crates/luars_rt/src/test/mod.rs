pub mod test_table;

use crate::lua_vm::LuaResult;
use crate::{LuaTable, LuaVM, LuaValue};

/// Call a global function and collect its results
pub(crate) fn call_global(vm: &LuaVM, name: &str, args: &[LuaValue]) -> LuaResult<Vec<LuaValue>> {
    vm.call(&vm.get_global(name), args).map(|r| r.into_vec())
}

/// Table with string keys, the way translated `{a = ..., b = ...}` literals build one
pub(crate) fn record(entries: Vec<(&str, LuaValue)>) -> LuaValue {
    let entries = entries.into_iter().map(|(k, v)| (LuaValue::from(k), v));
    LuaValue::table(LuaTable::make(entries, None).unwrap())
}

/// Sequence `{v1, v2, ...}`
pub(crate) fn list(values: Vec<LuaValue>) -> LuaValue {
    LuaValue::table(LuaTable::make(Vec::new(), Some((1.0, values))).unwrap())
}
