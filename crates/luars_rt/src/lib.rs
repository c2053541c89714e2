// Lua Runtime
// Runtime support layer for Lua programs translated to Rust: the value
// model, hybrid tables, metamethod-aware operators and a small stdlib

#[cfg(test)]
mod test;

pub mod lib_registry;
pub mod lua_value;
pub mod lua_vm;
pub mod stdlib;

pub use lib_registry::LibraryRegistry;
pub use lua_value::{LuaFunction, LuaTable, LuaValue, LuaValueKind, MultiValue, TableRef};
pub use lua_vm::{LuaError, LuaResult, LuaVM, SafeOption};
pub use stdlib::Stdlib;
