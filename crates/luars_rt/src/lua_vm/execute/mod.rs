// Operator library
// Every guest operator is a method on LuaVM built from the dispatch shapes in
// `metamethod` plus a fallback giving the built-in behavior.
mod arithmetic_ops;
mod call;
mod comparison_ops;
mod concat;
mod metamethod;
mod table_ops;
mod tostring;

pub use metamethod::TmKind;
pub use table_ops::{getmetatable, rawget, rawlen, rawset, setmetatable};
pub use tostring::{number_to_string, tostring_raw};
