// Lua value model for translated code
// Values, tables and the multi-value result lists passed across calls
mod lua_table;
mod lua_value;

use crate::lua_vm::{LuaResult, LuaVM};
use std::fmt;
use std::rc::Rc;

pub use lua_table::{LuaTable, PairsCursor, RESERVED_STRING_KEY, TableRef};
pub use lua_value::{LuaValue, LuaValueKind, MAX_SAFE_INTEGER, float_to_integer};

/// Multi-return values from Lua functions
/// - Empty: no return values
/// - Single: one value (no heap allocation, most common case)
/// - Many: 2+ values stored in Vec (heap allocation only when needed)
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MultiValue {
    #[default]
    Empty,
    Single(LuaValue),
    Many(Vec<LuaValue>),
}

impl MultiValue {
    #[inline(always)]
    pub fn empty() -> Self {
        MultiValue::Empty
    }

    #[inline(always)]
    pub fn single(value: impl Into<LuaValue>) -> Self {
        MultiValue::Single(value.into())
    }

    #[inline(always)]
    pub fn two(v1: impl Into<LuaValue>, v2: impl Into<LuaValue>) -> Self {
        MultiValue::Many(vec![v1.into(), v2.into()])
    }

    pub fn multiple(mut values: Vec<LuaValue>) -> Self {
        match values.len() {
            0 => MultiValue::Empty,
            1 => MultiValue::Single(values.swap_remove(0)),
            _ => MultiValue::Many(values),
        }
    }

    #[inline(always)]
    pub fn into_vec(self) -> Vec<LuaValue> {
        match self {
            MultiValue::Empty => Vec::new(),
            MultiValue::Single(v) => vec![v],
            MultiValue::Many(v) => v,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        match self {
            MultiValue::Empty => 0,
            MultiValue::Single(_) => 1,
            MultiValue::Many(v) => v.len(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First result, nil when there is none. This is how single-value
    /// contexts (metamethod results, expressions) truncate a call.
    pub fn into_first(self) -> LuaValue {
        match self {
            MultiValue::Empty => LuaValue::Nil,
            MultiValue::Single(v) => v,
            MultiValue::Many(v) => v.into_iter().next().unwrap_or_default(),
        }
    }

    /// Get value at index (0-based)
    pub fn get(&self, index: usize) -> Option<&LuaValue> {
        match self {
            MultiValue::Empty => None,
            MultiValue::Single(v) => (index == 0).then_some(v),
            MultiValue::Many(v) => v.get(index),
        }
    }

    /// Prepend one value, used by `pcall` to add its status flag
    pub fn prepend(self, value: LuaValue) -> Self {
        let mut values = Vec::with_capacity(self.len() + 1);
        values.push(value);
        values.extend(self);
        MultiValue::Many(values)
    }
}

impl IntoIterator for MultiValue {
    type Item = LuaValue;
    type IntoIter = std::vec::IntoIter<LuaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl From<Vec<LuaValue>> for MultiValue {
    fn from(values: Vec<LuaValue>) -> Self {
        MultiValue::multiple(values)
    }
}

impl From<LuaValue> for MultiValue {
    fn from(value: LuaValue) -> Self {
        MultiValue::Single(value)
    }
}

impl FromIterator<LuaValue> for MultiValue {
    fn from_iter<I: IntoIterator<Item = LuaValue>>(iter: I) -> Self {
        MultiValue::multiple(iter.into_iter().collect())
    }
}

/// C Function type - plain Rust function callable from Lua
pub type CFunction = fn(&LuaVM, &[LuaValue]) -> LuaResult<MultiValue>;

type NativeFn = dyn Fn(&LuaVM, &[LuaValue]) -> LuaResult<MultiValue>;

/// Host-callable function value.
/// Accepts the positional argument list and returns the result list.
/// Equality is reference identity.
#[derive(Clone)]
pub struct LuaFunction {
    func: Rc<NativeFn>,
}

impl LuaFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&LuaVM, &[LuaValue]) -> LuaResult<MultiValue> + 'static,
    {
        LuaFunction { func: Rc::new(f) }
    }

    #[inline]
    pub fn invoke(&self, vm: &LuaVM, args: &[LuaValue]) -> LuaResult<MultiValue> {
        (self.func)(vm, args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &LuaFunction) -> bool {
        self.addr() == other.addr()
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.func) as *const u8 as usize
    }
}

impl fmt::Debug for LuaFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LuaFunction({:#x})", self.addr())
    }
}
