// LuaValue - dynamic value of translated Lua code
//
// A closed tagged union over the seven guest types. Numbers are always f64,
// strings are immutable shared text, functions are host closures, tables are
// shared `TableRef` handles and everything the guest runtime does not know
// about is carried as an opaque foreign value.
use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::lua_value::{CFunction, LuaFunction, TableRef};

/// Dynamic type tag, exactly one per value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaValueKind {
    Nil,
    Boolean,
    Number,
    String,
    Function,
    Table,
    Foreign,
}

impl LuaValueKind {
    /// Name reported by `type()` and used in error messages
    pub fn name(self) -> &'static str {
        match self {
            LuaValueKind::Nil => "nil",
            LuaValueKind::Boolean => "boolean",
            LuaValueKind::Number => "number",
            LuaValueKind::String => "string",
            LuaValueKind::Function => "function",
            LuaValueKind::Table => "table",
            LuaValueKind::Foreign => "foreign",
        }
    }
}

impl fmt::Display for LuaValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Function(LuaFunction),
    Table(TableRef),
    /// Host value passed in from outside the guest runtime
    Foreign(Rc<dyn Any>),
}

impl LuaValue {
    #[inline(always)]
    pub const fn nil() -> Self {
        LuaValue::Nil
    }

    #[inline(always)]
    pub const fn boolean(b: bool) -> Self {
        LuaValue::Boolean(b)
    }

    #[inline(always)]
    pub const fn number(n: f64) -> Self {
        LuaValue::Number(n)
    }

    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        LuaValue::String(s.into())
    }

    #[inline]
    pub fn function(f: LuaFunction) -> Self {
        LuaValue::Function(f)
    }

    /// Wrap a plain Rust function pointer
    #[inline]
    pub fn cfunction(f: CFunction) -> Self {
        LuaValue::Function(LuaFunction::new(f))
    }

    #[inline]
    pub fn table(t: TableRef) -> Self {
        LuaValue::Table(t)
    }

    pub fn foreign<T: Any>(data: T) -> Self {
        LuaValue::Foreign(Rc::new(data))
    }

    /// Classify the value. O(1).
    #[inline(always)]
    pub fn kind(&self) -> LuaValueKind {
        match self {
            LuaValue::Nil => LuaValueKind::Nil,
            LuaValue::Boolean(_) => LuaValueKind::Boolean,
            LuaValue::Number(_) => LuaValueKind::Number,
            LuaValue::String(_) => LuaValueKind::String,
            LuaValue::Function(_) => LuaValueKind::Function,
            LuaValue::Table(_) => LuaValueKind::Table,
            LuaValue::Foreign(_) => LuaValueKind::Foreign,
        }
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    #[inline(always)]
    pub fn is_table(&self) -> bool {
        matches!(self, LuaValue::Table(_))
    }

    #[inline(always)]
    pub fn is_function(&self) -> bool {
        matches!(self, LuaValue::Function(_))
    }

    /// Everything except nil and false is true
    #[inline(always)]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    /// The value itself when truthy, nil otherwise.
    /// Translated `and`/`or` chains lean on this.
    pub fn truth(self) -> LuaValue {
        if self.is_truthy() { self } else { LuaValue::Nil }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LuaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Number that is an exactly representable integer
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(float_to_integer)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table(&self) -> Option<&TableRef> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&LuaFunction> {
        match self {
            LuaValue::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_foreign<T: Any>(&self) -> Option<&T> {
        match self {
            LuaValue::Foreign(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Primitive equality: value equality for nil, booleans, numbers and
    /// strings, reference identity for everything else. Never calls `__eq`.
    pub fn raw_equal(&self, other: &LuaValue) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Number(a), LuaValue::Number(b)) => a == b,
            (LuaValue::String(a), LuaValue::String(b)) => a == b,
            (LuaValue::Function(a), LuaValue::Function(b)) => a.ptr_eq(b),
            (LuaValue::Table(a), LuaValue::Table(b)) => a.ptr_eq(b),
            (LuaValue::Foreign(a), LuaValue::Foreign(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address used for identity hashing of reference values
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            LuaValue::Function(f) => Some(f.addr()),
            LuaValue::Table(t) => Some(t.addr()),
            LuaValue::Foreign(data) => Some(Rc::as_ptr(data) as *const u8 as usize),
            _ => None,
        }
    }
}

/// Largest magnitude at which every integer is exactly representable
pub const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

/// Convert a float to an integer key if it holds an exact integer
#[inline]
pub fn float_to_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Debug for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::Nil => write!(f, "nil"),
            LuaValue::Boolean(b) => write!(f, "{}", b),
            LuaValue::Number(n) => write!(f, "{}", n),
            LuaValue::String(s) => write!(f, "{:?}", s),
            LuaValue::Function(func) => write!(f, "function: {:#x}", func.addr()),
            LuaValue::Table(t) => write!(f, "table: {:#x}", t.addr()),
            LuaValue::Foreign(data) => write!(f, "foreign: {:p}", Rc::as_ptr(data)),
        }
    }
}

/// Raw equality, so tests and host code can compare values directly
impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        self.raw_equal(other)
    }
}

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        LuaValue::Number(n)
    }
}

impl From<i64> for LuaValue {
    fn from(n: i64) -> Self {
        LuaValue::Number(n as f64)
    }
}

impl From<i32> for LuaValue {
    fn from(n: i32) -> Self {
        LuaValue::Number(n as f64)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::String(s.into())
    }
}

impl From<String> for LuaValue {
    fn from(s: String) -> Self {
        LuaValue::String(s.into())
    }
}

impl From<Rc<str>> for LuaValue {
    fn from(s: Rc<str>) -> Self {
        LuaValue::String(s)
    }
}

impl From<TableRef> for LuaValue {
    fn from(t: TableRef) -> Self {
        LuaValue::Table(t)
    }
}

impl From<LuaFunction> for LuaValue {
    fn from(f: LuaFunction) -> Self {
        LuaValue::Function(f)
    }
}

impl<T: Into<LuaValue>> From<Option<T>> for LuaValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(LuaValue::Nil, Into::into)
    }
}
