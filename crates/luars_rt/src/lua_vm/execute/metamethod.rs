// Metamethod dispatch protocol
//
// Three shapes shared by every operator:
// - unary: the operand's handler, else fallback
// - binary: the handler in the left operand's metatable, or in the right
//   one's when the left has no metatable, else fallback
// - comparison: only when both operands share a type tag and both
//   metatables resolve to the very same handler, else fallback
//
// Handlers are looked up in the metatable through `index` and invoked
// through `call`; single-value shapes keep the first result only.
use tracing::trace;

use crate::lua_value::{LuaValue, TableRef};
use crate::lua_vm::{LuaResult, LuaVM, getmetatable};

/// Tag Method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TmKind {
    Index = 0,
    NewIndex = 1,
    Call = 2,
    Add = 3,
    Sub = 4,
    Mul = 5,
    Div = 6,
    Mod = 7,
    Pow = 8,
    Unm = 9,
    Len = 10,
    Concat = 11,
    Eq = 12,
    Lt = 13,
    Le = 14,
    ToString = 15,
}

impl TmKind {
    pub const COUNT: usize = 16;

    pub const ALL: [TmKind; TmKind::COUNT] = [
        TmKind::Index,
        TmKind::NewIndex,
        TmKind::Call,
        TmKind::Add,
        TmKind::Sub,
        TmKind::Mul,
        TmKind::Div,
        TmKind::Mod,
        TmKind::Pow,
        TmKind::Unm,
        TmKind::Len,
        TmKind::Concat,
        TmKind::Eq,
        TmKind::Lt,
        TmKind::Le,
        TmKind::ToString,
    ];

    /// Key the handler is stored under in a metatable
    pub const fn name(self) -> &'static str {
        match self {
            TmKind::Index => "__index",
            TmKind::NewIndex => "__newindex",
            TmKind::Call => "__call",
            TmKind::Add => "__add",
            TmKind::Sub => "__sub",
            TmKind::Mul => "__mul",
            TmKind::Div => "__div",
            TmKind::Mod => "__mod",
            TmKind::Pow => "__pow",
            TmKind::Unm => "__unm",
            TmKind::Len => "__len",
            TmKind::Concat => "__concat",
            TmKind::Eq => "__eq",
            TmKind::Lt => "__lt",
            TmKind::Le => "__le",
            TmKind::ToString => "__tostring",
        }
    }
}

impl LuaVM {
    /// Handler registered under `tm` in the metatable of `value`.
    /// Nil and false handlers count as absent.
    pub fn get_metamethod(&self, value: &LuaValue, tm: TmKind) -> LuaResult<Option<LuaValue>> {
        match getmetatable(value) {
            Some(meta) => self.handler_in(meta, tm),
            None => Ok(None),
        }
    }

    fn handler_in(&self, meta: TableRef, tm: TmKind) -> LuaResult<Option<LuaValue>> {
        let handler = self.index(&LuaValue::Table(meta), self.const_strings.tm_name(tm))?;
        Ok(handler.is_truthy().then_some(handler))
    }

    /// Unary shape. `extra` follows the operand in the handler's arguments.
    pub(crate) fn dispatch_unary<F>(
        &self,
        tm: TmKind,
        operand: &LuaValue,
        extra: &[LuaValue],
        fallback: F,
    ) -> LuaResult<LuaValue>
    where
        F: FnOnce() -> LuaResult<LuaValue>,
    {
        match self.get_metamethod(operand, tm)? {
            Some(handler) => {
                trace!(event = tm.name(), "unary metamethod");
                let mut args = Vec::with_capacity(1 + extra.len());
                args.push(operand.clone());
                args.extend_from_slice(extra);
                Ok(self.call(&handler, &args)?.into_first())
            }
            None => fallback(),
        }
    }

    /// Binary shape. The handler comes from the left operand's metatable, or
    /// from the right one's when the left has none.
    pub(crate) fn dispatch_binary<F>(
        &self,
        tm: TmKind,
        a: &LuaValue,
        b: &LuaValue,
        fallback: F,
    ) -> LuaResult<LuaValue>
    where
        F: FnOnce() -> LuaResult<LuaValue>,
    {
        let handler = match getmetatable(a).or_else(|| getmetatable(b)) {
            Some(meta) => self.handler_in(meta, tm)?,
            None => None,
        };
        match handler {
            Some(handler) => {
                trace!(event = tm.name(), "binary metamethod");
                Ok(self.call(&handler, &[a.clone(), b.clone()])?.into_first())
            }
            None => fallback(),
        }
    }

    /// Comparison shape, the handler result is taken by truthiness
    pub(crate) fn dispatch_comparison<F>(
        &self,
        tm: TmKind,
        a: &LuaValue,
        b: &LuaValue,
        fallback: F,
    ) -> LuaResult<bool>
    where
        F: FnOnce() -> LuaResult<bool>,
    {
        match self.comparison_handler(tm, a, b)? {
            Some(handler) => {
                trace!(event = tm.name(), "comparison metamethod");
                Ok(self
                    .call(&handler, &[a.clone(), b.clone()])?
                    .into_first()
                    .is_truthy())
            }
            None => fallback(),
        }
    }

    fn comparison_handler(
        &self,
        tm: TmKind,
        a: &LuaValue,
        b: &LuaValue,
    ) -> LuaResult<Option<LuaValue>> {
        if a.kind() != b.kind() {
            return Ok(None);
        }
        // both operands must carry a metatable before anything is looked up
        if getmetatable(a).is_none() || getmetatable(b).is_none() {
            return Ok(None);
        }
        let (Some(mm_a), Some(mm_b)) = (self.get_metamethod(a, tm)?, self.get_metamethod(b, tm)?)
        else {
            return Ok(None);
        };
        Ok(mm_a.raw_equal(&mm_b).then_some(mm_a))
    }
}
