use crate::LuaValue;
use crate::lua_vm::TmKind;

/// Pre-created metamethod name strings (like Lua's G(L)->tmname[]).
/// Built once per VM so dispatch never allocates a key.
pub struct ConstString {
    tm_names: [LuaValue; TmKind::COUNT],
}

impl ConstString {
    pub fn new() -> Self {
        Self {
            tm_names: TmKind::ALL.map(|tm| LuaValue::from(tm.name())),
        }
    }

    #[inline(always)]
    pub fn tm_name(&self, tm: TmKind) -> &LuaValue {
        &self.tm_names[tm as usize]
    }
}
