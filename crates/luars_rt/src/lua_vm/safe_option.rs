/// Runtime limits of a `LuaVM`
#[derive(Debug, Clone)]
pub struct SafeOption {
    /// Maximum nesting of `call` before "stack overflow" is raised
    pub max_call_depth: usize,
    /// Maximum number of `__index` tables chased by one lookup
    /// (MAXTAGLOOP in PUC Lua)
    pub max_tag_loop: usize,
}

impl Default for SafeOption {
    fn default() -> Self {
        Self {
            max_call_depth: 200,
            max_tag_loop: 2000,
        }
    }
}
