use thiserror::Error;

use crate::lua_value::LuaValueKind;

/// Script fault: the single error kind raised by guest-level operations.
/// The message text is the whole payload. Only this type is caught by
/// `pcall`; defects in the runtime itself are panics and are never caught.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LuaError {
    message: String,
}

impl LuaError {
    pub fn runtime(message: impl Into<String>) -> Self {
        LuaError {
            message: message.into(),
        }
    }

    /// "attempt to <action> a <type> value"
    pub fn attempt_to(action: &str, kind: LuaValueKind) -> Self {
        LuaError::runtime(format!("attempt to {} a {} value", action, kind.name()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}
