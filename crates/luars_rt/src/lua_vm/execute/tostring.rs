// String conversion
use std::rc::Rc;

use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaError, LuaResult, LuaVM, TmKind};

/// Canonical number formatting.
///
/// Magnitudes from 1e14 up use 14 significant digits in scientific form with
/// trailing zeros trimmed (`1.69e+14`); integral values print without a
/// fraction; tiny magnitudes use the shortest scientific form.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e14 {
        return scientific_14(n);
    }
    if n.fract() == 0.0 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(n as i64).to_string();
    }
    if magnitude < 1e-6 {
        return format!("{:e}", n);
    }
    format!("{}", n)
}

fn scientific_14(n: f64) -> String {
    let formatted = format!("{:.13e}", n);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
    let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
    let sign = if exponent.starts_with('-') { "" } else { "+" };
    format!("{}e{}{}", mantissa, sign, exponent)
}

/// Formatting used when no `__tostring` applies
pub fn tostring_raw(value: &LuaValue) -> Rc<str> {
    match value {
        LuaValue::Nil => "nil".into(),
        LuaValue::Boolean(true) => "true".into(),
        LuaValue::Boolean(false) => "false".into(),
        LuaValue::Number(n) => number_to_string(*n).into(),
        LuaValue::String(s) => s.clone(),
        LuaValue::Function(_) => "<function>".into(),
        LuaValue::Table(_) => "<table>".into(),
        LuaValue::Foreign(_) => "<foreign>".into(),
    }
}

impl LuaVM {
    /// `tostring(value)`, honoring `__tostring`
    pub fn tostring(&self, value: &LuaValue) -> LuaResult<Rc<str>> {
        let result = self.dispatch_unary(TmKind::ToString, value, &[], || {
            Ok(LuaValue::String(tostring_raw(value)))
        })?;
        match result {
            LuaValue::String(s) => Ok(s),
            _ => Err(LuaError::runtime("'__tostring' must return a string")),
        }
    }
}
