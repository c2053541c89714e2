// Arithmetic operators
//
// Operands must be numbers; strings are not coerced. The binary dispatch
// shape runs first, so a metatable on either side can take over.
use crate::lua_value::LuaValue;
use crate::lua_vm::{LuaError, LuaResult, LuaVM, TmKind};

#[inline(always)]
fn arith_operand(value: &LuaValue) -> LuaResult<f64> {
    value
        .as_number()
        .ok_or_else(|| LuaError::attempt_to("perform arithmetic on", value.kind()))
}

/// Floor modulo: the result takes the sign of the divisor
#[inline]
pub fn lua_fmod(a: f64, b: f64) -> f64 {
    ((a % b) + b) % b
}

/// Power with a NaN base always giving NaN
#[inline]
pub fn lua_pow(a: f64, b: f64) -> f64 {
    if a.is_nan() { f64::NAN } else { a.powf(b) }
}

impl LuaVM {
    fn arith(&self, tm: TmKind, a: &LuaValue, b: &LuaValue, op: fn(f64, f64) -> f64) -> LuaResult<LuaValue> {
        self.dispatch_binary(tm, a, b, || {
            let x = arith_operand(a)?;
            let y = arith_operand(b)?;
            Ok(LuaValue::Number(op(x, y)))
        })
    }

    pub fn add(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Add, a, b, |x, y| x + y)
    }

    pub fn sub(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Sub, a, b, |x, y| x - y)
    }

    pub fn mul(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Mul, a, b, |x, y| x * y)
    }

    pub fn div(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Div, a, b, |x, y| x / y)
    }

    /// `a % b`
    pub fn modulo(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Mod, a, b, lua_fmod)
    }

    pub fn pow(&self, a: &LuaValue, b: &LuaValue) -> LuaResult<LuaValue> {
        self.arith(TmKind::Pow, a, b, lua_pow)
    }

    /// `-a`
    pub fn unm(&self, a: &LuaValue) -> LuaResult<LuaValue> {
        self.dispatch_unary(TmKind::Unm, a, &[], || Ok(LuaValue::Number(-arith_operand(a)?)))
    }
}
