// Table operators: raw access, metatables, index/newindex and length
use crate::lua_value::{LuaValue, TableRef};
use crate::lua_vm::{LuaError, LuaResult, LuaVM, TmKind};

#[inline]
fn expect_table<'a>(value: &'a LuaValue, action: &str) -> LuaResult<&'a TableRef> {
    value
        .as_table()
        .ok_or_else(|| LuaError::attempt_to(action, value.kind()))
}

/// Raw read, never consults metatables
pub fn rawget(table: &LuaValue, key: &LuaValue) -> LuaResult<LuaValue> {
    Ok(expect_table(table, "rawget")?.raw_get(key))
}

/// Raw write, never consults metatables
pub fn rawset(table: &LuaValue, key: LuaValue, value: LuaValue) -> LuaResult<()> {
    expect_table(table, "rawset")?.raw_set(key, value)
}

/// Border of a table or byte length of a string, without `__len`
pub fn rawlen(value: &LuaValue) -> LuaResult<usize> {
    match value {
        LuaValue::Table(t) => Ok(t.borrow().border()),
        LuaValue::String(s) => Ok(s.len()),
        other => Err(LuaError::runtime(format!(
            "table or string expected, got {}",
            other.type_name()
        ))),
    }
}

/// Metatable of a table; every other value has none
pub fn getmetatable(value: &LuaValue) -> Option<TableRef> {
    match value {
        LuaValue::Table(t) => t.metatable(),
        _ => None,
    }
}

/// Attach (or with nil, detach) a metatable and return the table
pub fn setmetatable(table: &LuaValue, meta: &LuaValue) -> LuaResult<LuaValue> {
    let target = expect_table(table, "set metatable of")?;
    let meta = match meta {
        LuaValue::Table(m) => Some(m.clone()),
        LuaValue::Nil => None,
        _ => return Err(LuaError::runtime("expected table or nil as metatable")),
    };
    target.borrow_mut().set_metatable(meta);
    Ok(table.clone())
}

impl LuaVM {
    /// `obj[key]`
    ///
    /// Strings resolve against the string library, bypassing metatables.
    /// Tables return their raw value when present, otherwise chase
    /// `__index`: a table is searched again with the same key, a function
    /// is called with (table, key), anything else yields nil.
    pub fn index(&self, obj: &LuaValue, key: &LuaValue) -> LuaResult<LuaValue> {
        let mut current = obj.clone();
        for _ in 0..self.safe_option.max_tag_loop {
            let table = match &current {
                LuaValue::String(_) => return Ok(self.string_lib.raw_get(key)),
                LuaValue::Table(t) => t.clone(),
                other => return Err(LuaError::attempt_to("index", other.kind())),
            };

            let (raw, meta) = {
                let t = table.borrow();
                (t.raw_get(key), t.get_metatable())
            };
            let Some(meta) = meta else {
                return Ok(raw);
            };
            if !raw.is_nil() {
                return Ok(raw);
            }

            match meta.raw_get(self.const_strings.tm_name(TmKind::Index)) {
                next @ LuaValue::Table(_) => current = next,
                handler @ LuaValue::Function(_) => {
                    let args = [LuaValue::Table(table), key.clone()];
                    return Ok(self.call(&handler, &args)?.into_first());
                }
                _ => return Ok(LuaValue::Nil),
            }
        }
        Err(LuaError::runtime("'__index' chain too long; possible loop"))
    }

    /// `obj[key] = value`
    ///
    /// Unary dispatch on `__newindex`; the fallback is a raw write. A
    /// table-valued `__newindex` is not followed.
    pub fn newindex(&self, obj: &LuaValue, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        let extra = [key, value];
        self.dispatch_unary(TmKind::NewIndex, obj, &extra, || {
            let [key, value] = extra.clone();
            rawset(obj, key, value)?;
            Ok(LuaValue::Nil)
        })?;
        Ok(())
    }

    /// `#obj`
    pub fn len(&self, obj: &LuaValue) -> LuaResult<LuaValue> {
        self.dispatch_unary(TmKind::Len, obj, &[], || match obj {
            LuaValue::Table(t) => Ok(LuaValue::number(t.borrow().border() as f64)),
            other => Err(LuaError::attempt_to("get length of", other.kind())),
        })
    }
}
