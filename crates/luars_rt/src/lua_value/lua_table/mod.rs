// LuaTable - hybrid table storage
//
// Three independently optional segments:
// - dense: integer keys 1..k by position (LuaValueArray)
// - strings: string keys (LuaHashTable<Rc<str>>)
// - generic: every other key (LuaHashTable<HashKey>)
// Each segment is allocated on its first write.
mod hash_table;
mod value_array;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::lua_value::{LuaValue, float_to_integer};
use crate::lua_vm::{LuaError, LuaResult};
use hash_table::{HashKey, LuaHashTable};
use value_array::{LuaInsertResult, LuaValueArray};

/// String key that never goes to the string segment
pub const RESERVED_STRING_KEY: &str = "__proto__";

#[derive(Default)]
pub struct LuaTable {
    array: Option<LuaValueArray>,
    strings: Option<LuaHashTable<Rc<str>>>,
    generic: Option<LuaHashTable<HashKey>>,
    meta: Option<TableRef>,
}

/// Segment a key is routed to
enum Slot<'a> {
    Int(i64),
    Str(&'a Rc<str>),
    Generic,
}

fn route(key: &LuaValue) -> LuaResult<Slot<'_>> {
    match key {
        LuaValue::Nil => Err(LuaError::runtime("table index is nil")),
        LuaValue::Number(n) if n.is_nan() => Err(LuaError::runtime("table index is NaN")),
        LuaValue::Number(n) => Ok(float_to_integer(*n).map_or(Slot::Generic, Slot::Int)),
        LuaValue::String(s) if &**s != RESERVED_STRING_KEY => Ok(Slot::Str(s)),
        _ => Ok(Slot::Generic),
    }
}

impl LuaTable {
    /// Build a table from ordered entries, then seed `rest_key + 0`,
    /// `rest_key + 1`, ... from the rest values (variadic table literals).
    pub fn make<I>(entries: I, rest: Option<(f64, Vec<LuaValue>)>) -> LuaResult<TableRef>
    where
        I: IntoIterator<Item = (LuaValue, LuaValue)>,
    {
        let mut table = LuaTable::default();
        for (key, value) in entries {
            table.raw_set(key, value)?;
        }
        if let Some((rest_key, values)) = rest {
            table.reserve_array(values.len());
            for (offset, value) in values.into_iter().enumerate() {
                table.raw_set(LuaValue::number(rest_key + offset as f64), value)?;
            }
        }
        Ok(TableRef::from_table(table))
    }

    fn reserve_array(&mut self, additional: usize) {
        if self.array.is_none() && additional > 0 {
            self.array = Some(LuaValueArray::new(additional));
        }
    }

    /// Raw read. Absent keys (and nil or NaN keys) read as nil.
    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        let found = match route(key) {
            Ok(Slot::Int(i)) => self.get_int(i),
            Ok(Slot::Str(s)) => self.get_str(s),
            Ok(Slot::Generic) => self.generic.as_ref().and_then(|g| g.get(&HashKey(key.clone()))),
            Err(_) => None,
        };
        found.cloned().unwrap_or_default()
    }

    #[inline]
    pub fn get_int(&self, key: i64) -> Option<&LuaValue> {
        if let Some(value) = self.array.as_ref().and_then(|arr| arr.get_int(key)) {
            return Some(value);
        }
        self.generic
            .as_ref()?
            .get(&HashKey(LuaValue::number(key as f64)))
    }

    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&LuaValue> {
        if key == RESERVED_STRING_KEY {
            return self.generic.as_ref()?.get(&HashKey(LuaValue::from(key)));
        }
        self.strings.as_ref()?.get(key)
    }

    /// Raw write. Assigning nil deletes for all read purposes.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        match route(&key)? {
            Slot::Int(i) => self.set_int(i, value),
            Slot::Str(s) => {
                let s = s.clone();
                self.strings
                    .get_or_insert_with(|| LuaHashTable::new(4))
                    .set(s, value);
            }
            Slot::Generic => self.set_generic(key, value),
        }
        Ok(())
    }

    pub fn set_int(&mut self, key: i64, value: LuaValue) {
        if self.array.is_none() && value.is_nil() {
            return self.set_generic(LuaValue::number(key as f64), value);
        }
        let array = self.array.get_or_insert_with(LuaValueArray::default);
        match array.set_int(key, value) {
            LuaInsertResult::Success => {}
            LuaInsertResult::Appended => self.migrate_to_array(),
            LuaInsertResult::OutOfRange(value) => {
                self.set_generic(LuaValue::number(key as f64), value)
            }
        }
    }

    fn set_generic(&mut self, key: LuaValue, value: LuaValue) {
        if value.is_nil() && self.generic.is_none() {
            return;
        }
        self.generic
            .get_or_insert_with(|| LuaHashTable::new(4))
            .set(HashKey(key), value);
    }

    /// After the dense segment grew, pull the integer keys that now extend
    /// it out of the generic segment so the border can see them.
    fn migrate_to_array(&mut self) {
        let (Some(array), Some(generic)) = (self.array.as_mut(), self.generic.as_mut()) else {
            return;
        };
        loop {
            let next = LuaValue::number((array.len() + 1) as f64);
            match generic.take(&HashKey(next)) {
                Some(value) => {
                    array.set_int(array.len() as i64 + 1, value);
                }
                None => break,
            }
        }
    }

    /// Length of the contiguous run of integer keys starting at 1
    #[inline]
    pub fn border(&self) -> usize {
        self.array.as_ref().map_or(0, LuaValueArray::border)
    }

    pub fn get_metatable(&self) -> Option<TableRef> {
        self.meta.clone()
    }

    pub fn set_metatable(&mut self, metatable: Option<TableRef>) -> Option<TableRef> {
        std::mem::replace(&mut self.meta, metatable)
    }

    /// Number of live entries across all segments
    pub fn entry_count(&self) -> usize {
        let dense = self.array.as_ref().map_or(0, |arr| {
            (0..arr.len())
                .filter(|&i| arr.entry_at(i).is_some_and(|v| !v.is_nil()))
                .count()
        });
        dense
            + self.strings.as_ref().map_or(0, LuaHashTable::len)
            + self.generic.as_ref().map_or(0, LuaHashTable::len)
    }
}

/// Shared handle to a table.
///
/// The field is private: the table constructors are the only way to obtain
/// one, so no other host value can pass for a table.
#[derive(Clone)]
pub struct TableRef(Rc<RefCell<LuaTable>>);

impl TableRef {
    /// Fresh empty table
    pub fn new() -> Self {
        Self::from_table(LuaTable::default())
    }

    fn from_table(table: LuaTable) -> Self {
        TableRef(Rc::new(RefCell::new(table)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, LuaTable> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, LuaTable> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &TableRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        self.borrow().raw_get(key)
    }

    pub fn raw_set(&self, key: impl Into<LuaValue>, value: impl Into<LuaValue>) -> LuaResult<()> {
        self.borrow_mut().raw_set(key.into(), value.into())
    }

    pub fn metatable(&self) -> Option<TableRef> {
        self.borrow().get_metatable()
    }

    /// Independent traversal cursor over this table
    pub fn pairs(&self) -> PairsCursor {
        PairsCursor {
            table: self.clone(),
            segment: Segment::Array,
            position: 0,
        }
    }
}

impl Default for TableRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableRef({:#x})", self.addr())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Array,
    Strings,
    Generic,
    Done,
}

/// Stateful `pairs` cursor.
///
/// Yields the dense segment by ascending index, then the string segment,
/// then the generic segment, skipping nil slots. The table is re-borrowed on
/// every step so the loop body may read and write it freely.
pub struct PairsCursor {
    table: TableRef,
    segment: Segment,
    position: usize,
}

impl Iterator for PairsCursor {
    type Item = (LuaValue, LuaValue);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table.borrow();
        loop {
            let step = match self.segment {
                Segment::Array => table.array.as_ref().map(|arr| {
                    arr.entry_at(self.position).map(|v| {
                        (LuaValue::number((self.position + 1) as f64), v.clone())
                    })
                }),
                Segment::Strings => table.strings.as_ref().map(|strings| {
                    strings
                        .entry_at(self.position)
                        .map(|(k, v)| (LuaValue::String(k.clone()), v.clone()))
                }),
                Segment::Generic => table.generic.as_ref().map(|generic| {
                    generic
                        .entry_at(self.position)
                        .map(|(k, v)| (k.0.clone(), v.clone()))
                }),
                Segment::Done => return None,
            };

            match step.flatten() {
                Some((key, value)) => {
                    self.position += 1;
                    if !value.is_nil() {
                        return Some((key, value));
                    }
                }
                None => {
                    self.segment = match self.segment {
                        Segment::Array => Segment::Strings,
                        Segment::Strings => Segment::Generic,
                        _ => Segment::Done,
                    };
                    self.position = 0;
                }
            }
        }
    }
}
