use crate::LuaValue;

/// Dense segment: integer keys `1..=len` stored by position, holes are nil.
///
/// `border` is the number of present keys counted from 1 up to the first
/// hole, i.e. the result of scanning forward from index 1. It is kept in
/// sync on every write instead of rescanning the whole array.
#[derive(Default)]
pub struct LuaValueArray {
    array: Vec<LuaValue>,
    border: usize,
}

pub enum LuaInsertResult {
    Success,
    /// The key was one past the end and the array grew
    Appended,
    /// The key does not belong to the dense segment, value handed back
    OutOfRange(LuaValue),
}

impl LuaValueArray {
    pub fn new(capacity: usize) -> Self {
        Self {
            array: Vec::with_capacity(capacity),
            border: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline(always)]
    pub fn border(&self) -> usize {
        self.border
    }

    /// True for keys stored here or appendable: `1..=len + 1`
    #[inline(always)]
    pub fn accepts(&self, key: i64) -> bool {
        key >= 1 && (key as u64) <= self.array.len() as u64 + 1
    }

    #[inline(always)]
    pub fn get_int(&self, key: i64) -> Option<&LuaValue> {
        if key < 1 {
            return None;
        }
        self.array.get((key - 1) as usize)
    }

    pub fn set_int(&mut self, key: i64, value: LuaValue) -> LuaInsertResult {
        if !self.accepts(key) {
            return LuaInsertResult::OutOfRange(value);
        }
        let index = (key - 1) as usize;

        if value.is_nil() {
            if index >= self.array.len() {
                // never extend for nil
                return LuaInsertResult::Success;
            }
            self.array[index] = value;
            if index < self.border {
                self.border = index;
            }
            while self.array.last().is_some_and(LuaValue::is_nil) {
                self.array.pop();
            }
            return LuaInsertResult::Success;
        }

        let result = if index == self.array.len() {
            self.array.push(value);
            LuaInsertResult::Appended
        } else {
            self.array[index] = value;
            LuaInsertResult::Success
        };

        if index == self.border {
            self.advance_border();
        }
        result
    }

    /// Move the border forward to the next hole
    fn advance_border(&mut self) {
        while self.border < self.array.len() && !self.array[self.border].is_nil() {
            self.border += 1;
        }
    }

    /// Entry at a 0-based position, if present
    pub fn entry_at(&self, index: usize) -> Option<&LuaValue> {
        self.array.get(index)
    }
}
