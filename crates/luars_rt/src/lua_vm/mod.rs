// Lua runtime context
// Owns the global namespace, the shared string library and the limits that
// every operator consults. Several independent contexts may coexist.
mod const_string;
mod execute;
mod lua_error;
mod safe_option;

use std::cell::{Cell, RefCell};
use std::io::Write;

use tracing::debug;

use crate::lib_registry::LibraryRegistry;
use crate::lua_value::{LuaValue, TableRef};
use crate::stdlib::{self, Stdlib};
use const_string::ConstString;
pub use execute::{
    TmKind, getmetatable, number_to_string, rawget, rawlen, rawset, setmetatable, tostring_raw,
};
pub use lua_error::LuaError;
pub use safe_option::SafeOption;

pub type LuaResult<T> = Result<T, LuaError>;

pub struct LuaVM {
    // Global environment table the translated program reads its names from
    pub(crate) global: TableRef,

    // Library consulted when a string value is indexed ("s:find(...)")
    pub(crate) string_lib: TableRef,

    pub(crate) const_strings: ConstString,

    pub(crate) safe_option: SafeOption,

    // Current nesting of `call`
    pub(crate) call_depth: Cell<usize>,

    // Sink of `print`, stdout unless replaced
    output: RefCell<Box<dyn Write>>,
}

impl LuaVM {
    pub fn new(safe_option: SafeOption) -> Self {
        Self::with_output(safe_option, std::io::stdout())
    }

    /// Context whose `print` writes to `output`
    pub fn with_output(safe_option: SafeOption, output: impl Write + 'static) -> Self {
        LuaVM {
            global: TableRef::new(),
            string_lib: TableRef::new(),
            const_strings: ConstString::new(),
            safe_option,
            call_depth: Cell::new(0),
            output: RefCell::new(Box::new(output)),
        }
    }

    /// Register standard libraries into the global table
    pub fn open_stdlib(&mut self, lib: Stdlib) -> LuaResult<()> {
        let mut registry = LibraryRegistry::new();
        match lib {
            Stdlib::Basic => registry.register(stdlib::basic::create_basic_lib()),
            Stdlib::String => registry.register(stdlib::string::create_string_lib()),
            Stdlib::All => {
                registry.register(stdlib::basic::create_basic_lib());
                registry.register(stdlib::string::create_string_lib());
            }
        }
        registry.load_all(self)?;

        // method lookups on strings resolve against the registered library
        if let LuaValue::Table(string_lib) = self.get_global("string") {
            debug!("string library bound for method lookups");
            self.string_lib = string_lib;
        }
        Ok(())
    }

    /// Global namespace table
    pub fn globals(&self) -> &TableRef {
        &self.global
    }

    pub fn string_lib(&self) -> &TableRef {
        &self.string_lib
    }

    pub fn safe_option(&self) -> &SafeOption {
        &self.safe_option
    }

    pub fn set_global(&self, name: &str, value: impl Into<LuaValue>) -> LuaResult<()> {
        self.global.raw_set(name, value)
    }

    pub fn get_global(&self, name: &str) -> LuaValue {
        self.global.borrow().get_str(name).cloned().unwrap_or_default()
    }

    /// Emit one line on the print sink
    pub(crate) fn write_line(&self, line: &str) -> LuaResult<()> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "{}", line)
            .and_then(|_| output.flush())
            .map_err(|e| LuaError::runtime(format!("cannot write output: {}", e)))
    }
}
