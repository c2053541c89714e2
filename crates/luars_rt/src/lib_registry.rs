// Library registration system for the standard libraries
// Provides a clean way to register Rust functions as guest libraries

use tracing::debug;

use crate::lua_value::{CFunction, LuaValue, TableRef};
use crate::lua_vm::{LuaResult, LuaVM};

/// Type for value initializers - functions that create values when the module loads
pub type ValueInitializer = fn(&LuaVM) -> LuaValue;

/// Entry in a library module - can be a function or a value
pub enum LibraryEntry {
    Function(CFunction),
    Value(ValueInitializer),
}

impl LibraryEntry {
    fn materialize(&self, vm: &LuaVM) -> LuaValue {
        match self {
            LibraryEntry::Function(func) => LuaValue::cfunction(*func),
            LibraryEntry::Value(value_init) => value_init(vm),
        }
    }
}

/// A library module containing multiple functions and values
pub struct LibraryModule {
    pub name: &'static str,
    pub entries: Vec<(&'static str, LibraryEntry)>,
}

impl LibraryModule {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Add a value to this library
    pub fn with_value(mut self, name: &'static str, value_init: ValueInitializer) -> Self {
        self.entries.push((name, LibraryEntry::Value(value_init)));
        self
    }
}

/// Builder for creating library modules with functions
#[macro_export]
macro_rules! lib_module {
    ($name:expr, {
        $($item_name:expr => $item:expr),* $(,)?
    }) => {{
        let mut module = $crate::lib_registry::LibraryModule::new($name);
        $(
            module.entries.push(($item_name, $crate::lib_registry::LibraryEntry::Function($item)));
        )*
        module
    }};
}

/// Registry of library modules, loaded in registration order
pub struct LibraryRegistry {
    modules: Vec<LibraryModule>,
}

impl LibraryRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    pub fn register(&mut self, module: LibraryModule) {
        self.modules.push(module);
    }

    /// Load all registered libraries into a VM
    pub fn load_all(&self, vm: &LuaVM) -> LuaResult<()> {
        for module in &self.modules {
            self.load_module(vm, module)?;
        }
        Ok(())
    }

    /// Load one module. `_G` entries land in the global table itself, any
    /// other module becomes a global table named after it.
    pub fn load_module(&self, vm: &LuaVM, module: &LibraryModule) -> LuaResult<()> {
        debug!(
            module = module.name,
            entries = module.entries.len(),
            "loading library"
        );

        let target = if module.name == "_G" {
            vm.globals().clone()
        } else {
            let lib_table = TableRef::new();
            vm.set_global(module.name, lib_table.clone())?;
            lib_table
        };

        for (name, entry) in &module.entries {
            target.raw_set(*name, entry.materialize(vm))?;
        }
        Ok(())
    }

    pub fn get_module(&self, name: &str) -> Option<&LibraryModule> {
        self.modules.iter().find(|m| m.name == name)
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
