// Call operator
use crate::lua_value::{LuaValue, MultiValue};
use crate::lua_vm::{LuaError, LuaResult, LuaVM, TmKind};

/// Depth counter held for the duration of one call
struct CallGuard<'a> {
    vm: &'a LuaVM,
}

impl<'a> CallGuard<'a> {
    fn enter(vm: &'a LuaVM) -> LuaResult<Self> {
        let depth = vm.call_depth.get();
        if depth >= vm.safe_option.max_call_depth {
            return Err(LuaError::runtime("stack overflow"));
        }
        vm.call_depth.set(depth + 1);
        Ok(CallGuard { vm })
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.vm.call_depth.set(self.vm.call_depth.get() - 1);
    }
}

impl LuaVM {
    /// `callee(args...)`, returning the whole result list.
    ///
    /// A `__call` handler receives the callee followed by the arguments.
    pub fn call(&self, callee: &LuaValue, args: &[LuaValue]) -> LuaResult<MultiValue> {
        let _guard = CallGuard::enter(self)?;

        // functions never carry a metatable
        if let LuaValue::Function(f) = callee {
            return f.invoke(self, args);
        }

        match self.get_metamethod(callee, TmKind::Call)? {
            Some(handler) => {
                let mut full_args = Vec::with_capacity(args.len() + 1);
                full_args.push(callee.clone());
                full_args.extend_from_slice(args);
                self.call(&handler, &full_args)
            }
            None => Err(LuaError::attempt_to("call", callee.kind())),
        }
    }

    /// `target:name(args...)`
    pub fn method(&self, target: &LuaValue, name: &str, args: &[LuaValue]) -> LuaResult<MultiValue> {
        let func = self.index(target, &LuaValue::from(name))?;
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(target.clone());
        full_args.extend_from_slice(args);
        self.call(&func, &full_args)
    }
}
