use indexmap::IndexMap;

use crate::value::Value;

/// Hook through which `import` statements resolve host-level modules. The
/// interpreter only needs this capability shape; embedders may back it with
/// anything from a fixed table to a filesystem loader.
pub trait ModuleResolver {
    fn resolve_module(&self, name: &str) -> Option<Value>;
}

/// The default resolver: a fixed table of built-in modules (`math`,
/// `strings`, `time`) assembled from native functions.
pub struct BuiltinModules {
    modules: IndexMap<String, Value>,
}

impl Default for BuiltinModules {
    fn default() -> Self {
        Self {
            modules: crate::stdlib::module_table(),
        }
    }
}

impl BuiltinModules {
    /// Adds (or replaces) a module binding, for embedders extending the
    /// default set.
    pub fn register(&mut self, name: impl Into<String>, module: Value) {
        self.modules.insert(name.into(), module);
    }
}

impl ModuleResolver for BuiltinModules {
    fn resolve_module(&self, name: &str) -> Option<Value> {
        self.modules.get(name).cloned()
    }
}
