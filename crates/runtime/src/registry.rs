//! Registry of installed game modules.
//!
//! An explicit value owned by the hosting side and injected into the host
//! builder — never ambient global state.

use std::collections::HashMap;
use std::sync::Arc;

use parlor_core::ModuleId;

use crate::api::{Result, RuntimeError};
use crate::module::GameModule;

/// Holds game module descriptors keyed by module id.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleId, Arc<dyn GameModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::DuplicateModule`] if a module with the same
    /// id is already present.
    pub fn register(&mut self, module: impl GameModule + 'static) -> Result<()> {
        self.register_arc(Arc::new(module))
    }

    /// Register an already shared module instance.
    pub fn register_arc(&mut self, module: Arc<dyn GameModule>) -> Result<()> {
        let id = module.id();
        if self.modules.contains_key(&id) {
            return Err(RuntimeError::DuplicateModule { id });
        }
        tracing::debug!(module = %id, "registered game module");
        self.modules.insert(id, module);
        Ok(())
    }

    pub fn get(&self, id: &ModuleId) -> Option<Arc<dyn GameModule>> {
        self.modules.get(id).cloned()
    }

    pub fn has(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
