//! # Plugin Registry
//!
//! Per §4.7, a plugin is a named extension that contributes primitive
//! constructors, transforms, built-in functions, or import/export handlers.
//! Plugins are registered once at boot, go through `initialize` then
//! `activate`, and stay resolvable until the process shuts down (or a host
//! explicitly calls `deactivate`). The evaluator's module-call resolution
//! order is user-defined modules, then built-ins, then plugin-registered
//! extensions, then "unknown module" — this registry only ever answers the
//! third step, via [`openscad_eval::PluginResolver`].

use std::collections::HashMap;
use std::sync::Arc;

use openscad_eval::{GeometryNode, PluginResolver, Value};
use thiserror::Error;

/// Errors raised while registering or activating a plugin.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two plugins both claim the same module name.
    #[error("module '{module}' is already provided by plugin '{owner}'")]
    DuplicateModule { module: String, owner: String },

    /// `Plugin::initialize` or `Plugin::activate` failed.
    #[error("plugin '{plugin}' failed to {stage}: {message}")]
    LifecycleError { plugin: String, stage: &'static str, message: String },
}

/// A named extension contributing module constructors to the evaluator.
///
/// Implementors are registered once and resolved by name for the lifetime of
/// the registry; `initialize`/`activate`/`deactivate` are lifecycle hooks a
/// plugin can use to set up or tear down external resources (a loaded font
/// table, a connection to an import service, etc).
pub trait Plugin: Send + Sync {
    /// Stable, human-readable identifier for this plugin (used in error
    /// messages and logs, not by the evaluator).
    fn name(&self) -> &str;

    /// Module names this plugin resolves calls for, e.g. `["gear", "thread"]`.
    fn module_names(&self) -> &[&str];

    /// Called once, immediately after registration, before `activate`.
    /// The default implementation does nothing.
    fn initialize(&self) -> Result<(), String> {
        Ok(())
    }

    /// Called once after a successful `initialize`, marking the plugin live.
    /// The default implementation does nothing.
    fn activate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Called when the plugin is being removed from a registry (rare outside
    /// tests — most hosts register plugins for the process lifetime). The
    /// default implementation does nothing.
    fn deactivate(&self) {}

    /// Build geometry for a call to `module_name` with already-evaluated
    /// positional argument values. Only called for names this plugin listed
    /// in [`Plugin::module_names`].
    fn call(&self, module_name: &str, args: &[Value]) -> Option<GeometryNode>;
}

/// Boot-time registry of [`Plugin`]s, consulted by the evaluator as the last
/// step of module-call resolution.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    owners: HashMap<String, String>,
}

impl PluginRegistry {
    /// An empty registry with no plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `plugin`, running its `initialize` then `activate` hooks.
    ///
    /// Fails without registering anything if any of its module names were
    /// already claimed, or if either lifecycle hook returns an error.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), RegistryError> {
        for module in plugin.module_names() {
            if let Some(owner) = self.owners.get(*module) {
                return Err(RegistryError::DuplicateModule {
                    module: (*module).to_string(),
                    owner: owner.clone(),
                });
            }
        }
        plugin.initialize().map_err(|message| RegistryError::LifecycleError {
            plugin: plugin.name().to_string(),
            stage: "initialize",
            message,
        })?;
        plugin.activate().map_err(|message| RegistryError::LifecycleError {
            plugin: plugin.name().to_string(),
            stage: "activate",
            message,
        })?;
        for module in plugin.module_names() {
            self.owners.insert((*module).to_string(), plugin.name().to_string());
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Deactivate and drop every registered plugin.
    pub fn clear(&mut self) {
        for plugin in &self.plugins {
            plugin.deactivate();
        }
        self.plugins.clear();
        self.owners.clear();
    }

    /// Names of every currently-registered plugin.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}

impl PluginResolver for PluginRegistry {
    fn resolve(&self, name: &str, args: &[Value]) -> Option<GeometryNode> {
        let owner = self.owners.get(name)?;
        let plugin = self.plugins.iter().find(|p| p.name() == owner)?;
        plugin.call(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tetra;

    impl Plugin for Tetra {
        fn name(&self) -> &str {
            "tetra"
        }

        fn module_names(&self) -> &[&str] {
            &["tetra"]
        }

        fn call(&self, module_name: &str, _args: &[Value]) -> Option<GeometryNode> {
            if module_name == "tetra" {
                Some(GeometryNode::Empty)
            } else {
                None
            }
        }
    }

    struct FailsToInitialize;

    impl Plugin for FailsToInitialize {
        fn name(&self) -> &str {
            "broken"
        }

        fn module_names(&self) -> &[&str] {
            &["broken_module"]
        }

        fn initialize(&self) -> Result<(), String> {
            Err("no license key".to_string())
        }

        fn call(&self, _module_name: &str, _args: &[Value]) -> Option<GeometryNode> {
            None
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Tetra)).unwrap();
        assert!(registry.resolve("tetra", &[]).is_some());
        assert!(registry.resolve("unknown", &[]).is_none());
    }

    #[test]
    fn test_duplicate_module_name_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Tetra)).unwrap();
        let err = registry.register(Arc::new(Tetra)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateModule { .. }));
    }

    #[test]
    fn test_failed_initialize_does_not_register() {
        let mut registry = PluginRegistry::new();
        let err = registry.register(Arc::new(FailsToInitialize)).unwrap_err();
        assert!(matches!(err, RegistryError::LifecycleError { stage: "initialize", .. }));
        assert!(registry.plugin_names().is_empty());
    }

    #[test]
    fn test_clear_deactivates_and_empties() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Tetra)).unwrap();
        registry.clear();
        assert!(registry.plugin_names().is_empty());
        assert!(registry.resolve("tetra", &[]).is_none());
    }
}
