//! Resolving logical script names into behaviour instances

use super::behavior::{Behavior, NoopBehavior};
use super::registry::{ScriptDllDescriptor, ScriptDllRegistry};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a behaviour could not be bound
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptBindError {
    #[error("no script library registered for '{0}'")]
    NotRegistered(String),

    #[error("script descriptor for '{0}' is incomplete")]
    InvalidDescriptor(String),

    #[error("factory '{factory}' not found in '{path}'")]
    FactoryNotFound { path: String, factory: String },
}

/// Constructs behaviours from library descriptors
pub trait BehaviorLoader {
    fn load(&self, descriptor: &ScriptDllDescriptor) -> Result<Box<dyn Behavior>, ScriptBindError>;
}

type BehaviorFactory = Box<dyn Fn() -> Box<dyn Behavior>>;

/// Loader backed by factory functions compiled into the process
#[derive(Default)]
pub struct FactoryBehaviorLoader {
    factories: HashMap<String, BehaviorFactory>,
}

impl FactoryBehaviorLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under the name descriptors refer to it by
    pub fn register<F>(&mut self, factory_name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        let factory_name = factory_name.into();
        debug!(factory = %factory_name, "Registered behavior factory");
        self.factories.insert(factory_name, Box::new(factory));
    }

    pub fn with_factory<F>(mut self, factory_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.register(factory_name, factory);
        self
    }

    pub fn contains(&self, factory_name: &str) -> bool {
        self.factories.contains_key(factory_name)
    }
}

impl std::fmt::Debug for FactoryBehaviorLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("FactoryBehaviorLoader")
            .field("factories", &names)
            .finish()
    }
}

impl BehaviorLoader for FactoryBehaviorLoader {
    fn load(&self, descriptor: &ScriptDllDescriptor) -> Result<Box<dyn Behavior>, ScriptBindError> {
        let factory = self
            .factories
            .get(&descriptor.factory_func_name)
            .ok_or_else(|| ScriptBindError::FactoryNotFound {
                path: descriptor.dll_path.clone(),
                factory: descriptor.factory_func_name.clone(),
            })?;
        Ok(factory())
    }
}

/// Look up `name` in the registry and construct its behaviour
pub fn resolve_behavior(
    registry: &ScriptDllRegistry,
    loader: &dyn BehaviorLoader,
    name: &str,
) -> Result<Box<dyn Behavior>, ScriptBindError> {
    let descriptor = registry
        .get(name)
        .ok_or_else(|| ScriptBindError::NotRegistered(name.to_string()))?;
    if !descriptor.is_valid() {
        return Err(ScriptBindError::InvalidDescriptor(name.to_string()));
    }
    loader.load(descriptor)
}

/// Like [`resolve_behavior`] but never fails: unresolved scripts get a [`NoopBehavior`]
pub fn bind_behavior(
    registry: &ScriptDllRegistry,
    loader: &dyn BehaviorLoader,
    name: &str,
) -> Box<dyn Behavior> {
    match resolve_behavior(registry, loader, name) {
        Ok(behavior) => {
            debug!(script = name, "Bound behavior");
            behavior
        }
        Err(err) => {
            warn!(script = name, error = %err, "Falling back to no-op behavior");
            Box::new(NoopBehavior)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripting::BehaviorContext;

    struct Spin;

    impl Behavior for Spin {
        fn update(&mut self, _ctx: &mut BehaviorContext<'_>) {}

        fn name(&self) -> &str {
            "Spin"
        }
    }

    fn setup() -> (ScriptDllRegistry, FactoryBehaviorLoader) {
        let mut registry = ScriptDllRegistry::new();
        registry.add(ScriptDllDescriptor::new("spin.dll", "CreateSpin", "Spin"));
        registry.add(ScriptDllDescriptor::new("gone.dll", "CreateGone", "Gone"));
        registry.add(ScriptDllDescriptor::new("broken.dll", "", "Broken"));
        let loader = FactoryBehaviorLoader::new().with_factory("CreateSpin", || Box::new(Spin));
        (registry, loader)
    }

    #[test]
    fn test_resolves_registered_script() {
        let (registry, loader) = setup();
        let behavior = bind_behavior(&registry, &loader, "Spin");
        assert_eq!(behavior.name(), "Spin");
    }

    #[test]
    fn test_resolution_errors() {
        let (registry, loader) = setup();
        assert_eq!(
            resolve_behavior(&registry, &loader, "Missing").unwrap_err(),
            ScriptBindError::NotRegistered("Missing".into())
        );
        assert_eq!(
            resolve_behavior(&registry, &loader, "Broken").unwrap_err(),
            ScriptBindError::InvalidDescriptor("Broken".into())
        );
        assert_eq!(
            resolve_behavior(&registry, &loader, "Gone").unwrap_err(),
            ScriptBindError::FactoryNotFound {
                path: "gone.dll".into(),
                factory: "CreateGone".into()
            }
        );
    }

    #[test]
    fn test_unresolved_falls_back_to_noop() {
        let (registry, loader) = setup();
        for name in ["Missing", "Broken", "Gone"] {
            assert_eq!(bind_behavior(&registry, &loader, name).name(), "NoopBehavior");
        }
    }
}
