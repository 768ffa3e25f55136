//! Name-keyed table of script library descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Where to find a behaviour and how to construct it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDllDescriptor {
    #[serde(rename = "DLLPath")]
    pub dll_path: String,
    #[serde(rename = "FactoryFuncName")]
    pub factory_func_name: String,
    #[serde(rename = "ScriptName")]
    pub script_name: String,
    #[serde(rename = "ScriptDirectoryPath", default)]
    pub script_directory_path: String,
}

impl ScriptDllDescriptor {
    pub fn new(
        dll_path: impl Into<String>,
        factory_func_name: impl Into<String>,
        script_name: impl Into<String>,
    ) -> Self {
        Self {
            dll_path: dll_path.into(),
            factory_func_name: factory_func_name.into(),
            script_name: script_name.into(),
            script_directory_path: String::new(),
        }
    }

    /// A descriptor needs a name and a factory to be loadable
    pub fn is_valid(&self) -> bool {
        !self.script_name.is_empty() && !self.factory_func_name.is_empty()
    }
}

/// Descriptors keyed by logical script name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptDllRegistry {
    descriptors: BTreeMap<String, ScriptDllDescriptor>,
}

impl ScriptDllRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same name
    pub fn add(&mut self, descriptor: ScriptDllDescriptor) -> Option<ScriptDllDescriptor> {
        if !descriptor.is_valid() {
            warn!(descriptor = ?descriptor, "Registering incomplete script descriptor");
        }
        debug!(name = %descriptor.script_name, path = %descriptor.dll_path, "Registered script library");
        self.descriptors
            .insert(descriptor.script_name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ScriptDllDescriptor> {
        self.descriptors.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ScriptDllDescriptor> {
        self.descriptors.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Descriptors in name order
    pub fn iter(&self) -> impl Iterator<Item = &ScriptDllDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
