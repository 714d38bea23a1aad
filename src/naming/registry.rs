use std::collections::{BTreeMap, BTreeSet};

/// Names already handed out within one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRegistry {
    elements: BTreeSet<String>,
    methods: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_element(&self, name: &str) -> bool {
        self.elements.contains(name)
    }

    pub fn contains_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Reserve an element name. Returns false if it was already taken.
    pub fn claim_element(&mut self, name: &str) -> bool {
        self.elements.insert(name.to_string())
    }

    /// Reserve a method name. Returns false if it was already taken.
    pub fn claim_method(&mut self, name: &str) -> bool {
        self.methods.insert(name.to_string())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

/// Per-module registries for one pipeline run. Owned by the caller and
/// dropped with the run.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistries {
    registries: BTreeMap<String, NameRegistry>,
}

impl ModuleRegistries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for `module`, created on first use.
    pub fn for_module(&mut self, module: &str) -> &mut NameRegistry {
        self.registries.entry(module.to_string()).or_default()
    }

    pub fn get(&self, module: &str) -> Option<&NameRegistry> {
        self.registries.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.registries.keys().map(String::as_str)
    }
}
