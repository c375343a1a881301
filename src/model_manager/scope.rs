use std::collections::BTreeMap;
use tracing::warn;

use crate::model_manager::definitions::GeneratedModelSpec;

/// Scope used when generation options name none
pub const DEFAULT_SCOPE: &str = "Reflected";

/// A namespace that generated models are registered into, keyed by class name
#[derive(Debug, Clone, Default)]
pub struct ModelScope {
    name: String,
    models: BTreeMap<String, GeneratedModelSpec>,
}

impl ModelScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a spec under its class name, replacing any previous model of
    /// the same name. The model is re-homed into this scope.
    pub fn register(&mut self, mut spec: GeneratedModelSpec) -> &GeneratedModelSpec {
        spec.scope = self.name.clone();
        let class_name = spec.class_name.clone();
        if let Some(previous) = self.models.insert(class_name.clone(), spec) {
            warn!(
                scope = %self.name,
                class = %class_name,
                previous_storage = %previous.storage_name,
                "replacing already registered model"
            );
        }
        &self.models[&class_name]
    }

    /// Register every spec; returns the qualified names in registration order.
    pub fn register_all(&mut self, specs: impl IntoIterator<Item = GeneratedModelSpec>) -> Vec<String> {
        specs
            .into_iter()
            .map(|spec| self.register(spec).qualified_name())
            .collect()
    }

    pub fn get(&self, class_name: &str) -> Option<&GeneratedModelSpec> {
        self.models.get(class_name)
    }

    /// Model bound to a storage, if one was registered
    pub fn for_storage(&self, storage: &str) -> Option<&GeneratedModelSpec> {
        self.models.values().find(|m| m.storage_name == storage)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(storage: &str, class: &str) -> GeneratedModelSpec {
        GeneratedModelSpec {
            storage_name: storage.to_string(),
            class_name: class.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_register_rehomes_and_replaces() {
        let mut scope = ModelScope::new("App");
        let names = scope.register_all(vec![
            spec("users", "User"),
            spec("comments", "Comment"),
        ]);
        assert_eq!(names, vec!["App::User", "App::Comment"]);
        assert_eq!(scope.get("User").unwrap().scope, "App");
        assert_eq!(scope.for_storage("comments").unwrap().class_name, "Comment");

        scope.register(spec("user", "User"));
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.get("User").unwrap().storage_name, "user");
        assert_eq!(scope.class_names().collect::<Vec<_>>(), vec!["Comment", "User"]);
    }

    #[test]
    fn test_empty_scope() {
        let scope = ModelScope::new(DEFAULT_SCOPE);
        assert!(scope.is_empty());
        assert_eq!(scope.name(), "Reflected");
        assert!(scope.get("User").is_none());
    }
}
