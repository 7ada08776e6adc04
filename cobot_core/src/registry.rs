//! Named, ordered component registries.
//!
//! A registry holds polymorphic components keyed by unique names, preserving
//! insertion order for deterministic iteration, together with each
//! component's last-computed value. The controller updates the cached values
//! during its compute pass; logging and diagnostics read them afterwards
//! through [`ComponentRegistry::iter`]. No hidden mutation happens on the
//! read side.

use crate::error::RegistryError;

/// One registered component with its metadata.
#[derive(Debug)]
pub(crate) struct Entry<C, V> {
    pub(crate) name: String,
    pub(crate) component: C,
    pub(crate) last_value: V,
    pub(crate) active: bool,
}

/// Ordered collection of named components with cached last values.
///
/// `C` is the component handle (usually a boxed trait object), `V` its
/// computed output. Names are unique; insertion order defines iteration
/// order and nothing else.
#[derive(Debug)]
pub struct ComponentRegistry<C, V> {
    entries: Vec<Entry<C, V>>,
}

impl<C, V> ComponentRegistry<C, V> {
    /// Create an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a component under `name`, active by default. `initial` seeds
    /// the cached value until the first compute pass overwrites it.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateName`] if `name` is taken; the registry is
    /// left unchanged.
    pub fn add(&mut self, name: impl Into<String>, component: C, initial: V) -> Result<(), RegistryError> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.entries.push(Entry {
            name,
            component,
            last_value: initial,
            active: true,
        });
        Ok(())
    }

    /// Remove the component named `name`, returning it.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no such component exists.
    pub fn remove(&mut self, name: &str) -> Result<C, RegistryError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(self.entries.remove(idx).component)
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<&C> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.component)
    }

    /// Look up a component by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut C> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.component)
    }

    /// Last value computed for the component named `name`.
    pub fn last_value(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.last_value)
    }

    /// Enable or disable a component. Disabled components are skipped by the
    /// compute pass but keep their cached last value and their slot in the
    /// iteration order.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no such component exists.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        entry.active = active;
        Ok(())
    }

    /// Whether the component named `name` is active.
    pub fn is_active(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.active)
    }

    /// Iterate `(name, component, last_value)` in insertion order, inactive
    /// entries included. A fresh call reflects the current contents.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &C, &V)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), &e.component, &e.last_value))
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of registered components, inactive ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no components.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutable entry access for the controller's compute pass.
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry<C, V>> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ComponentRegistry<u32, f64> {
        ComponentRegistry::new()
    }

    #[test]
    fn add_and_get() {
        let mut reg = registry();
        reg.add("a", 1, 0.0).unwrap();
        reg.add("b", 2, 0.0).unwrap();
        assert_eq!(reg.get("a"), Some(&1));
        assert_eq!(reg.get("b"), Some(&2));
        assert_eq!(reg.get("c"), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_name_leaves_registry_unchanged() {
        let mut reg = registry();
        reg.add("a", 1, 0.0).unwrap();
        // Simulate a compute pass having cached a value.
        for e in reg.entries_mut() {
            e.last_value = 0.5;
        }
        let err = reg.add("a", 99, 0.0);
        assert_eq!(err, Err(RegistryError::DuplicateName("a".into())));
        assert_eq!(reg.get("a"), Some(&1));
        assert_eq!(reg.last_value("a"), Some(&0.5));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_returns_component_and_restores_order() {
        let mut reg = registry();
        reg.add("a", 1, 0.0).unwrap();
        reg.add("b", 2, 0.0).unwrap();
        reg.add("c", 3, 0.0).unwrap();
        let before: Vec<_> = reg.names().map(str::to_string).collect();

        reg.add("d", 4, 0.0).unwrap();
        assert_eq!(reg.remove("d"), Ok(4));

        let after: Vec<_> = reg.names().map(str::to_string).collect();
        assert_eq!(before, after);

        assert_eq!(reg.remove("missing"), Err(RegistryError::NotFound("missing".into())));
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut reg = registry();
        reg.add("z", 1, 0.0).unwrap();
        reg.add("a", 2, 0.0).unwrap();
        reg.add("m", 3, 0.0).unwrap();
        let names: Vec<_> = reg.iter().map(|(n, _, _)| n).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn set_active_and_inactive_iteration() {
        let mut reg = registry();
        reg.add("a", 1, 0.0).unwrap();
        reg.set_active("a", false).unwrap();
        assert_eq!(reg.is_active("a"), Some(false));
        // Still visible to iteration.
        assert_eq!(reg.iter().count(), 1);
        assert!(matches!(
            reg.set_active("nope", true),
            Err(RegistryError::NotFound(_))
        ));
    }
}
