//! Driver registry: name → factory.
//!
//! Backends register a factory under a name; applications select one in
//! their configuration file and the registry builds it from the driver's
//! TOML parameter table. Registration happens at startup, creation once per
//! session.

use toml::Value;

use crate::driver::{Driver, DriverError};
use crate::sim::SimDriver;

/// Builds a driver from its TOML parameter table.
pub type DriverFactory = fn(&Value) -> Result<Box<dyn Driver>, DriverError>;

/// Registry of named driver factories, iterated in registration order.
pub struct DriverRegistry {
    factories: Vec<(String, DriverFactory)>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Create a registry with the built-in backends (`sim`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register("sim", SimDriver::from_config)
            .expect("empty registry has no duplicates");
        registry
    }

    /// Register a factory under `name`.
    ///
    /// # Errors
    /// [`DriverError::DuplicateDriver`] if the name is taken; the existing
    /// factory stays in place.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: DriverFactory,
    ) -> Result<(), DriverError> {
        let name = name.into();
        if self.factories.iter().any(|(n, _)| *n == name) {
            return Err(DriverError::DuplicateDriver(name));
        }
        self.factories.push((name, factory));
        Ok(())
    }

    /// Build the driver registered under `name` from `params`.
    pub fn create(&self, name: &str, params: &Value) -> Result<Box<dyn Driver>, DriverError> {
        let factory = self
            .factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
            .ok_or_else(|| DriverError::UnknownDriver(name.to_string()))?;
        factory(params)
    }

    /// Registered backend names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(n, _)| n.as_str())
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
