//! A name-keyed registry of factories used to wire the application together.

use std::{any::Any, collections::HashMap};

use crate::Error;

type Factory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Resolves services by name.
///
/// Every [Container::resolve] call runs the registered factory again, there is
/// no lifetime management. A service that should be shared must memoise
/// itself inside its factory, usually by cloning an `Arc`:
///
/// ```
/// use std::sync::Arc;
///
/// use finboard::Container;
///
/// let mut container = Container::new();
/// let shared = Arc::new(String::from("BRL"));
/// container.register("currency", move || shared.clone());
///
/// let a = container.resolve::<Arc<String>>("currency").unwrap();
/// let b = container.resolve::<Arc<String>>("currency").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct Container {
    factories: HashMap<String, Factory>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `factory` under `name`, replacing any factory registered under that name before.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!("registering dependency \"{name}\"");

        self.factories
            .insert(name, Box::new(move || Box::new(factory())));
    }

    /// Run the factory registered under `name` and return its value.
    ///
    /// # Errors
    /// Returns [Error::DependencyNotFound] if nothing is registered under
    /// `name`, or [Error::DependencyTypeMismatch] if the factory does not
    /// produce a `T`.
    pub fn resolve<T: Any>(&self, name: &str) -> Result<T, Error> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::DependencyNotFound(name.to_owned()))?;

        let value: Box<dyn Any> = factory();

        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::DependencyTypeMismatch(name.to_owned()))
    }

    /// Whether a factory is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Remove the factory registered under `name`, returning whether there was one.
    pub fn remove(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// Remove every factory.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    /// The number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();

        f.debug_struct("Container").field("names", &names).finish()
    }
}
