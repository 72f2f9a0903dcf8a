//! Interceptor registry: named constructors and per-target declarations.
//!
//! Replaces attribute-style discovery with an explicit mapping, populated at
//! a well-defined initialization point (typically process startup). Targets
//! are keyed by [`TypeId`]; interceptor constructors ("providers") are keyed
//! by name. Declaration order is registration order.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::interceptor::Interceptor;

/// Registry-level errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("No interceptor provider registered under name {name}")]
    UnknownProvider { name: String },

    #[error("Interceptor {name} could not be constructed: {reason}")]
    ConstructionFailed { name: String, reason: String },
}

type Provider = Box<dyn Fn() -> Result<Arc<dyn Interceptor>, RegistryError> + Send + Sync>;

/// Maps interceptor names to constructors and target types to ordered
/// interceptor declarations.
///
/// The factory reads this at proxy-construction time. Registration normally
/// happens once during startup; the interior locks exist so a shared
/// registry can still be mutated in tests or long-lived processes. Lock
/// poisoning is recovered from on every path: each guarded operation leaves
/// the maps structurally valid, so a panic in another thread never loses or
/// blocks registrations.
#[derive(Default)]
pub struct InterceptorRegistry {
    providers: RwLock<HashMap<String, Provider>>,
    declarations: RwLock<HashMap<TypeId, Vec<String>>>,
}

/// Acquire a write guard, recovering from poisoning.
fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Acquire a read guard, recovering from poisoning.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

impl InterceptorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider that constructs `I` via its `Default` impl.
    pub fn provide<I>(&self, name: impl Into<String>)
    where
        I: Interceptor + Default + 'static,
    {
        self.provide_with(name, || Ok(Arc::new(I::default())));
    }

    /// Register a provider from an arbitrary construction function.
    ///
    /// This is the escape hatch for interceptor types without a meaningful
    /// `Default`, or ones needing shared state injected at construction.
    pub fn provide_with<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn() -> Result<Arc<dyn Interceptor>, RegistryError> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(interceptor = %name, "registered interceptor provider");
        write(&self.providers).insert(name, Box::new(f));
    }

    /// Remove a provider by name. Returns `true` if it existed.
    pub fn remove_provider(&self, name: &str) -> bool {
        write(&self.providers).remove(name).is_some()
    }

    /// Declare interceptors for target type `T`, in order, appended after
    /// any earlier declarations for the same type.
    pub fn declare<T: 'static>(&self, names: impl IntoIterator<Item = impl Into<String>>) {
        let mut declarations = write(&self.declarations);
        let entry = declarations.entry(TypeId::of::<T>()).or_default();
        for name in names {
            let name = name.into();
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                interceptor = %name,
                "declared interceptor"
            );
            entry.push(name);
        }
    }

    /// Drop every declaration for `T`. Returns `true` if any existed.
    pub fn undeclare<T: 'static>(&self) -> bool {
        write(&self.declarations).remove(&TypeId::of::<T>()).is_some()
    }

    /// The declared interceptor names for `T`, in declaration order.
    pub fn declarations_for<T: 'static>(&self) -> Vec<String> {
        read(&self.declarations)
            .get(&TypeId::of::<T>())
            .cloned()
            .unwrap_or_default()
    }

    /// All registered provider names (unordered).
    pub fn providers(&self) -> Vec<String> {
        read(&self.providers).keys().cloned().collect()
    }

    /// Construct the interceptor registered under `name`.
    pub fn construct(&self, name: &str) -> Result<Arc<dyn Interceptor>, RegistryError> {
        let providers = read(&self.providers);
        let provider = providers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProvider {
                name: name.to_string(),
            })?;
        provider()
    }

    /// Construct every interceptor declared for `T`, in declaration order.
    pub fn construct_declared<T: 'static>(
        &self,
    ) -> Result<Vec<Arc<dyn Interceptor>>, RegistryError> {
        self.declarations_for::<T>()
            .iter()
            .map(|name| self.construct(name))
            .collect()
    }
}
