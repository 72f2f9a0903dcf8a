//! Proxy factory: assembles interceptor chains and delegates to the engine.

use std::sync::Arc;

use crate::engine::{DispatchEngine, EngineError, ProxyEngine};
use crate::interceptor::Interceptor;
use crate::proxy::{Proxy, ProxyOptions};
use crate::registry::{InterceptorRegistry, RegistryError};
use crate::target::Proxyable;

/// Factory-level errors.
///
/// Both variants propagate the underlying failure unchanged; the factory
/// performs no retries and adds no context beyond the variant itself.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("Interceptor instantiation failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Proxy generation failed: {0}")]
    Engine(#[from] EngineError),
}

/// Builds proxied instances of declared target types.
///
/// Every construction is eager and single-shot: the target and all declared
/// interceptors are instantiated once per call, and no state is retained
/// between calls.
pub struct ProxyFactory {
    registry: Arc<InterceptorRegistry>,
    engine: Arc<dyn ProxyEngine>,
}

impl ProxyFactory {
    /// Factory over `registry` using the default [`DispatchEngine`].
    pub fn new(registry: Arc<InterceptorRegistry>) -> Self {
        Self::with_engine(registry, Arc::new(DispatchEngine))
    }

    /// Factory with a substitute proxy engine.
    pub fn with_engine(registry: Arc<InterceptorRegistry>, engine: Arc<dyn ProxyEngine>) -> Self {
        Self { registry, engine }
    }

    /// Proxy a fresh `T` with the interceptors declared for it, in
    /// declaration order. A type with no declarations still gets proxied,
    /// with an empty chain.
    pub fn of<T>(&self) -> Result<Proxy, FactoryError>
    where
        T: Proxyable + Default + 'static,
    {
        self.of_with::<T>(Vec::new())
    }

    /// Proxy a fresh `T` with its declared interceptors followed by `extra`.
    ///
    /// With an empty `extra` this is identical to [`of`](Self::of).
    pub fn of_with<T>(&self, extra: Vec<Arc<dyn Interceptor>>) -> Result<Proxy, FactoryError>
    where
        T: Proxyable + Default + 'static,
    {
        let mut interceptors = self.registry.construct_declared::<T>()?;
        interceptors.extend(extra);
        self.create::<T>(interceptors, ProxyOptions::default())
    }

    /// Proxy a fresh `T` with exactly the given interceptors and options,
    /// bypassing declarations entirely.
    pub fn of_with_options<T>(
        &self,
        options: ProxyOptions,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Proxy, FactoryError>
    where
        T: Proxyable + Default + 'static,
    {
        self.create::<T>(interceptors, options)
    }

    fn create<T>(
        &self,
        interceptors: Vec<Arc<dyn Interceptor>>,
        options: ProxyOptions,
    ) -> Result<Proxy, FactoryError>
    where
        T: Proxyable + Default + 'static,
    {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            interceptors = interceptors.len(),
            "constructing proxy"
        );
        let target = Box::new(T::default());
        Ok(self.engine.create(target, interceptors, options)?)
    }
}
