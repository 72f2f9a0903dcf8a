//! The proxy object: routes calls through an interceptor chain.

use std::fmt;
use std::sync::Arc;

use crate::interceptor::Interceptor;
use crate::invocation::{Invocation, InvocationError};
use crate::target::{MethodDescriptor, Proxyable};

/// Options controlling proxy construction and per-call behavior.
///
/// Opaque to the factory; interpreted by the engine and the invocation.
#[derive(Debug, Clone, Default)]
pub struct ProxyOptions {
    /// Catch panics from the real implementation and surface them as
    /// [`InvocationError::Panicked`], so hook interceptors can absorb them
    /// like any other call failure.
    pub catch_unwinds: bool,
    /// Emit a `tracing` event for every dispatched call.
    pub trace_calls: bool,
}

/// A proxied instance: the wrapped target plus its interceptor chain.
///
/// Implements [`Proxyable`] itself, so a proxy satisfies the same call
/// contract as its target and can stand in for it anywhere, including as
/// the target of another proxy.
pub struct Proxy {
    target: Box<dyn Proxyable>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    options: ProxyOptions,
}

impl Proxy {
    /// Assemble a proxy directly. Engines call this after whatever
    /// validation they impose; most callers go through the factory instead.
    pub fn new(
        target: Box<dyn Proxyable>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        options: ProxyOptions,
    ) -> Self {
        Self {
            target,
            interceptors,
            options,
        }
    }

    /// Number of interceptors in the chain.
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Invoke `method` through the interceptor chain.
    ///
    /// With an empty chain this is a plain pass-through: the target's result,
    /// success or error, reaches the caller unchanged. Interceptors in the
    /// chain may replace the outcome; in particular, hook-lifecycle
    /// interceptors convert call errors into default return values.
    pub fn call(
        &self,
        method: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        let descriptor = self
            .target
            .methods()
            .into_iter()
            .find(|m| m.name == method)
            .ok_or_else(|| InvocationError::UnknownMethod {
                name: method.to_string(),
            })?;

        let mut invocation = Invocation::new(
            descriptor,
            args,
            self.target.as_ref(),
            &self.interceptors,
            &self.options,
        );
        invocation.proceed()?;
        Ok(invocation.take_return_value())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("interceptors", &self.interceptors.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Proxyable for Proxy {
    fn methods(&self) -> Vec<MethodDescriptor> {
        self.target.methods()
    }

    fn dispatch(
        &self,
        method: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        self.call(method, args)
    }
}
