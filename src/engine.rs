//! Pluggable proxy engine.
//!
//! The engine is the collaborator that turns a target and an interceptor
//! chain into a proxied instance. It is behind a trait so the hook lifecycle
//! and factory stay independent of how proxies are materialized; the
//! in-crate [`DispatchEngine`] is the default.

use std::sync::Arc;

use crate::interceptor::Interceptor;
use crate::proxy::{Proxy, ProxyOptions};
use crate::target::Proxyable;

/// Proxy-generation errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Target is not proxy-compatible: {reason}")]
    UnsupportedTarget { reason: String },
}

/// Produces proxied instances from a target and an interceptor chain.
pub trait ProxyEngine: Send + Sync {
    /// Build a proxy whose calls route through `interceptors` before
    /// reaching `target`.
    fn create(
        &self,
        target: Box<dyn Proxyable>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        options: ProxyOptions,
    ) -> Result<Proxy, EngineError>;
}

/// Default engine: validates the target's method table and assembles a
/// [`Proxy`] around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchEngine;

impl ProxyEngine for DispatchEngine {
    fn create(
        &self,
        target: Box<dyn Proxyable>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        options: ProxyOptions,
    ) -> Result<Proxy, EngineError> {
        let methods = target.methods();
        if methods.is_empty() {
            return Err(EngineError::UnsupportedTarget {
                reason: "method table is empty".to_string(),
            });
        }
        for (i, method) in methods.iter().enumerate() {
            if methods[..i].iter().any(|m| m.name == method.name) {
                return Err(EngineError::UnsupportedTarget {
                    reason: format!("duplicate method name: {}", method.name),
                });
            }
        }

        tracing::debug!(
            methods = methods.len(),
            interceptors = interceptors.len(),
            "creating proxy"
        );
        Ok(Proxy::new(target, interceptors, options))
    }
}
