//! Per-call invocation context and chain traversal.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::interceptor::Interceptor;
use crate::proxy::ProxyOptions;
use crate::target::{MethodDescriptor, Proxyable};

/// Errors raised while executing an intercepted call.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("Method {name} not found on target")]
    UnknownMethod { name: String },

    #[error("Method {method} failed: {reason}")]
    Failed { method: String, reason: String },

    #[error("Method {method} panicked: {message}")]
    Panicked { method: String, message: String },
}

impl InvocationError {
    /// Shorthand for `Failed` with a formatted reason.
    pub fn failed(method: impl Into<String>, reason: impl Into<String>) -> Self {
        InvocationError::Failed {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

/// Context for one in-flight call on a proxied instance.
///
/// Carries the target method's metadata, the call arguments, the interceptor
/// chain, and the mutable return-value slot. Interceptors drive the call
/// forward with [`proceed`](Invocation::proceed): each call advances to the
/// next interceptor in the chain, and past the end of the chain dispatches
/// the real implementation. One invocation exists per call and is never
/// reused.
pub struct Invocation<'a> {
    method: MethodDescriptor,
    args: &'a serde_json::Value,
    target: &'a dyn Proxyable,
    chain: &'a [Arc<dyn Interceptor>],
    options: &'a ProxyOptions,
    next: usize,
    return_value: serde_json::Value,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        method: MethodDescriptor,
        args: &'a serde_json::Value,
        target: &'a dyn Proxyable,
        chain: &'a [Arc<dyn Interceptor>],
        options: &'a ProxyOptions,
    ) -> Self {
        Self {
            method,
            args,
            target,
            chain,
            options,
            next: 0,
            return_value: serde_json::Value::Null,
        }
    }

    /// Metadata for the method being called.
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Arguments for this call.
    pub fn args(&self) -> &serde_json::Value {
        self.args
    }

    /// Current contents of the return-value slot.
    pub fn return_value(&self) -> &serde_json::Value {
        &self.return_value
    }

    /// Overwrite the return-value slot.
    pub fn set_return_value(&mut self, value: serde_json::Value) {
        self.return_value = value;
    }

    /// Consume the slot, leaving `Null` behind. Called once by the proxy
    /// after the chain completes.
    pub(crate) fn take_return_value(&mut self) -> serde_json::Value {
        std::mem::take(&mut self.return_value)
    }

    /// Advance the call: run the next interceptor in the chain, or dispatch
    /// the real implementation once the chain is exhausted.
    ///
    /// On a successful dispatch the return-value slot holds the real return
    /// value. On error the slot is left untouched; whether the error reaches
    /// the original caller depends on the interceptors above this point.
    pub fn proceed(&mut self) -> Result<(), InvocationError> {
        let index = self.next;
        if index < self.chain.len() {
            self.next += 1;
            let interceptor = Arc::clone(&self.chain[index]);
            return interceptor.intercept(self);
        }

        if self.options.trace_calls {
            tracing::debug!(method = %self.method.name, "dispatching intercepted call");
        }

        let result = if self.options.catch_unwinds {
            match std::panic::catch_unwind(AssertUnwindSafe(|| {
                self.target.dispatch(&self.method.name, self.args)
            })) {
                Ok(result) => result,
                Err(payload) => Err(InvocationError::Panicked {
                    method: self.method.name.clone(),
                    message: panic_message(payload.as_ref()),
                }),
            }
        } else {
            self.target.dispatch(&self.method.name, self.args)
        };

        self.return_value = result?;
        Ok(())
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
