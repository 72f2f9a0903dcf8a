//! Interceptor trait and the hook lifecycle built on top of it.

use crate::invocation::{Invocation, InvocationError};

/// An object that wraps intercepted calls.
///
/// Implementations receive the per-call [`Invocation`] and decide how the
/// call moves forward, normally by calling [`Invocation::proceed`] exactly
/// once. A plain interceptor may forward dispatch errors to the caller by
/// returning them; interceptors built on [`CallHooks`] never do.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<(), InvocationError>;
}

/// Lifecycle hooks around an intercepted call.
///
/// Implementing this trait yields an [`Interceptor`] with a fixed sequence:
/// `on_entry`, then proceed, then `on_success` or `on_exception`, then
/// `on_exit`. The four hooks are the only customization surface; the
/// sequencing itself is not overridable.
///
/// # Error suppression
///
/// If the wrapped call fails, the return-value slot is set to the method's
/// default-for-return-type and the error is handed to `on_exception` — and
/// then dropped. **Callers of a method wrapped only by hook-lifecycle
/// interceptors never observe errors from the real implementation**; they
/// observe the default value for the method's return shape instead. This
/// total-suppression policy is deliberate and part of the contract, not a
/// recovery heuristic.
pub trait CallHooks: Send + Sync {
    /// Runs before the real method.
    fn on_entry(&self, _invocation: &Invocation<'_>) {}

    /// Runs after the real method completed without error.
    fn on_success(&self, _invocation: &Invocation<'_>) {}

    /// Runs when the real method raised an error. The only observer of the
    /// error; it does not get a chance to re-raise it.
    fn on_exception(&self, _invocation: &Invocation<'_>, _error: &InvocationError) {}

    /// Runs last, after success or exception alike.
    fn on_exit(&self, _invocation: &Invocation<'_>) {}
}

impl<H: CallHooks> Interceptor for H {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<(), InvocationError> {
        self.on_entry(invocation);
        match invocation.proceed() {
            Ok(()) => self.on_success(invocation),
            Err(error) => {
                tracing::debug!(
                    method = %invocation.method().name,
                    %error,
                    "suppressing intercepted call error, returning default value"
                );
                let default = invocation.method().returns.default_value();
                invocation.set_return_value(default);
                self.on_exception(invocation, &error);
            }
        }
        self.on_exit(invocation);
        Ok(())
    }
}

/// Hook implementor that logs the call lifecycle through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceHooks;

impl CallHooks for TraceHooks {
    fn on_entry(&self, invocation: &Invocation<'_>) {
        tracing::debug!(method = %invocation.method().name, "call entered");
    }

    fn on_success(&self, invocation: &Invocation<'_>) {
        tracing::debug!(method = %invocation.method().name, "call succeeded");
    }

    fn on_exception(&self, invocation: &Invocation<'_>, error: &InvocationError) {
        tracing::warn!(method = %invocation.method().name, %error, "call failed");
    }

    fn on_exit(&self, invocation: &Invocation<'_>) {
        tracing::debug!(method = %invocation.method().name, "call exited");
    }
}
