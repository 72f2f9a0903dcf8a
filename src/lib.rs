//! Thin method-interception layer over a pluggable proxy engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ProxyFactory                          │
//! │   of::<T>()              declared interceptors (registry)    │
//! │   of_with::<T>(extra)    declared + explicit, in order       │
//! │   of_with_options::<T>   explicit only, bypasses registry    │
//! └──────────────┬───────────────────────────────────────────────┘
//!                ▼
//! ┌──────────────────────────┐     ┌──────────────────────────────┐
//! │   ProxyEngine (trait)    │────▶│            Proxy             │
//! │   DispatchEngine default │     │  call ─▶ interceptor chain   │
//! └──────────────────────────┘     │        ─▶ real dispatch      │
//!                                  └──────────────────────────────┘
//! ```
//!
//! Each intercepted call gets one [`Invocation`](invocation::Invocation);
//! interceptors built on [`CallHooks`](interceptor::CallHooks) run the fixed
//! lifecycle `on_entry` → proceed → `on_success` | `on_exception` →
//! `on_exit`.
//!
//! # Caller-visible semantics
//!
//! Hook-lifecycle interceptors **suppress** errors from the wrapped
//! implementation: the caller receives the method's default-for-return-type
//! value and only `on_exception` observes the error. See
//! [`CallHooks`](interceptor::CallHooks) for details.

pub mod engine;
pub mod error;
pub mod factory;
pub mod interceptor;
pub mod invocation;
pub mod proxy;
pub mod registry;
pub mod target;
pub mod testing;

pub use error::{Error, Result};

/// Re-export commonly used types.
///
/// Deliberately excludes the [`Result`](crate::error::Result) alias: a glob
/// import of it would shadow `std::result::Result` and break any
/// two-argument `Result<T, E>` written in the importing module, such as a
/// downstream [`Proxyable`](crate::target::Proxyable) impl.
pub mod prelude {
    pub use crate::engine::{DispatchEngine, ProxyEngine};
    pub use crate::error::Error;
    pub use crate::factory::ProxyFactory;
    pub use crate::interceptor::{CallHooks, Interceptor, TraceHooks};
    pub use crate::invocation::{Invocation, InvocationError};
    pub use crate::proxy::{Proxy, ProxyOptions};
    pub use crate::registry::InterceptorRegistry;
    pub use crate::target::{MethodDescriptor, Proxyable, ReturnShape};
}
