//! Runnable tour of the interception layer: declares hooks for a target,
//! builds a proxy, and shows the error-suppression semantics.
//!
//! Run with `cargo run --example traced_calls`.

use std::sync::Arc;

use interpose::prelude::*;
use interpose::testing::Calculator;

fn main() -> interpose::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let registry = Arc::new(InterceptorRegistry::new());
    registry.provide::<TraceHooks>("trace");
    registry.declare::<Calculator>(["trace"]);

    let factory = ProxyFactory::new(registry);
    let proxy = factory.of::<Calculator>()?;

    let sum = proxy.call("add", &serde_json::json!({"a": 19, "b": 23}))?;
    println!("add(19, 23) = {sum}");

    // The hook lifecycle absorbs the division-by-zero error; the caller
    // sees the Int default instead.
    let quotient = proxy.call("divide", &serde_json::json!({"a": 1, "b": 0}))?;
    println!("divide(1, 0) = {quotient} (error suppressed by hooks)");

    Ok(())
}
