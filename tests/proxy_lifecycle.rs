//! End-to-end tests for the factory, registry, and hook lifecycle.

use std::sync::Arc;

use interpose::factory::FactoryError;
use interpose::interceptor::Interceptor;
use interpose::prelude::*;
use interpose::registry::RegistryError;
use interpose::testing::{event_log, Calculator, FlakyTarget, RecordingHooks};

fn factory_with(registry: InterceptorRegistry) -> ProxyFactory {
    ProxyFactory::new(Arc::new(registry))
}

#[test]
fn undeclared_target_is_proxied_with_zero_interceptors() {
    let factory = factory_with(InterceptorRegistry::new());
    let proxy = factory.of::<Calculator>().unwrap();

    assert_eq!(proxy.interceptor_count(), 0);

    // Behaves exactly like the unproxied target: results and errors pass
    // through unchanged.
    let sum = proxy
        .call("add", &serde_json::json!({"a": 2, "b": 3}))
        .unwrap();
    assert_eq!(sum, serde_json::json!(5));

    let err = proxy
        .call("divide", &serde_json::json!({"a": 1, "b": 0}))
        .unwrap_err();
    assert!(matches!(err, InvocationError::Failed { .. }));
}

#[test]
fn every_declared_interceptor_runs_on_every_call_in_declaration_order() {
    let log = event_log();
    let first = Arc::new(RecordingHooks::new("first", log.clone()));
    let second = Arc::new(RecordingHooks::new("second", log.clone()));

    let registry = InterceptorRegistry::new();
    let (a, b) = (first.clone(), second.clone());
    registry.provide_with("first", move || Ok(a.clone()));
    registry.provide_with("second", move || Ok(b.clone()));
    registry.declare::<Calculator>(["first", "second"]);

    let factory = factory_with(registry);
    let proxy = factory.of::<Calculator>().unwrap();
    assert_eq!(proxy.interceptor_count(), 2);

    proxy
        .call("add", &serde_json::json!({"a": 1, "b": 1}))
        .unwrap();
    proxy.call("describe", &serde_json::Value::Null).unwrap();

    assert_eq!(first.entry_count(), 2);
    assert_eq!(second.entry_count(), 2);

    // Chain nesting: first enters before second, exits after it.
    let events = log.lock().unwrap();
    assert_eq!(
        &events[..4],
        &[
            "first:on_entry",
            "second:on_entry",
            "second:on_success",
            "second:on_exit",
        ]
    );
    assert_eq!(&events[4..6], &["first:on_success", "first:on_exit"]);
}

#[test]
fn failing_call_fires_exception_hooks_and_returns_default_int() {
    let log = event_log();
    let hooks = Arc::new(RecordingHooks::new("rec", log.clone()));

    let registry = InterceptorRegistry::new();
    let h = hooks.clone();
    registry.provide_with("rec", move || Ok(h.clone()));
    registry.declare::<Calculator>(["rec"]);

    let proxy = factory_with(registry).of::<Calculator>().unwrap();

    // The error never reaches the caller; the slot holds the Int default.
    let out = proxy
        .call("divide", &serde_json::json!({"a": 4, "b": 0}))
        .unwrap();
    assert_eq!(out, serde_json::json!(0));

    assert_eq!(hooks.entry_count(), 1);
    assert_eq!(hooks.exception_count(), 1);
    assert_eq!(hooks.success_count(), 0);
    assert_eq!(hooks.exit_count(), 1);
    assert!(hooks.last_error().unwrap().contains("division by zero"));
}

#[test]
fn failing_call_returns_null_for_reference_shaped_methods() {
    let factory = factory_with(InterceptorRegistry::new());
    let hooks: Arc<dyn Interceptor> = Arc::new(RecordingHooks::new("text", event_log()));
    let proxy = factory
        .of_with_options::<AlwaysFailsText>(ProxyOptions::default(), vec![hooks])
        .unwrap();

    let out = proxy.call("label", &serde_json::Value::Null).unwrap();
    assert_eq!(out, serde_json::Value::Null);
}

#[test]
fn successful_call_fires_entry_success_exit_in_order() {
    let log = event_log();
    let hooks = Arc::new(RecordingHooks::new("rec", log.clone()));

    let registry = InterceptorRegistry::new();
    let h = hooks.clone();
    registry.provide_with("rec", move || Ok(h.clone()));
    registry.declare::<Calculator>(["rec"]);

    let proxy = factory_with(registry).of::<Calculator>().unwrap();
    let out = proxy
        .call("add", &serde_json::json!({"a": 20, "b": 22}))
        .unwrap();

    // Real return value unchanged.
    assert_eq!(out, serde_json::json!(42));
    assert_eq!(hooks.exception_count(), 0);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["rec:on_entry", "rec:on_success", "rec:on_exit"]
    );
}

#[test]
fn of_with_empty_list_matches_of() {
    let log = event_log();
    let hooks = Arc::new(RecordingHooks::new("rec", log.clone()));

    let registry = InterceptorRegistry::new();
    let h = hooks.clone();
    registry.provide_with("rec", move || Ok(h.clone()));
    registry.declare::<Calculator>(["rec"]);

    let factory = factory_with(registry);
    let via_of = factory.of::<Calculator>().unwrap();
    let via_of_with = factory.of_with::<Calculator>(Vec::new()).unwrap();

    assert_eq!(via_of.interceptor_count(), via_of_with.interceptor_count());

    // Same composition, observed: each proxy drives the identical hook
    // sequence for the same call.
    via_of
        .call("add", &serde_json::json!({"a": 1, "b": 2}))
        .unwrap();
    let through_of: Vec<String> = log.lock().unwrap().drain(..).collect();

    via_of_with
        .call("add", &serde_json::json!({"a": 1, "b": 2}))
        .unwrap();
    let through_of_with: Vec<String> = log.lock().unwrap().drain(..).collect();

    assert_eq!(through_of, through_of_with);
    assert_eq!(
        through_of,
        vec!["rec:on_entry", "rec:on_success", "rec:on_exit"]
    );
}

#[test]
fn explicit_interceptors_are_appended_after_declared_ones() {
    let log = event_log();
    let declared = Arc::new(RecordingHooks::new("declared", log.clone()));
    let explicit = Arc::new(RecordingHooks::new("explicit", log.clone()));

    let registry = InterceptorRegistry::new();
    let d = declared.clone();
    registry.provide_with("declared", move || Ok(d.clone()));
    registry.declare::<Calculator>(["declared"]);

    let proxy = factory_with(registry)
        .of_with::<Calculator>(vec![explicit.clone()])
        .unwrap();
    proxy.call("describe", &serde_json::Value::Null).unwrap();

    let events = log.lock().unwrap();
    assert_eq!(events[0], "declared:on_entry");
    assert_eq!(events[1], "explicit:on_entry");
}

#[test]
fn options_factory_bypasses_declarations_entirely() {
    let log = event_log();
    let declared = Arc::new(RecordingHooks::new("declared", log.clone()));
    let unrelated = Arc::new(RecordingHooks::new("unrelated", log.clone()));

    let registry = InterceptorRegistry::new();
    let d = declared.clone();
    registry.provide_with("declared", move || Ok(d.clone()));
    registry.declare::<Calculator>(["declared"]);

    let proxy = factory_with(registry)
        .of_with_options::<Calculator>(ProxyOptions::default(), vec![unrelated.clone()])
        .unwrap();
    proxy.call("describe", &serde_json::Value::Null).unwrap();

    // Declared interceptor never fires; the unrelated one does.
    assert_eq!(declared.entry_count(), 0);
    assert_eq!(unrelated.entry_count(), 1);
}

#[test]
fn unknown_declared_interceptor_fails_construction() {
    let registry = InterceptorRegistry::new();
    registry.declare::<Calculator>(["never-registered"]);

    let err = factory_with(registry).of::<Calculator>().unwrap_err();
    assert!(matches!(
        err,
        FactoryError::Registry(RegistryError::UnknownProvider { ref name }) if name == "never-registered"
    ));
}

#[test]
fn caught_panic_is_suppressed_like_any_other_error() {
    let log = event_log();
    let hooks = Arc::new(RecordingHooks::new("rec", log));
    let chain: Vec<Arc<dyn Interceptor>> = vec![hooks.clone()];

    let factory = factory_with(InterceptorRegistry::new());
    let options = ProxyOptions {
        catch_unwinds: true,
        ..ProxyOptions::default()
    };
    let proxy = factory
        .of_with_options::<Calculator>(options, chain)
        .unwrap();

    let out = proxy.call("crash", &serde_json::Value::Null).unwrap();
    assert_eq!(out, serde_json::Value::Null);
    assert_eq!(hooks.exception_count(), 1);
    assert!(hooks.last_error().unwrap().contains("panicked"));
}

#[test]
fn inner_suppression_makes_outer_hooks_observe_success() {
    let log = event_log();
    let outer = Arc::new(RecordingHooks::new("outer", log.clone()));
    let inner = Arc::new(RecordingHooks::new("inner", log.clone()));
    let chain: Vec<Arc<dyn Interceptor>> = vec![outer.clone(), inner.clone()];

    let factory = factory_with(InterceptorRegistry::new());
    let proxy = factory
        .of_with_options::<Calculator>(ProxyOptions::default(), chain)
        .unwrap();

    proxy
        .call("divide", &serde_json::json!({"a": 1, "b": 0}))
        .unwrap();

    // The inner hook absorbed the error, so the outer one saw a clean call.
    assert_eq!(inner.exception_count(), 1);
    assert_eq!(outer.exception_count(), 0);
    assert_eq!(outer.success_count(), 1);
}

#[test]
fn flaky_target_recovers_between_calls() {
    let factory = factory_with(InterceptorRegistry::new());
    let hooks = Arc::new(RecordingHooks::new("rec", event_log()));
    let chain: Vec<Arc<dyn Interceptor>> = vec![hooks.clone()];
    let proxy = factory
        .of_with_options::<FlakyTarget>(ProxyOptions::default(), chain)
        .unwrap();

    // Default-constructed FlakyTarget starts healthy.
    assert_eq!(
        proxy.call("poke", &serde_json::Value::Null).unwrap(),
        serde_json::json!(1)
    );
    assert_eq!(hooks.success_count(), 1);
}

/// Target whose single reference-shaped method always fails.
#[derive(Default)]
struct AlwaysFailsText;

impl Proxyable for AlwaysFailsText {
    fn methods(&self) -> Vec<MethodDescriptor> {
        vec![MethodDescriptor::new("label", ReturnShape::Text)]
    }

    fn dispatch(
        &self,
        method: &str,
        _args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        Err(InvocationError::Failed {
            method: method.to_string(),
            reason: "no label".to_string(),
        })
    }
}
