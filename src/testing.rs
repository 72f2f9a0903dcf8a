//! Test harness: recording hooks and sample targets.
//!
//! Provides:
//! - [`RecordingHooks`]: a [`CallHooks`] implementor that counts hook firings
//!   and appends them to a shared event log
//! - [`Calculator`]: a sample target with value-, reference-, and
//!   unit-returning methods, including one that always fails and one that
//!   panics
//! - [`FlakyTarget`]: a target whose single method fails on demand
//!
//! Used by the unit and integration tests and the example binary.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::interceptor::CallHooks;
use crate::invocation::{Invocation, InvocationError};
use crate::target::{MethodDescriptor, Proxyable, ReturnShape};

/// Shared, ordered record of hook firings across interceptors.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Create an empty shared event log.
pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Hook implementor that records every firing.
///
/// Events land in the shared log as `"<name>:<hook>"`, so tests can assert
/// both per-interceptor counts and cross-interceptor ordering.
pub struct RecordingHooks {
    name: String,
    log: EventLog,
    entries: AtomicU32,
    successes: AtomicU32,
    exceptions: AtomicU32,
    exits: AtomicU32,
    last_error: Mutex<Option<String>>,
}

impl RecordingHooks {
    pub fn new(name: impl Into<String>, log: EventLog) -> Self {
        Self {
            name: name.into(),
            log,
            entries: AtomicU32::new(0),
            successes: AtomicU32::new(0),
            exceptions: AtomicU32::new(0),
            exits: AtomicU32::new(0),
            last_error: Mutex::new(None),
        }
    }

    fn record(&self, hook: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{}:{}", self.name, hook));
        }
    }

    pub fn entry_count(&self) -> u32 {
        self.entries.load(Ordering::SeqCst)
    }

    pub fn success_count(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exception_count(&self) -> u32 {
        self.exceptions.load(Ordering::SeqCst)
    }

    pub fn exit_count(&self) -> u32 {
        self.exits.load(Ordering::SeqCst)
    }

    /// Display form of the last error observed by `on_exception`.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }
}

impl CallHooks for RecordingHooks {
    fn on_entry(&self, _invocation: &Invocation<'_>) {
        self.entries.fetch_add(1, Ordering::SeqCst);
        self.record("on_entry");
    }

    fn on_success(&self, _invocation: &Invocation<'_>) {
        self.successes.fetch_add(1, Ordering::SeqCst);
        self.record("on_success");
    }

    fn on_exception(&self, _invocation: &Invocation<'_>, error: &InvocationError) {
        self.exceptions.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(error.to_string());
        }
        self.record("on_exception");
    }

    fn on_exit(&self, _invocation: &Invocation<'_>) {
        self.exits.fetch_add(1, Ordering::SeqCst);
        self.record("on_exit");
    }
}

/// Sample target covering the return shapes the interception layer cares
/// about.
///
/// Methods:
/// - `add` — returns `a + b` as an integer
/// - `divide` — returns `a / b`, fails when `b` is zero
/// - `describe` — returns a text description
/// - `crash` — always panics
#[derive(Debug, Default)]
pub struct Calculator;

impl Proxyable for Calculator {
    fn methods(&self) -> Vec<MethodDescriptor> {
        vec![
            MethodDescriptor::new("add", ReturnShape::Int),
            MethodDescriptor::new("divide", ReturnShape::Int),
            MethodDescriptor::new("describe", ReturnShape::Text),
            MethodDescriptor::new("crash", ReturnShape::Unit),
        ]
    }

    fn dispatch(
        &self,
        method: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        let operand = |key: &str| args.get(key).and_then(|v| v.as_i64()).unwrap_or(0);
        match method {
            "add" => Ok(serde_json::json!(operand("a") + operand("b"))),
            "divide" => {
                let b = operand("b");
                if b == 0 {
                    return Err(InvocationError::failed("divide", "division by zero"));
                }
                Ok(serde_json::json!(operand("a") / b))
            }
            "describe" => Ok(serde_json::json!("a simple calculator")),
            "crash" => panic!("calculator crashed"),
            other => Err(InvocationError::UnknownMethod {
                name: other.to_string(),
            }),
        }
    }
}

/// Target whose single `poke` method fails whenever the flag is set.
#[derive(Debug, Default)]
pub struct FlakyTarget {
    failing: AtomicBool,
}

impl FlakyTarget {
    /// Make subsequent `poke` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Proxyable for FlakyTarget {
    fn methods(&self) -> Vec<MethodDescriptor> {
        vec![MethodDescriptor::new("poke", ReturnShape::Int)]
    }

    fn dispatch(
        &self,
        method: &str,
        _args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        if method != "poke" {
            return Err(InvocationError::UnknownMethod {
                name: method.to_string(),
            });
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(InvocationError::failed("poke", "flake"));
        }
        Ok(serde_json::json!(1))
    }
}
