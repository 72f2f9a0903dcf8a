//! Target call contract: method metadata and the dispatch trait.

use serde::{Deserialize, Serialize};

use crate::invocation::InvocationError;

/// Declared return kind of an interceptable method.
///
/// The shape decides what "default value" means when an intercepted call
/// fails and its error is absorbed by the hook lifecycle: value shapes get a
/// zero-valued instance, reference and nullable shapes get `Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnShape {
    /// No meaningful return value.
    Unit,
    /// Boolean; defaults to `false`.
    Bool,
    /// Integer; defaults to `0`.
    Int,
    /// Floating point; defaults to `0.0`.
    Float,
    /// Text; reference-shaped, defaults to `Null`.
    Text,
    /// Arbitrary JSON structure; reference-shaped, defaults to `Null`.
    Json,
    /// Explicitly optional; defaults to `Null`.
    Nullable,
}

impl ReturnShape {
    /// The default-for-return-type value substituted when a call's error is
    /// suppressed by the hook lifecycle.
    pub fn default_value(&self) -> serde_json::Value {
        match self {
            ReturnShape::Bool => serde_json::Value::Bool(false),
            ReturnShape::Int => serde_json::json!(0),
            ReturnShape::Float => serde_json::json!(0.0),
            ReturnShape::Unit | ReturnShape::Text | ReturnShape::Json | ReturnShape::Nullable => {
                serde_json::Value::Null
            }
        }
    }
}

/// Metadata for one interceptable method on a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name, unique within a target.
    pub name: String,
    /// Declared return shape.
    pub returns: ReturnShape,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, returns: ReturnShape) -> Self {
        Self {
            name: name.into(),
            returns,
        }
    }
}

/// The call contract shared by real targets and proxies.
///
/// A target exposes a table of named methods and dispatches calls to them
/// with JSON-valued arguments. Proxies implement the same trait, so a
/// proxied instance is substitutable wherever its target is.
pub trait Proxyable: Send + Sync {
    /// The method table for this target.
    fn methods(&self) -> Vec<MethodDescriptor>;

    /// Invoke the real implementation of `method`.
    fn dispatch(
        &self,
        method: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_shapes_default_to_zero_values() {
        assert_eq!(ReturnShape::Bool.default_value(), serde_json::json!(false));
        assert_eq!(ReturnShape::Int.default_value(), serde_json::json!(0));
        assert_eq!(ReturnShape::Float.default_value(), serde_json::json!(0.0));
    }

    #[test]
    fn reference_shapes_default_to_null() {
        assert_eq!(ReturnShape::Unit.default_value(), serde_json::Value::Null);
        assert_eq!(ReturnShape::Text.default_value(), serde_json::Value::Null);
        assert_eq!(ReturnShape::Json.default_value(), serde_json::Value::Null);
        assert_eq!(
            ReturnShape::Nullable.default_value(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn descriptor_roundtrips_through_serde() {
        let desc = MethodDescriptor::new("add", ReturnShape::Int);
        let json = serde_json::to_string(&desc).unwrap();
        let back: MethodDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
