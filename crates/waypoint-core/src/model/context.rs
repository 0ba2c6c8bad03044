//! Caller-supplied context values
//!
//! A transition intent carries an ordered list of [`ContextArg`]s. Each one is
//! either a primitive [`ParamValue`], which is stringified straight into a
//! dynamic segment, or an opaque model object ([`ModelRef`]) that a later
//! model hook turns into a resolved context.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A primitive context value that maps directly onto a URL segment
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Null,
    Undefined,
}

impl ParamValue {
    /// Stringify for use as a segment value
    ///
    /// Matches the usual script-engine number formatting: `Null` and
    /// `Undefined` render as `"null"` and `"undefined"`, integral floats
    /// without a fractional part, negative zero as `"0"`, and magnitudes of
    /// at least `1e21` or below `1e-6` in exponent form (`"1e+21"`, `"1e-7"`).
    pub fn to_param_string(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) if f.is_nan() => "NaN".to_string(),
            ParamValue::Float(f) if f.is_infinite() => {
                if f.is_sign_positive() {
                    "Infinity".to_string()
                } else {
                    "-Infinity".to_string()
                }
            }
            ParamValue::Float(f) if *f == 0.0 => "0".to_string(),
            ParamValue::Float(f) if f.abs() >= 1e21 || f.abs() < 1e-6 => exponential(*f),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Null => "null".to_string(),
            ParamValue::Undefined => "undefined".to_string(),
        }
    }
}

/// Shortest exponent form with an explicit sign on positive exponents
fn exponential(f: f64) -> String {
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Shared handle to a context object
///
/// Equality is identity: two handles are equal only when they point at the
/// same allocation, regardless of the JSON they hold.
#[derive(Clone)]
pub struct ModelRef(Arc<Value>);

impl ModelRef {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Identity comparison
    pub fn same_as(&self, other: &ModelRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for ModelRef {}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelRef({})", self.0)
    }
}

impl From<Value> for ModelRef {
    fn from(value: Value) -> Self {
        ModelRef::new(value)
    }
}

/// One caller-supplied context value
#[derive(Debug, Clone, PartialEq)]
pub enum ContextArg {
    Param(ParamValue),
    Object(ModelRef),
}

impl ContextArg {
    /// True exactly for primitive values (string, number, null, undefined)
    pub fn is_param(&self) -> bool {
        matches!(self, ContextArg::Param(_))
    }

    pub fn null() -> Self {
        ContextArg::Param(ParamValue::Null)
    }

    pub fn undefined() -> Self {
        ContextArg::Param(ParamValue::Undefined)
    }
}

impl From<&str> for ContextArg {
    fn from(value: &str) -> Self {
        ContextArg::Param(ParamValue::Str(value.to_string()))
    }
}

impl From<String> for ContextArg {
    fn from(value: String) -> Self {
        ContextArg::Param(ParamValue::Str(value))
    }
}

impl From<i64> for ContextArg {
    fn from(value: i64) -> Self {
        ContextArg::Param(ParamValue::Int(value))
    }
}

impl From<i32> for ContextArg {
    fn from(value: i32) -> Self {
        ContextArg::Param(ParamValue::Int(i64::from(value)))
    }
}

impl From<f64> for ContextArg {
    fn from(value: f64) -> Self {
        ContextArg::Param(ParamValue::Float(value))
    }
}

impl From<ModelRef> for ContextArg {
    fn from(value: ModelRef) -> Self {
        ContextArg::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_stringification() {
        assert_eq!(ParamValue::Str("9".into()).to_param_string(), "9");
        assert_eq!(ParamValue::Int(-3).to_param_string(), "-3");
        assert_eq!(ParamValue::Float(5.0).to_param_string(), "5");
        assert_eq!(ParamValue::Float(0.5).to_param_string(), "0.5");
        assert_eq!(ParamValue::Float(f64::NAN).to_param_string(), "NaN");
        assert_eq!(ParamValue::Float(f64::INFINITY).to_param_string(), "Infinity");
        assert_eq!(ParamValue::Null.to_param_string(), "null");
        assert_eq!(ParamValue::Undefined.to_param_string(), "undefined");
    }

    #[test]
    fn test_float_edge_stringification() {
        assert_eq!(ParamValue::Float(-0.0).to_param_string(), "0");
        assert_eq!(ParamValue::Float(1e21).to_param_string(), "1e+21");
        assert_eq!(ParamValue::Float(-2.5e30).to_param_string(), "-2.5e+30");
        assert_eq!(ParamValue::Float(1e-7).to_param_string(), "1e-7");
        assert_eq!(ParamValue::Float(1.5e-7).to_param_string(), "1.5e-7");
        assert_eq!(ParamValue::Float(1e20).to_param_string(), "100000000000000000000");
        assert_eq!(ParamValue::Float(1e-6).to_param_string(), "0.000001");
    }

    #[test]
    fn test_model_ref_equality_is_identity() {
        let a = ModelRef::new(json!({"id": 1}));
        let b = ModelRef::new(json!({"id": 1}));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_param() {
        assert!(ContextArg::from("x").is_param());
        assert!(ContextArg::from(7).is_param());
        assert!(ContextArg::null().is_param());
        assert!(ContextArg::undefined().is_param());
        assert!(!ContextArg::from(ModelRef::new(json!({}))).is_param());
    }
}
