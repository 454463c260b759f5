//! Leaf values: how primitives, timestamps, identities and numeric vectors
//! look on the wire.
//!
//! | Rust type                       | Wire form                                   |
//! |---------------------------------|---------------------------------------------|
//! | `bool`                          | `true` / `false`                            |
//! | `i8`, `i16`, `i32`, `i64`       | number, range-checked to the width on read  |
//! | `f32`, `f64`                    | number, or `"NaN"` / `"Infinity"` / `"-Infinity"` |
//! | `String`, `Uuid`                | string                                      |
//! | `DateTime<FixedOffset>`/`<Utc>` | ISO-8601 offset date-time string            |
//! | `[f32; N]`, `[f64; N]` (N=2..4) | comma-joined components, `"1.5,2,-3"`       |
//! | `Option<V>`                     | `V`'s form, or `null`                       |

use super::error::{CodecError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;
use uuid::Uuid;

/// A leaf as it is about to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Float32(f32),
    Str(Cow<'a, str>),
}

/// A value written as a single leaf node.
pub trait WireValue: Sized {
    fn to_scalar(&self) -> Scalar<'_>;

    /// Decode from a parsed node. `path` locates the node for error messages.
    fn from_node(node: &Value, path: &str) -> Result<Self>;
}

/// An enumeration written by variant name.
pub trait WireEnum: Sized {
    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

fn string_node<'v>(node: &'v Value, path: &str) -> Result<&'v str> {
    node.as_str()
        .ok_or_else(|| CodecError::mismatch(path, "string", node))
}

impl WireValue for bool {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Bool(*self)
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        node.as_bool()
            .ok_or_else(|| CodecError::mismatch(path, "boolean", node))
    }
}

macro_rules! integer_wire {
    ($($ty:ty),*) => {$(
        impl WireValue for $ty {
            fn to_scalar(&self) -> Scalar<'_> {
                Scalar::Int(i64::from(*self))
            }

            fn from_node(node: &Value, path: &str) -> Result<Self> {
                let value = node
                    .as_i64()
                    .ok_or_else(|| CodecError::mismatch(path, "integer", node))?;
                <$ty>::try_from(value).map_err(|_| {
                    CodecError::invalid(
                        path,
                        format!("{} is out of range for {}", value, stringify!($ty)),
                    )
                })
            }
        }
    )*};
}

integer_wire!(i8, i16, i32, i64);

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}

fn float_node(node: &Value, path: &str) -> Result<f64> {
    match node {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CodecError::invalid(path, format!("{} is not representable", n))),
        Value::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => Err(CodecError::invalid(path, format!("'{}' is not a number", other))),
        },
        other => Err(CodecError::mismatch(path, "number", other)),
    }
}

impl WireValue for f64 {
    fn to_scalar(&self) -> Scalar<'_> {
        if self.is_finite() {
            Scalar::Float(*self)
        } else {
            Scalar::Str(Cow::Borrowed(non_finite(*self)))
        }
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        float_node(node, path)
    }
}

impl WireValue for f32 {
    fn to_scalar(&self) -> Scalar<'_> {
        if self.is_finite() {
            Scalar::Float32(*self)
        } else {
            Scalar::Str(Cow::Borrowed(non_finite(f64::from(*self))))
        }
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        float_node(node, path).map(|value| value as f32)
    }
}

impl WireValue for String {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(Cow::Borrowed(self))
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        string_node(node, path).map(str::to_string)
    }
}

impl WireValue for Uuid {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(Cow::Owned(self.to_string()))
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        let text = string_node(node, path)?;
        Uuid::parse_str(text).map_err(|e| CodecError::invalid(path, e.to_string()))
    }
}

impl WireValue for DateTime<FixedOffset> {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(Cow::Owned(self.to_rfc3339()))
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        let text = string_node(node, path)?;
        DateTime::parse_from_rfc3339(text).map_err(|e| {
            CodecError::invalid(path, format!("'{}' is not an offset date-time: {}", text, e))
        })
    }
}

impl WireValue for DateTime<Utc> {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(Cow::Owned(self.to_rfc3339()))
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        DateTime::<FixedOffset>::from_node(node, path).map(|at| at.with_timezone(&Utc))
    }
}

fn parse_components<T: FromStr>(text: &str, path: &str) -> Result<Vec<T>> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<T>().map_err(|_| {
                CodecError::invalid(path, format!("invalid vector component '{}'", part))
            })
        })
        .collect()
}

macro_rules! vector_wire {
    ($ty:ty; $($n:literal),*) => {$(
        impl WireValue for [$ty; $n] {
            fn to_scalar(&self) -> Scalar<'_> {
                let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
                Scalar::Str(Cow::Owned(parts.join(",")))
            }

            fn from_node(node: &Value, path: &str) -> Result<Self> {
                let components = parse_components::<$ty>(string_node(node, path)?, path)?;
                <[$ty; $n]>::try_from(components).map_err(|found: Vec<$ty>| {
                    CodecError::invalid(
                        path,
                        format!("expected {} components, found {}", $n, found.len()),
                    )
                })
            }
        }
    )*};
}

vector_wire!(f32; 2, 3, 4);
vector_wire!(f64; 2, 3, 4);

impl<V: WireValue> WireValue for Option<V> {
    fn to_scalar(&self) -> Scalar<'_> {
        match self {
            Some(value) => value.to_scalar(),
            None => Scalar::Null,
        }
    }

    fn from_node(node: &Value, path: &str) -> Result<Self> {
        match node {
            Value::Null => Ok(None),
            other => V::from_node(other, path).map(Some),
        }
    }
}
