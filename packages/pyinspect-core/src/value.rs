//! Capability probes over live runtime values.
//!
//! The classifier never sees concrete runtime types. A host (the Python
//! bridge, or the in-memory [`SyntheticValue`] model) answers a small set of
//! questions about each value: what is its type called, does it behave like a
//! numeric buffer, does it have a length, does it hold key/value pairs.

use crate::error::{InspectError, Result};

/// Coarse nature of the object itself, used to hide imported clutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Function,
    Builtin,
    Module,
    Class,
    Instance,
}

/// Facts gathered from a value with shape/dtype semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayProbe {
    pub shape: Vec<usize>,
    /// `None` when the contents could not be compared (strings, objects).
    pub stats: Option<NumericStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    pub max: String,
    pub min: String,
    pub has_nan: bool,
}

pub trait InspectValue {
    /// Name of the value's class (`"ndarray"`, `"list"`, `"Console"`).
    fn type_name(&self) -> String;

    /// Module defining the value's class (`"builtins"` for builtins).
    fn module_name(&self) -> String;

    fn object_kind(&self) -> ObjectKind;

    fn array(&self) -> Option<ArrayProbe> {
        None
    }

    /// Element count, only for ordered sequences and text.
    fn sequence_len(&self) -> Option<usize> {
        None
    }

    /// `(key repr, value type name)` pairs for key/value containers.
    fn mapping_entries(&self) -> Option<Vec<(String, String)>> {
        None
    }

    fn repr(&self) -> Result<String>;

    fn attribute_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// `__name__` of the object itself, for classes, functions and modules.
    fn own_name(&self) -> Option<String> {
        None
    }
}

/// Formats a shape the way the runtime prints tuples: `(4,)`, `(2, 3)`.
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Formats a float the way the runtime prints it (`1.0`, `nan`, `-inf`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Element of a [`SyntheticValue::Array`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Number(f64),
    Text(String),
}

/// In-memory value model for hosts without live objects.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntheticValue {
    None,
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<SyntheticValue>),
    Tuple(Vec<SyntheticValue>),
    Dict(Vec<(String, SyntheticValue)>),
    Array {
        shape: Vec<usize>,
        data: Vec<ArrayElement>,
    },
    Function(String),
    Module(String),
    Class {
        name: String,
        attributes: Vec<String>,
    },
    Object {
        module: String,
        class: String,
        attributes: Vec<String>,
    },
    /// A value whose repr raises.
    Broken(String),
}

impl SyntheticValue {
    pub fn str(text: impl Into<String>) -> Self {
        SyntheticValue::Str(text.into())
    }

    pub fn numbers(values: &[f64]) -> Self {
        SyntheticValue::Array {
            shape: vec![values.len()],
            data: values.iter().copied().map(ArrayElement::Number).collect(),
        }
    }

    pub fn class(name: &str, attributes: &[&str]) -> Self {
        SyntheticValue::Class {
            name: name.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn object(module: &str, class: &str, attributes: &[&str]) -> Self {
        SyntheticValue::Object {
            module: module.to_string(),
            class: class.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn array_stats(data: &[ArrayElement]) -> Option<NumericStats> {
        let mut numbers = Vec::with_capacity(data.len());
        for element in data {
            match element {
                ArrayElement::Number(n) => numbers.push(*n),
                ArrayElement::Text(_) => return None,
            }
        }
        if numbers.is_empty() {
            return None;
        }
        let has_nan = numbers.iter().any(|n| n.is_nan());
        if has_nan {
            return Some(NumericStats {
                max: "nan".to_string(),
                min: "nan".to_string(),
                has_nan,
            });
        }
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        Some(NumericStats {
            max: format_float(max),
            min: format_float(min),
            has_nan,
        })
    }

    fn join_reprs(items: &[SyntheticValue]) -> Result<Vec<String>> {
        items.iter().map(|item| item.repr()).collect()
    }
}

impl InspectValue for SyntheticValue {
    fn type_name(&self) -> String {
        match self {
            SyntheticValue::None => "NoneType",
            SyntheticValue::Int(_) => "int",
            SyntheticValue::Float(_) => "float",
            SyntheticValue::Str(_) => "str",
            SyntheticValue::List(_) => "list",
            SyntheticValue::Tuple(_) => "tuple",
            SyntheticValue::Dict(_) => "dict",
            SyntheticValue::Array { .. } => "ndarray",
            SyntheticValue::Function(_) => "function",
            SyntheticValue::Module(_) => "module",
            SyntheticValue::Class { .. } => "type",
            SyntheticValue::Object { class, .. } => class.as_str(),
            SyntheticValue::Broken(class) => class.as_str(),
        }
        .to_string()
    }

    fn module_name(&self) -> String {
        match self {
            SyntheticValue::Array { .. } => "numpy".to_string(),
            SyntheticValue::Object { module, .. } => module.clone(),
            _ => "builtins".to_string(),
        }
    }

    fn object_kind(&self) -> ObjectKind {
        match self {
            SyntheticValue::Function(_) => ObjectKind::Function,
            SyntheticValue::Module(_) => ObjectKind::Module,
            SyntheticValue::Class { .. } => ObjectKind::Class,
            _ => ObjectKind::Instance,
        }
    }

    fn array(&self) -> Option<ArrayProbe> {
        match self {
            SyntheticValue::Array { shape, data } => Some(ArrayProbe {
                shape: shape.clone(),
                stats: Self::array_stats(data),
            }),
            _ => None,
        }
    }

    fn sequence_len(&self) -> Option<usize> {
        match self {
            SyntheticValue::Str(s) => Some(s.chars().count()),
            SyntheticValue::List(items) | SyntheticValue::Tuple(items) => Some(items.len()),
            _ => None,
        }
    }

    fn mapping_entries(&self) -> Option<Vec<(String, String)>> {
        match self {
            SyntheticValue::Dict(entries) => Some(
                entries
                    .iter()
                    .map(|(k, v)| (format!("'{}'", k), v.type_name()))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn repr(&self) -> Result<String> {
        let repr = match self {
            SyntheticValue::None => "None".to_string(),
            SyntheticValue::Int(i) => i.to_string(),
            SyntheticValue::Float(f) => format_float(*f),
            SyntheticValue::Str(s) => format!("'{}'", s),
            SyntheticValue::List(items) => format!("[{}]", Self::join_reprs(items)?.join(", ")),
            SyntheticValue::Tuple(items) => {
                let parts = Self::join_reprs(items)?;
                if parts.len() == 1 {
                    format!("({},)", parts[0])
                } else {
                    format!("({})", parts.join(", "))
                }
            }
            SyntheticValue::Dict(entries) => {
                let mut parts = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    parts.push(format!("'{}': {}", k, v.repr()?));
                }
                format!("{{{}}}", parts.join(", "))
            }
            SyntheticValue::Array { data, .. } => {
                let parts: Vec<String> = data
                    .iter()
                    .map(|e| match e {
                        ArrayElement::Number(n) => format_float(*n),
                        ArrayElement::Text(t) => format!("'{}'", t),
                    })
                    .collect();
                format!("array([{}])", parts.join(", "))
            }
            SyntheticValue::Function(name) => format!("<function {}>", name),
            SyntheticValue::Module(name) => format!("<module '{}'>", name),
            SyntheticValue::Class { name, .. } => format!("<class '{}'>", name),
            SyntheticValue::Object { module, class, .. } => {
                format!("<{}.{} object>", module, class)
            }
            SyntheticValue::Broken(class) => {
                return Err(InspectError::runtime(format!(
                    "{}.__repr__ raised an exception",
                    class
                )))
            }
        };
        Ok(repr)
    }

    fn attribute_names(&self) -> Vec<String> {
        match self {
            SyntheticValue::Object { attributes, .. } | SyntheticValue::Class { attributes, .. } => {
                attributes.clone()
            }
            _ => Vec::new(),
        }
    }

    fn own_name(&self) -> Option<String> {
        match self {
            SyntheticValue::Function(name) | SyntheticValue::Module(name) | SyntheticValue::Class { name, .. } => {
                Some(name.clone())
            }
            _ => None,
        }
    }
}
