//! Value classification for the locals table.
//!
//! Classification runs an ordered chain of capability probes (array-like,
//! then sequence/text, then mapping) and falls back to a generic summary.
//! New probes can be inserted ahead of the fallback with
//! [`Classifier::with_probe`].

use std::fmt;

use crate::error::Result;
use crate::value::{format_bool, format_shape, InspectValue, ObjectKind};

const SEQUENCE_REPR_LEN: usize = 31;
const OTHER_REPR_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Function,
    Module,
    Class,
    ArrayLike,
    Sequence,
    Mapping,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Function => "function",
            Category::Module => "module",
            Category::Class => "class",
            Category::ArrayLike => "array-like",
            Category::Sequence => "sequence",
            Category::Mapping => "mapping",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// Color hint for the type label, one per coarse object nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTone {
    Function,
    Module,
    Class,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLabel {
    pub module: String,
    pub name: String,
    pub tone: TypeTone,
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub label: TypeLabel,
    pub info: String,
}

/// Per-binding summary handed to the partitioner and renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSummary {
    pub name: String,
    pub category: Category,
    pub label: TypeLabel,
    pub info: String,
    /// `None` when the value could not be pretty-printed.
    pub value_text: Option<String>,
    pub referenced: bool,
}

/// One predicate/handler pair in the classification chain.
#[derive(Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub category: Category,
    pub matches: fn(&dyn InspectValue) -> bool,
    pub info: fn(&dyn InspectValue) -> String,
    pub summary: fn(&dyn InspectValue) -> Result<String>,
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    probes: Vec<Probe>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            probes: vec![ARRAY_PROBE, SEQUENCE_PROBE, MAPPING_PROBE],
        }
    }
}

impl Classifier {
    /// Adds a probe that runs before every built-in one.
    pub fn with_probe(mut self, probe: Probe) -> Self {
        self.probes.insert(0, probe);
        self
    }

    /// Classifies a value. Returns `None` for functions, modules and types
    /// when `include_all` is false.
    pub fn classify(&self, value: &dyn InspectValue, include_all: bool) -> Option<Classification> {
        let type_name = value.type_name();
        let kind = value.object_kind();

        if !include_all && is_clutter(kind, &type_name) {
            return None;
        }

        let (category, info) = match kind {
            ObjectKind::Function | ObjectKind::Builtin => (Category::Function, String::new()),
            ObjectKind::Module => (Category::Module, String::new()),
            ObjectKind::Class => (Category::Class, String::new()),
            ObjectKind::Instance => match self.matching_probe(value) {
                Some(probe) => (probe.category, (probe.info)(value)),
                None => (Category::Other, String::new()),
            },
        };

        let tone = match category {
            Category::Function => TypeTone::Function,
            Category::Module => TypeTone::Module,
            Category::Class => TypeTone::Class,
            _ => TypeTone::Instance,
        };

        Some(Classification {
            category,
            label: TypeLabel {
                module: value.module_name(),
                name: type_name,
                tone,
            },
            info,
        })
    }

    /// Short pretty-printed rendering of the value itself.
    pub fn summarize(&self, value: &dyn InspectValue) -> Result<String> {
        if value.object_kind() == ObjectKind::Instance {
            if let Some(probe) = self.matching_probe(value) {
                return (probe.summary)(value);
            }
        }
        other_summary(value)
    }

    /// Classifies and summarizes one local binding. A failed summary is kept
    /// as `value_text: None` rather than dropping the binding.
    pub fn summarize_binding(
        &self,
        name: &str,
        value: &dyn InspectValue,
        include_all: bool,
    ) -> Option<ValueSummary> {
        let classification = self.classify(value, include_all)?;
        let value_text = match self.summarize(value) {
            Ok(text) => Some(text),
            Err(e) => {
                log::debug!("could not summarize local '{}': {}", name, e);
                None
            }
        };
        Some(ValueSummary {
            name: name.to_string(),
            category: classification.category,
            label: classification.label,
            info: classification.info,
            value_text,
            referenced: false,
        })
    }

    fn matching_probe(&self, value: &dyn InspectValue) -> Option<&Probe> {
        self.probes.iter().find(|probe| (probe.matches)(value))
    }
}

fn is_clutter(kind: ObjectKind, type_name: &str) -> bool {
    matches!(
        kind,
        ObjectKind::Function | ObjectKind::Builtin | ObjectKind::Module | ObjectKind::Class
    ) || type_name.contains("function")
        || type_name.contains("module")
        || type_name.contains("type")
}

/// Truncates on a char boundary and appends `suffix` when anything was cut.
pub fn truncate(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], suffix),
        None => text.to_string(),
    }
}

pub const ARRAY_PROBE: Probe = Probe {
    name: "array",
    category: Category::ArrayLike,
    matches: is_array,
    info: array_info,
    summary: sequence_summary,
};

pub const SEQUENCE_PROBE: Probe = Probe {
    name: "sequence",
    category: Category::Sequence,
    matches: is_sequence,
    info: sequence_info,
    summary: sequence_summary,
};

pub const MAPPING_PROBE: Probe = Probe {
    name: "mapping",
    category: Category::Mapping,
    matches: is_mapping,
    info: no_info,
    summary: mapping_summary,
};

fn is_array(value: &dyn InspectValue) -> bool {
    value.array().is_some()
}

fn is_sequence(value: &dyn InspectValue) -> bool {
    value.sequence_len().is_some()
}

fn is_mapping(value: &dyn InspectValue) -> bool {
    value.mapping_entries().is_some()
}

fn no_info(_: &dyn InspectValue) -> String {
    String::new()
}

fn sequence_info(value: &dyn InspectValue) -> String {
    match value.sequence_len() {
        Some(len) => format!("Length: {}", len),
        None => String::new(),
    }
}

fn array_info(value: &dyn InspectValue) -> String {
    let Some(probe) = value.array() else {
        return String::new();
    };
    let shape = format_shape(&probe.shape);
    match probe.stats {
        Some(stats) => format!(
            "Shape: {} max: {} min: {} has nan: {}",
            shape,
            stats.max,
            stats.min,
            format_bool(stats.has_nan)
        ),
        None => format!("Shape: {}", shape),
    }
}

fn sequence_summary(value: &dyn InspectValue) -> Result<String> {
    Ok(truncate(&value.repr()?, SEQUENCE_REPR_LEN, " ..."))
}

fn mapping_summary(value: &dyn InspectValue) -> Result<String> {
    let entries = value.mapping_entries().unwrap_or_default();
    let parts: Vec<String> = entries
        .iter()
        .map(|(key, type_name)| format!("{}: {}", key, type_name))
        .collect();
    Ok(truncate(&format!("{{{}}}", parts.join(", ")), OTHER_REPR_LEN, "..."))
}

fn other_summary(value: &dyn InspectValue) -> Result<String> {
    Ok(truncate(&value.repr()?, OTHER_REPR_LEN, "..."))
}
