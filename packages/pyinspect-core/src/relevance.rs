//! Splitting a frame's locals into the ones named on the faulting line and
//! the rest.
//!
//! Matching is textual: the line is tokenized by blanking `( ) , . =` and
//! splitting on whitespace, and a binding counts as referenced when its name
//! is one of the tokens. `a+b` stays a single token, so neither `a` nor `b`
//! matches it; attribute names such as `x` in `obj.x` do match a local `x`.

use std::collections::HashSet;

const SEPARATORS: [char; 5] = ['(', ')', ',', '.', '='];

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub referenced: Vec<(String, T)>,
    pub other: Vec<(String, T)>,
}

impl<T> Partition<T> {
    pub fn len(&self) -> usize {
        self.referenced.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.referenced.is_empty() && self.other.is_empty()
    }

    pub fn names(&self) -> (Vec<&str>, Vec<&str>) {
        (
            self.referenced.iter().map(|(n, _)| n.as_str()).collect(),
            self.other.iter().map(|(n, _)| n.as_str()).collect(),
        )
    }
}

pub fn is_internal_name(name: &str) -> bool {
    name.starts_with("__")
}

/// Candidate identifiers on a source line.
pub fn line_tokens(line: &str) -> HashSet<String> {
    let blanked: String = line
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();
    blanked.split_whitespace().map(str::to_string).collect()
}

/// Partitions bindings by whether the fault line names them.
///
/// With no fault line every binding is referenced. Internal (`__`-prefixed)
/// names are dropped unless `include_internal` is set. Each side is sorted
/// case-insensitively, internal names last.
pub fn partition<T>(
    bindings: Vec<(String, T)>,
    fault_line: Option<&str>,
    include_internal: bool,
) -> Partition<T> {
    let tokens = fault_line.map(line_tokens);
    let mut referenced = Vec::new();
    let mut other = Vec::new();

    for (name, value) in bindings {
        if !include_internal && is_internal_name(&name) {
            continue;
        }
        let is_referenced = match &tokens {
            Some(tokens) => tokens.contains(&name),
            None => true,
        };
        if is_referenced {
            referenced.push((name, value));
        } else {
            other.push((name, value));
        }
    }

    referenced.sort_by_key(|(name, _)| sort_key(name));
    other.sort_by_key(|(name, _)| sort_key(name));
    Partition { referenced, other }
}

fn sort_key(name: &str) -> (bool, String) {
    (is_internal_name(name), name.to_lowercase())
}
