//! Structured per-frame documents.
//!
//! The renderer only assembles data: a location header, the faulting source
//! line when it could be read, and a two-tier table of locals. Turning that
//! into terminal output is the job of [`crate::terminal`].

use std::fmt;

use crate::classify::{TypeLabel, ValueSummary};
use crate::relevance::Partition;
use crate::source::SourceSnippet;

/// Shown in the value column when a local could not be pretty-printed.
pub const UNREPRESENTABLE: &str = "<unrepresentable>";
pub const NO_LOCALS: &str = "no local variables to show";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    pub path: String,
    /// One-based.
    pub line: usize,
    pub function: String,
}

impl FrameLocation {
    pub fn new(path: impl Into<String>, line: usize, function: impl Into<String>) -> Self {
        FrameLocation {
            path: path.into(),
            line,
            function: function.into(),
        }
    }

    /// `file://` target for terminals that support hyperlinks.
    pub fn file_url(&self) -> String {
        format!("file://{}", self.path)
    }
}

impl fmt::Display for FrameLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Referenced,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    pub name: String,
    pub value: String,
    pub type_label: TypeLabel,
    pub info: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalsView {
    Table(Vec<BindingRow>),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDocument {
    pub location: FrameLocation,
    pub error_line: Option<SourceSnippet>,
    pub locals: LocalsView,
}

impl FrameDocument {
    pub fn rows(&self) -> &[BindingRow] {
        match &self.locals {
            LocalsView::Table(rows) => rows,
            LocalsView::Placeholder(_) => &[],
        }
    }
}

/// Everything printed for one uncaught error, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackReport {
    /// Selected frames, fault frame last.
    pub frames: Vec<FrameDocument>,
    /// The runtime's own formatting of the error and its trace.
    pub standard_trace: String,
}

fn row(summary: ValueSummary, tier: Tier) -> BindingRow {
    BindingRow {
        value: summary
            .value_text
            .unwrap_or_else(|| UNREPRESENTABLE.to_string()),
        name: summary.name,
        type_label: summary.label,
        info: summary.info,
        tier,
    }
}

/// Builds the document for one frame. Referenced rows come first; other rows
/// follow unless `relevant_only` drops them.
pub fn render_frame(
    location: FrameLocation,
    error_line: Option<SourceSnippet>,
    partition: Partition<ValueSummary>,
    relevant_only: bool,
) -> FrameDocument {
    let mut rows: Vec<BindingRow> = partition
        .referenced
        .into_iter()
        .map(|(_, summary)| row(summary, Tier::Referenced))
        .collect();
    if !relevant_only {
        rows.extend(
            partition
                .other
                .into_iter()
                .map(|(_, summary)| row(summary, Tier::Other)),
        );
    }

    let locals = if rows.is_empty() {
        LocalsView::Placeholder(NO_LOCALS.to_string())
    } else {
        LocalsView::Table(rows)
    };

    FrameDocument {
        location,
        error_line,
        locals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Category, TypeTone};
    use crate::relevance::partition;

    fn summary(name: &str, value_text: Option<&str>) -> (String, ValueSummary) {
        (
            name.to_string(),
            ValueSummary {
                name: name.to_string(),
                category: Category::Other,
                label: TypeLabel {
                    module: "builtins".to_string(),
                    name: "int".to_string(),
                    tone: TypeTone::Instance,
                },
                info: String::new(),
                value_text: value_text.map(str::to_string),
                referenced: false,
            },
        )
    }

    fn location() -> FrameLocation {
        FrameLocation::new("/src/app.py", 12, "main")
    }

    #[test]
    fn test_referenced_rows_first() {
        let bindings = vec![
            summary("b", Some("2")),
            summary("c", Some("3")),
            summary("a", Some("1")),
        ];
        let doc = render_frame(location(), None, partition(bindings, Some("c + a"), false), false);
        let names: Vec<_> = doc.rows().iter().map(|r| (r.name.as_str(), r.tier)).collect();
        assert_eq!(
            names,
            vec![
                ("a", Tier::Referenced),
                ("c", Tier::Referenced),
                ("b", Tier::Other)
            ]
        );
    }

    #[test]
    fn test_relevant_only_drops_other_rows() {
        let bindings = vec![summary("a", Some("1")), summary("b", Some("2"))];
        let doc = render_frame(location(), None, partition(bindings, Some("a"), false), true);
        assert_eq!(doc.rows().len(), 1);
        assert_eq!(doc.rows()[0].name, "a");
    }

    #[test]
    fn test_empty_table_placeholder() {
        let bindings = vec![summary("b", Some("2"))];
        let doc = render_frame(location(), None, partition(bindings, Some("x"), false), true);
        assert_eq!(doc.locals, LocalsView::Placeholder(NO_LOCALS.to_string()));
        assert!(doc.rows().is_empty());
    }

    #[test]
    fn test_unrepresentable_value_keeps_row() {
        let bindings = vec![summary("weird", None), summary("ok", Some("1"))];
        let doc = render_frame(location(), None, partition(bindings, None, false), false);
        assert_eq!(doc.rows().len(), 2);
        let weird = doc.rows().iter().find(|r| r.name == "weird").unwrap();
        assert_eq!(weird.value, UNREPRESENTABLE);
    }

    #[test]
    fn test_location_display() {
        let loc = location();
        assert_eq!(loc.to_string(), "/src/app.py:12");
        assert_eq!(loc.file_url(), "file:///src/app.py");
    }
}
