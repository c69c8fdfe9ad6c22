//! pyinspect-core: runtime-agnostic core of the pyinspect traceback hook.
//!
//! Live values, frames and errors are only seen through the [`InspectValue`],
//! [`FrameView`], [`TraceNode`] and [`Fault`] traits, so every step can be
//! exercised on the synthetic models in [`value`] and [`stack`].
//!
//! # Pipeline
//!
//! - **Stack walker**: trace → root-first [`FrameChain`] → kept frames
//! - **Source locator**: the line each kept frame was executing
//! - **Classifier**: category, type label and info per local
//! - **Partitioner**: locals named on the fault line vs. the rest
//! - **Renderer**: one [`FrameDocument`] per frame, then the standard trace
//! - **Highlighter**: Python tokens of the error line, via tree-sitter

pub mod answers;
pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod highlight;
pub mod hook;
pub mod relevance;
pub mod render;
pub mod source;
pub mod stack;
pub mod suggest;
pub mod terminal;
pub mod value;

// Re-exports for convenience
pub use answers::{get_answers, AnswerSearch, Answers, QueryUrlSearch};
pub use cache::{CachedError, ErrorCache};
pub use classify::{Category, Classification, Classifier, Probe, TypeLabel, TypeTone, ValueSummary};
pub use config::{configured_cache, load_config, merge_config, parse_config, FileConfig, HookConfig, HookOverrides};
pub use error::{InspectError, Result};
pub use highlight::{highlight_lines, tokenize, Token, TokenClass};
pub use hook::{inspect_frame, Fault, FaultPath, HookController, HookState, Prompt, TerminalPrompt};
pub use relevance::{partition, Partition};
pub use render::{render_frame, BindingRow, FrameDocument, FrameLocation, LocalsView, Tier, TracebackReport};
pub use source::{read_line, read_line_checked, snippet, SourceSnippet};
pub use stack::{selected_indices, FrameChain, FrameView, TraceNode};
pub use suggest::close_matches;
pub use value::{ArrayProbe, InspectValue, NumericStats, ObjectKind, SyntheticValue};
