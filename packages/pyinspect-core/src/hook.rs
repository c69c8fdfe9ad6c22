//! The uncaught-error handler.
//!
//! [`HookController::handle`] runs once per fault: cache the error record,
//! try the missing-attribute suggestion, render the selected frames, print
//! the standard trace, then optionally offer an answer search. Nothing in
//! here propagates a failure of the enrichment steps; the caller only sees
//! an error when even the plain report could not be produced or written.

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use crate::answers::{self, AnswerSearch, QueryUrlSearch};
use crate::cache::{CachedError, ErrorCache};
use crate::classify::{Classifier, ValueSummary};
use crate::config::HookConfig;
use crate::error::{InspectError, Result};
use crate::relevance::partition;
use crate::render::{render_frame, FrameDocument, FrameLocation, TracebackReport};
use crate::source;
use crate::stack::{FrameChain, FrameView, TraceNode};
use crate::suggest::{close_matches, format_suggestions, parse_missing_attribute, MAX_SUGGESTIONS};
use crate::terminal;
use crate::value::{InspectValue, ObjectKind};

/// An in-flight error as seen by the handler.
pub trait Fault {
    type Trace: TraceNode;

    /// Name of the error's class, e.g. `AttributeError`.
    fn type_name(&self) -> String;

    /// The first message argument, if any.
    fn message(&self) -> Option<String>;

    fn doc(&self) -> Option<String>;

    fn trace(&self) -> Option<Self::Trace>;

    fn is_attribute_error(&self) -> bool;

    /// Replaces the first message argument.
    fn amend_message(&mut self, message: String);

    /// The runtime's own formatting of the error and its trace.
    fn standard_report(&self) -> Result<String>;
}

/// Blocking yes/no question.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Asks on stdin; anything but `y`/`yes` is a no.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{} [y/n]: ", question);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log::debug!("prompt failed: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Idle,
    Handling,
    AttributeErrorPath,
    GenericPath,
}

/// Which branch handled a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPath {
    AttributeError,
    Generic,
}

pub struct HookController {
    config: HookConfig,
    cache: Option<ErrorCache>,
    classifier: Classifier,
    search: Box<dyn AnswerSearch>,
    prompt: Box<dyn Prompt>,
    state: HookState,
    last_path: Option<FaultPath>,
}

impl HookController {
    pub fn new(config: HookConfig) -> Self {
        let cache = ErrorCache::resolve(config.cache_dir.as_deref());
        HookController {
            config,
            cache,
            classifier: Classifier::default(),
            search: Box::new(QueryUrlSearch::default()),
            prompt: Box::new(TerminalPrompt),
            state: HookState::Idle,
            last_path: None,
        }
    }

    pub fn with_cache(mut self, cache: Option<ErrorCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_search(mut self, search: Box<dyn AnswerSearch>) -> Self {
        self.search = search;
        self
    }

    pub fn with_prompt(mut self, prompt: Box<dyn Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&ErrorCache> {
        self.cache.as_ref()
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn last_path(&self) -> Option<FaultPath> {
        self.last_path
    }

    /// Handles one uncaught error, writing everything to `out`.
    pub fn handle<E: Fault>(&mut self, fault: &mut E, out: &mut dyn Write) -> Result<()> {
        self.state = HookState::Handling;
        self.last_path = None;
        self.cache_fault(fault);

        let enriched = quietly(|| self.enrich(fault));
        let frames = match enriched {
            Ok(Ok(frames)) => frames,
            Ok(Err(e)) => {
                log::warn!("traceback enrichment failed: {}", e);
                Vec::new()
            }
            Err(payload) => {
                log::warn!("traceback enrichment panicked: {}", panic_message(payload.as_ref()));
                Vec::new()
            }
        };

        let result = self.emit(fault, frames, out);
        if result.is_ok() && self.config.enable_prompt {
            self.offer_search(out);
        }
        self.state = HookState::Idle;
        result
    }

    fn cache_fault<E: Fault>(&self, fault: &E) {
        let Some(cache) = &self.cache else {
            return;
        };
        let record = CachedError::new(
            &fault.type_name(),
            fault.message().as_deref(),
            fault.doc().as_deref(),
        );
        if let Err(e) = cache.store(&record) {
            log::warn!("could not cache error: {}", e);
        }
    }

    fn enrich<E: Fault>(&mut self, fault: &mut E) -> Result<Vec<FrameDocument>> {
        let chain = fault.trace().map(FrameChain::from_trace);

        let mut path = FaultPath::Generic;
        if fault.is_attribute_error() {
            self.state = HookState::AttributeErrorPath;
            let hint = chain.as_ref().and_then(|chain| attribute_hint(fault, chain));
            match hint {
                Some(message) => {
                    fault.amend_message(message);
                    path = FaultPath::AttributeError;
                }
                None => log::debug!("attribute owner not found, using generic report"),
            }
        }
        if path == FaultPath::Generic {
            self.state = HookState::GenericPath;
        }
        self.last_path = Some(path);

        if self.config.hide_locals {
            return Ok(Vec::new());
        }
        let Some(chain) = chain else {
            return Ok(Vec::new());
        };
        chain
            .select(self.config.keep_frames)
            .iter()
            .map(|frame| inspect_frame(frame, &self.classifier, &self.config, true))
            .collect()
    }

    fn emit<E: Fault>(&self, fault: &E, frames: Vec<FrameDocument>, out: &mut dyn Write) -> Result<()> {
        let report = TracebackReport {
            frames,
            standard_trace: fault.standard_report()?,
        };
        let write = |e: io::Error| InspectError::render(e.to_string());
        match terminal::write_report(out, &report) {
            Ok(()) => Ok(()),
            Err(e) if report.frames.is_empty() => Err(write(e)),
            Err(e) => {
                log::warn!("could not write frames: {}", e);
                terminal::write_standard_trace(out, &report.standard_trace).map_err(write)
            }
        }
    }

    fn offer_search(&mut self, out: &mut dyn Write) {
        let Some(cache) = &self.cache else {
            return;
        };
        if !self.prompt.confirm("Search the web for this error?") {
            return;
        }
        if let Err(e) = answers::get_answers(cache, self.search.as_ref(), true, out) {
            log::warn!("answer search failed: {}", e);
        }
    }
}

static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Runs `f` catching any panic, with the panic report suppressed so a
/// failed enrichment leaves no trace on stderr.
fn quietly<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    let _guard = PANIC_HOOK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Whether `value` is the owner named in the message: an instance of that
/// type, or the class itself for `type object 'T' has no attribute`.
fn is_owner<V: InspectValue>(value: &V, type_name: &str) -> bool {
    if value.type_name() == type_name {
        return true;
    }
    value.object_kind() == ObjectKind::Class && value.own_name().as_deref() == Some(type_name)
}

/// Looks for a local in the fault frame whose type matches the owner named
/// in the message and suggests its closest attributes.
fn attribute_hint<E: Fault>(
    fault: &E,
    chain: &FrameChain<<E::Trace as TraceNode>::Frame>,
) -> Option<String> {
    let message = fault.message()?;
    let missing = parse_missing_attribute(&message)?;
    let frame = chain.fault_frame()?;
    let owner = frame
        .locals()
        .ok()?
        .into_iter()
        .map(|(_, value)| value)
        .find(|value| is_owner(value, &missing.type_name))?;

    let attributes = owner.attribute_names();
    let suggestions = close_matches(
        &missing.attribute,
        attributes.iter().map(String::as_str),
        MAX_SUGGESTIONS,
        0.0,
    );
    if suggestions.is_empty() {
        return None;
    }
    Some(format!("{}. {}", message, format_suggestions(&suggestions)))
}

/// Runs one frame through source lookup, classification, partitioning and
/// rendering. With `with_source` unset no fault line is read and all locals
/// land in a single tier. Fails only when the frame's locals are unreadable.
pub fn inspect_frame<F: FrameView>(
    frame: &F,
    classifier: &Classifier,
    config: &HookConfig,
    with_source: bool,
) -> Result<FrameDocument> {
    let path = frame.filename();
    let lineno = frame.lineno();
    let error_line = if with_source {
        source::snippet(&path, lineno, lineno)
    } else {
        None
    };
    let fault_line = error_line.as_ref().and_then(|snippet| snippet.lines.first());

    let summaries: Vec<(String, ValueSummary)> = frame
        .locals()?
        .into_iter()
        .filter_map(|(name, value)| {
            let summary = classifier.summarize_binding(&name, &value, config.all_locals)?;
            Some((name, summary))
        })
        .collect();
    let mut partitioned = partition(summaries, fault_line.map(String::as_str), config.all_locals);
    for (_, summary) in partitioned.referenced.iter_mut() {
        summary.referenced = true;
    }

    Ok(render_frame(
        FrameLocation::new(path, lineno, frame.function_name()),
        error_line,
        partitioned,
        config.relevant_only,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{LocalsView, Tier};
    use crate::source::SourceSnippet;
    use crate::stack::{FrameRecord, SyntheticStack, SyntheticTrace};
    use crate::value::SyntheticValue;
    use std::fs;
    use tempfile::TempDir;

    struct TestFault {
        type_name: String,
        message: Option<String>,
        stack: SyntheticStack,
        broken_report: bool,
    }

    impl TestFault {
        fn new(type_name: &str, message: &str, records: Vec<FrameRecord>) -> Self {
            TestFault {
                type_name: type_name.to_string(),
                message: Some(message.to_string()),
                stack: SyntheticStack::new(records),
                broken_report: false,
            }
        }
    }

    impl Fault for TestFault {
        type Trace = SyntheticTrace;

        fn type_name(&self) -> String {
            self.type_name.clone()
        }

        fn message(&self) -> Option<String> {
            self.message.clone()
        }

        fn doc(&self) -> Option<String> {
            Some("  Test error.  ".to_string())
        }

        fn trace(&self) -> Option<SyntheticTrace> {
            self.stack.trace()
        }

        fn is_attribute_error(&self) -> bool {
            self.type_name == "AttributeError"
        }

        fn amend_message(&mut self, message: String) {
            self.message = Some(message);
        }

        fn standard_report(&self) -> Result<String> {
            if self.broken_report {
                return Err(InspectError::runtime("no report"));
            }
            Ok(format!(
                "Traceback (most recent call last):\n{}: {}\n",
                self.type_name,
                self.message.clone().unwrap_or_default()
            ))
        }
    }

    struct Answer(bool, std::rc::Rc<std::cell::Cell<usize>>);

    impl Prompt for Answer {
        fn confirm(&mut self, _question: &str) -> bool {
            self.1.set(self.1.get() + 1);
            self.0
        }
    }

    fn controller(dir: &TempDir, config: HookConfig) -> HookController {
        HookController::new(config).with_cache(Some(ErrorCache::in_dir(dir.path())))
    }

    fn run(controller: &mut HookController, fault: &mut TestFault) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        controller.handle(fault, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_generic_path_renders_frames_then_trace() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("script.py");
        fs::write(&script, "x = 1\ntotal = a + c\n").unwrap();
        let script = script.to_string_lossy().to_string();

        let mut fault = TestFault::new(
            "TypeError",
            "unsupported operand",
            vec![
                FrameRecord::new(&script, 1, "<module>"),
                FrameRecord::new(&script, 2, "add")
                    .with_local("a", SyntheticValue::Int(1))
                    .with_local("b", SyntheticValue::Int(2))
                    .with_local("c", SyntheticValue::str("x")),
            ],
        );
        let mut hook = controller(&dir, HookConfig::default());
        let text = run(&mut hook, &mut fault);

        assert_eq!(hook.state(), HookState::Idle);
        assert_eq!(hook.last_path(), Some(FaultPath::Generic));
        assert!(text.contains("Error line:"));
        assert!(text.contains("total = a + c"));
        let frames = text.find("in add").unwrap();
        let trace = text.find("Traceback (most recent call last)").unwrap();
        assert!(frames < trace);
        assert!(text.ends_with("TypeError: unsupported operand\n"));

        let cached = ErrorCache::in_dir(dir.path()).load().unwrap();
        assert_eq!(cached.query, "TypeError: unsupported operand");
        assert_eq!(cached.doc, "Test error.");
    }

    #[test]
    fn test_attribute_error_suggestions() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new(
            "AttributeError",
            "'Console' object has no attribute 'export'",
            vec![FrameRecord::new("<stdin>", 1, "<module>").with_local(
                "console",
                SyntheticValue::object("rich.console", "Console", &["export_html", "export_text", "print"]),
            )],
        );
        let mut hook = controller(&dir, HookConfig::default());
        let text = run(&mut hook, &mut fault);

        assert_eq!(hook.last_path(), Some(FaultPath::AttributeError));
        let message = fault.message.clone().unwrap();
        assert!(message.contains("Perhaps you meant:"), "{}", message);
        assert!(message.contains("'export_html'"));
        assert!(message.contains("'export_text'"));
        assert!(text.contains("Perhaps you meant:"));
    }

    #[test]
    fn test_attribute_error_without_owner_falls_back() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new(
            "AttributeError",
            "'Console' object has no attribute 'export'",
            vec![FrameRecord::new("<stdin>", 1, "<module>").with_local("n", SyntheticValue::Int(3))],
        );
        let mut hook = controller(&dir, HookConfig::default());
        run(&mut hook, &mut fault);

        assert_eq!(hook.last_path(), Some(FaultPath::Generic));
        assert_eq!(fault.message.as_deref(), Some("'Console' object has no attribute 'export'"));
    }

    #[test]
    fn test_hide_locals_prints_only_trace() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new(
            "ValueError",
            "bad",
            vec![FrameRecord::new("<stdin>", 1, "<module>").with_local("n", SyntheticValue::Int(3))],
        );
        let config = HookConfig {
            hide_locals: true,
            ..HookConfig::default()
        };
        let mut hook = controller(&dir, config);
        let text = run(&mut hook, &mut fault);
        assert!(!text.contains("file:"));
        assert!(text.starts_with("Traceback"));
    }

    #[test]
    fn test_unreadable_report_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new("ValueError", "bad", vec![FrameRecord::new("<stdin>", 1, "<module>")]);
        fault.broken_report = true;
        let mut hook = controller(&dir, HookConfig::default());
        let mut out = Vec::new();
        assert!(hook.handle(&mut fault, &mut out).is_err());
        assert_eq!(hook.state(), HookState::Idle);
    }

    #[test]
    fn test_missing_message_and_no_trace() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new("KeyboardInterrupt", "", Vec::new());
        fault.message = None;
        let mut hook = controller(&dir, HookConfig::default());
        let text = run(&mut hook, &mut fault);
        assert!(text.starts_with("Traceback"));
        let cached = ErrorCache::in_dir(dir.path()).load().unwrap();
        assert_eq!(cached.query, "KeyboardInterrupt: No message");
    }

    #[test]
    fn test_prompt_runs_search() {
        let dir = TempDir::new().unwrap();
        let asked = std::rc::Rc::new(std::cell::Cell::new(0));
        let config = HookConfig {
            enable_prompt: true,
            hide_locals: true,
            ..HookConfig::default()
        };
        let mut hook = controller(&dir, config).with_prompt(Box::new(Answer(true, asked.clone())));
        let mut fault = TestFault::new("ValueError", "bad", vec![FrameRecord::new("<stdin>", 1, "<module>")]);
        let text = run(&mut hook, &mut fault);
        assert_eq!(asked.get(), 1);
        assert!(text.contains("stackoverflow.com"));
        assert!(!text.contains("Last error"));
    }

    #[test]
    fn test_prompt_declined() {
        let dir = TempDir::new().unwrap();
        let asked = std::rc::Rc::new(std::cell::Cell::new(0));
        let config = HookConfig {
            enable_prompt: true,
            ..HookConfig::default()
        };
        let mut hook = controller(&dir, config).with_prompt(Box::new(Answer(false, asked.clone())));
        let mut fault = TestFault::new("ValueError", "bad", vec![FrameRecord::new("<stdin>", 1, "<module>")]);
        let text = run(&mut hook, &mut fault);
        assert_eq!(asked.get(), 1);
        assert!(!text.contains("stackoverflow.com"));
    }

    #[test]
    fn test_inspect_frame_without_source_is_single_tier() {
        let stack = SyntheticStack::new(vec![FrameRecord::new("/no/such/file.py", 4, "f")
            .with_local("b", SyntheticValue::Int(1))
            .with_local("a", SyntheticValue::str("x"))
            .with_local("os", SyntheticValue::Module("os".to_string()))]);
        let frame = stack.trace().unwrap().frame();
        let doc = inspect_frame(&frame, &Classifier::default(), &HookConfig::default(), true).unwrap();
        assert!(doc.error_line.is_none());
        let names: Vec<_> = doc.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(doc.locals, LocalsView::Table(_)));
    }

    #[test]
    fn test_inspect_frame_reads_error_line() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("script.py");
        fs::write(&script, "x = 1\ntotal = a + c\n").unwrap();
        let stack = SyntheticStack::new(vec![FrameRecord::new(&script.to_string_lossy(), 2, "add")
            .with_local("a", SyntheticValue::Int(1))
            .with_local("b", SyntheticValue::Int(2))
            .with_local("c", SyntheticValue::Int(3))]);
        let frame = stack.trace().unwrap().frame();

        let doc = inspect_frame(&frame, &Classifier::default(), &HookConfig::default(), true).unwrap();
        assert_eq!(
            doc.error_line,
            Some(SourceSnippet {
                path: script.clone(),
                first_line: 2,
                lines: vec!["total = a + c".to_string()],
            })
        );
        let tiers: Vec<_> = doc.rows().iter().map(|r| (r.name.as_str(), r.tier)).collect();
        assert_eq!(tiers, vec![("a", Tier::Referenced), ("c", Tier::Referenced), ("b", Tier::Other)]);
    }

    #[test]
    fn test_attribute_error_on_class_object() {
        let dir = TempDir::new().unwrap();
        let mut fault = TestFault::new(
            "AttributeError",
            "type object 'Console' has no attribute 'exportt'",
            vec![FrameRecord::new("<stdin>", 1, "<module>").with_local(
                "Console",
                SyntheticValue::class("Console", &["export_html", "export_text", "print"]),
            )],
        );
        let mut hook = controller(&dir, HookConfig::default());
        run(&mut hook, &mut fault);

        assert_eq!(hook.last_path(), Some(FaultPath::AttributeError));
        let message = fault.message.clone().unwrap();
        assert!(message.contains("'export_html'"), "{}", message);
        assert!(message.contains("'export_text'"));
    }

    #[test]
    fn test_configured_cache_dir_is_found_by_answer_lookup() {
        let dir = TempDir::new().unwrap();
        let configured = dir.path().join("configured");
        let config = HookConfig {
            cache_dir: Some(configured.clone()),
            hide_locals: true,
            ..HookConfig::default()
        };
        let mut hook = HookController::new(config);
        let mut fault = TestFault::new("ValueError", "bad", vec![FrameRecord::new("<stdin>", 1, "<module>")]);
        run(&mut hook, &mut fault);

        let cache = ErrorCache::resolve(Some(configured.as_path())).unwrap();
        assert_eq!(hook.cache().map(ErrorCache::path), Some(cache.path()));
        let mut out = Vec::new();
        let found = answers::get_answers(&cache, &QueryUrlSearch::default(), true, &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(found.record.query, "ValueError: bad");
    }

    /// Single frame whose locals cannot be read.
    #[derive(Debug, Clone, Copy)]
    struct UnreadableFrame {
        panics: bool,
    }

    impl FrameView for UnreadableFrame {
        type Value = SyntheticValue;

        fn filename(&self) -> String {
            "<stdin>".to_string()
        }

        fn lineno(&self) -> usize {
            1
        }

        fn function_name(&self) -> String {
            "<module>".to_string()
        }

        fn locals(&self) -> Result<Vec<(String, SyntheticValue)>> {
            if self.panics {
                panic!("locals exploded");
            }
            Err(InspectError::runtime("frame locals unavailable"))
        }

        fn back(&self) -> Option<Self> {
            None
        }
    }

    impl TraceNode for UnreadableFrame {
        type Frame = UnreadableFrame;

        fn frame(&self) -> UnreadableFrame {
            *self
        }

        fn next(&self) -> Option<Self> {
            None
        }
    }

    struct UnreadableFault(UnreadableFrame);

    impl Fault for UnreadableFault {
        type Trace = UnreadableFrame;

        fn type_name(&self) -> String {
            "ValueError".to_string()
        }

        fn message(&self) -> Option<String> {
            Some("bad".to_string())
        }

        fn doc(&self) -> Option<String> {
            None
        }

        fn trace(&self) -> Option<UnreadableFrame> {
            Some(self.0)
        }

        fn is_attribute_error(&self) -> bool {
            false
        }

        fn amend_message(&mut self, _message: String) {}

        fn standard_report(&self) -> Result<String> {
            Ok("Traceback (most recent call last):\nValueError: bad\n".to_string())
        }
    }

    #[test]
    fn test_failed_enrichment_prints_standard_trace_only() {
        for panics in [false, true] {
            let dir = TempDir::new().unwrap();
            let mut fault = UnreadableFault(UnreadableFrame { panics });
            let mut hook = controller(&dir, HookConfig::default());
            colored::control::set_override(false);
            let mut out = Vec::new();
            hook.handle(&mut fault, &mut out).unwrap();

            assert_eq!(
                String::from_utf8(out).unwrap(),
                "Traceback (most recent call last):\nValueError: bad\n",
                "panics: {}",
                panics
            );
            assert_eq!(hook.state(), HookState::Idle);
            assert_eq!(hook.last_path(), Some(FaultPath::Generic));
            assert_eq!(ErrorCache::in_dir(dir.path()).load().unwrap().query, "ValueError: bad");
        }
    }

    #[test]
    fn test_quietly_reports_panic_payload() {
        let result = quietly(|| -> usize { panic!("locals exploded") });
        assert_eq!(panic_message(result.unwrap_err().as_ref()), "locals exploded");

        let result = quietly(|| -> usize { panic!("code {}", 7) });
        assert_eq!(panic_message(result.unwrap_err().as_ref()), "code 7");

        assert_eq!(quietly(|| 3).unwrap(), 3);
    }
}
