//! pyinspect: Python bindings for the pyinspect traceback hook.
//!
//! Implements the `pyinspect-core` traits over live CPython objects and
//! exposes the `pyinspect` extension module:
//!
//! - `install_traceback(...)` / `uninstall_traceback()`
//! - `show_locals(all_locals=False)`
//! - `read_single_line(path, lineno)`
//! - `get_answers(hide_panel=False)`
//! - `showme(obj)`

pub mod fault;
pub mod frame;
pub mod hook;
pub mod value;

use std::path::PathBuf;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyInt};

use pyinspect_core::answers::{self, QueryUrlSearch};
use pyinspect_core::{
    configured_cache, inspect_frame, source, terminal, Classifier, HookConfig, InspectError, SourceSnippet,
};

pub use fault::PyFault;
pub use frame::{PyFrame, PyTraceNode};
pub use hook::{install_traceback, uninstall_traceback, ExceptHook};
pub use value::PyValue;

use hook::PyStream;
use value::attr_string;

pub fn inspect_error_to_pyerr(e: InspectError) -> PyErr {
    match e {
        InspectError::InvalidArgument { .. } => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

/// Line `lineno` (zero-based) of `path`, or `None` when the file or line is
/// missing. A non-integer `lineno` raises `ValueError`.
#[pyfunction]
fn read_single_line(path: PathBuf, lineno: &Bound<'_, PyAny>) -> PyResult<Option<String>> {
    if lineno.is_instance_of::<PyBool>() || !lineno.is_instance_of::<PyInt>() {
        return Err(inspect_error_to_pyerr(InspectError::invalid_argument(
            "when reading a single line from file, lineno should be an integer",
        )));
    }
    let lineno: i64 = lineno.extract()?;
    source::read_line_checked(&path, lineno).map_err(inspect_error_to_pyerr)
}

/// Prints the caller's local variables as a single-tier table.
#[pyfunction]
#[pyo3(signature = (all_locals=false))]
fn show_locals(py: Python<'_>, all_locals: bool) -> PyResult<()> {
    let caller = py.import("sys")?.getattr("_getframe")?.call1((0,))?;
    let config = HookConfig {
        all_locals,
        ..HookConfig::default()
    };
    let doc = inspect_frame(&PyFrame::new(caller), &Classifier::default(), &config, false)
        .map_err(inspect_error_to_pyerr)?;
    terminal::write_frame(&mut PyStream::stdout(py), &doc).map_err(render_error)
}

/// Prints search links for the last cached error and returns the best one.
#[pyfunction]
#[pyo3(signature = (hide_panel=false))]
fn get_answers(py: Python<'_>, hide_panel: bool) -> PyResult<Option<String>> {
    let Some(cache) = configured_cache() else {
        return Err(PyRuntimeError::new_err("could not locate the pyinspect cache directory"));
    };
    let answers = answers::get_answers(
        &cache,
        &QueryUrlSearch::default(),
        hide_panel,
        &mut PyStream::stdout(py),
    )
    .map_err(inspect_error_to_pyerr)?;
    Ok(answers.and_then(|a| a.best().map(str::to_string)))
}

fn render_error(e: std::io::Error) -> PyErr {
    inspect_error_to_pyerr(InspectError::render(e.to_string()))
}

/// Source lines of `obj` as located by `inspect`, read back through the
/// source locator when the file is still on disk.
fn source_of(inspect: &Bound<'_, PyModule>, obj: &Bound<'_, PyAny>) -> PyResult<SourceSnippet> {
    let (lines, start): (Vec<String>, usize) = inspect.getattr("getsourcelines")?.call1((obj,))?.extract()?;
    let file: Option<PathBuf> = inspect.getattr("getsourcefile")?.call1((obj,))?.extract()?;
    let start = start.max(1);
    let end = start + lines.len().saturating_sub(1);

    let on_disk = file.as_ref().and_then(|file| source::snippet(file, start, end));
    Ok(on_disk.unwrap_or_else(|| SourceSnippet {
        path: file.unwrap_or_default(),
        first_line: start,
        lines: lines
            .iter()
            .map(|line| line.trim_end_matches(|c| c == '\n' || c == '\r').to_string())
            .collect(),
    }))
}

/// `(kind, name, origin)` for the listing heading.
fn describe(inspect: &Bound<'_, PyModule>, obj: &Bound<'_, PyAny>) -> PyResult<(&'static str, String, String)> {
    let name = attr_string(obj, "__name__").unwrap_or_else(|| "?".to_string());
    let module = attr_string(obj, "__module__").unwrap_or_else(|| "?".to_string());
    if inspect.getattr("ismethod")?.call1((obj,))?.is_truthy()? {
        let owner = obj.getattr("__self__")?;
        let class = if inspect.getattr("isclass")?.call1((&owner,))?.is_truthy()? {
            attr_string(&owner, "__name__")
        } else {
            attr_string(&owner.getattr("__class__")?, "__name__")
        };
        let class = class.unwrap_or_else(|| "?".to_string());
        return Ok(("Method", name, format!("class {}", class)));
    }
    if inspect.getattr("isclass")?.call1((obj,))?.is_truthy()? {
        return Ok(("Class", name, module));
    }
    Ok(("Function", name, module))
}

/// Prints the source of a function, method or class with highlighting.
/// Returns `False`, after a notice, for builtins and for objects without
/// Python source.
#[pyfunction]
fn showme(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    let inspect = py.import("inspect")?;
    let mut out = PyStream::stdout(py);
    let is = |predicate: &str| -> PyResult<bool> { inspect.getattr(predicate)?.call1((obj,))?.is_truthy() };

    let notice = if is("isbuiltin")? {
        let name = attr_string(obj, "__name__").unwrap_or_else(|| "?".to_string());
        Some(format!("`showme` does not work with builtin functions like \"{}\"", name))
    } else if !(is("isfunction")? || is("ismethod")? || is("isclass")?) {
        let class = obj.getattr("__class__").ok().and_then(|class| attr_string(&class, "__name__"));
        Some(format!(
            "`showme` only accepts functions, methods and classes, not \"{}\"",
            class.unwrap_or_else(|| "?".to_string())
        ))
    } else {
        None
    };
    if let Some(notice) = notice {
        terminal::write_panel(&mut out, "showme", &[notice], true).map_err(render_error)?;
        return Ok(false);
    }

    let snippet = match source_of(&inspect, obj) {
        Ok(snippet) => snippet,
        Err(e) => {
            log::debug!("no source for showme: {}", e);
            let notice = format!("source code is not available: {}", e);
            terminal::write_panel(&mut out, "showme", &[notice], true).map_err(render_error)?;
            return Ok(false);
        }
    };
    let (kind, name, origin) = describe(&inspect, obj)?;
    terminal::write_listing(&mut out, kind, &name, &origin, &snippet).map_err(render_error)?;
    Ok(true)
}

#[pymodule]
pub fn pyinspect(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ExceptHook>()?;
    m.add_function(wrap_pyfunction!(install_traceback, m)?)?;
    m.add_function(wrap_pyfunction!(uninstall_traceback, m)?)?;
    m.add_function(wrap_pyfunction!(read_single_line, m)?)?;
    m.add_function(wrap_pyfunction!(show_locals, m)?)?;
    m.add_function(wrap_pyfunction!(get_answers, m)?)?;
    m.add_function(wrap_pyfunction!(showme, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
