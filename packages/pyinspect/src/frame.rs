//! Python frames and traceback objects seen through the core stack traits.

use pyo3::prelude::*;

use pyinspect_core::stack::{FrameView, TraceNode};
use pyinspect_core::{InspectError, Result};

use crate::value::{attr_string, PyValue};

/// Follows `name` on `obj`, mapping Python `None` and failures to `None`.
fn link<'py>(obj: &Bound<'py, PyAny>, name: &str) -> Option<Bound<'py, PyAny>> {
    let target = obj.getattr(name).ok()?;
    if target.is_none() {
        None
    } else {
        Some(target)
    }
}

/// A `frame` object.
#[derive(Debug, Clone)]
pub struct PyFrame<'py> {
    frame: Bound<'py, PyAny>,
}

impl<'py> PyFrame<'py> {
    pub fn new(frame: Bound<'py, PyAny>) -> Self {
        PyFrame { frame }
    }

    fn code_attr(&self, name: &str) -> Option<String> {
        let code = self.frame.getattr("f_code").ok()?;
        attr_string(&code, name)
    }
}

impl<'py> FrameView for PyFrame<'py> {
    type Value = PyValue<'py>;

    fn filename(&self) -> String {
        self.code_attr("co_filename")
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    fn lineno(&self) -> usize {
        self.frame
            .getattr("f_lineno")
            .and_then(|n| n.extract::<Option<usize>>())
            .ok()
            .flatten()
            .unwrap_or(0)
    }

    fn function_name(&self) -> String {
        self.code_attr("co_name")
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    fn locals(&self) -> Result<Vec<(String, PyValue<'py>)>> {
        // f_locals is a dict before 3.13 and a write-through proxy after.
        let items = self
            .frame
            .getattr("f_locals")
            .and_then(|locals| locals.call_method0("items"))
            .and_then(|items| items.try_iter())
            .map_err(|e| InspectError::runtime(format!("could not read frame locals: {}", e)))?;

        Ok(items
            .filter_map(|item| {
                let (name, value) = item.ok()?.extract::<(String, Bound<'py, PyAny>)>().ok()?;
                Some((name, PyValue::new(value)))
            })
            .collect())
    }

    fn back(&self) -> Option<Self> {
        link(&self.frame, "f_back").map(PyFrame::new)
    }
}

/// A `traceback` object.
#[derive(Debug, Clone)]
pub struct PyTraceNode<'py> {
    node: Bound<'py, PyAny>,
}

impl<'py> PyTraceNode<'py> {
    /// `None` when `tb` is Python `None`.
    pub fn new(tb: Bound<'py, PyAny>) -> Option<Self> {
        if tb.is_none() {
            None
        } else {
            Some(PyTraceNode { node: tb })
        }
    }
}

impl<'py> TraceNode for PyTraceNode<'py> {
    type Frame = PyFrame<'py>;

    fn frame(&self) -> PyFrame<'py> {
        match link(&self.node, "tb_frame") {
            Some(frame) => PyFrame::new(frame),
            None => PyFrame::new(self.node.py().None().into_bound(self.node.py())),
        }
    }

    fn next(&self) -> Option<Self> {
        link(&self.node, "tb_next").map(|node| PyTraceNode { node })
    }
}
