//! The `(type, value, traceback)` triple handed to `sys.excepthook`.

use pyo3::exceptions::PyAttributeError;
use pyo3::prelude::*;
use pyo3::types::{PyString, PyTuple};

use pyinspect_core::hook::Fault;
use pyinspect_core::{InspectError, Result};

use crate::frame::PyTraceNode;
use crate::value::attr_string;

pub struct PyFault<'py> {
    exc_type: Bound<'py, PyAny>,
    value: Bound<'py, PyAny>,
    traceback: Bound<'py, PyAny>,
}

impl<'py> PyFault<'py> {
    pub fn new(exc_type: Bound<'py, PyAny>, value: Bound<'py, PyAny>, traceback: Bound<'py, PyAny>) -> Self {
        PyFault {
            exc_type,
            value,
            traceback,
        }
    }

    fn args(&self) -> Option<Bound<'py, PyTuple>> {
        self.value.getattr("args").ok()?.cast_into::<PyTuple>().ok()
    }
}

impl<'py> Fault for PyFault<'py> {
    type Trace = PyTraceNode<'py>;

    fn type_name(&self) -> String {
        attr_string(&self.exc_type, "__name__").unwrap_or_else(|| "Exception".to_string())
    }

    fn message(&self) -> Option<String> {
        let first = self.args()?.get_item(0).ok()?;
        first.str().ok().map(|s| s.to_string())
    }

    fn doc(&self) -> Option<String> {
        attr_string(&self.value, "__doc__")
    }

    fn trace(&self) -> Option<PyTraceNode<'py>> {
        PyTraceNode::new(self.traceback.clone())
    }

    fn is_attribute_error(&self) -> bool {
        self.value.is_instance_of::<PyAttributeError>()
    }

    fn amend_message(&mut self, message: String) {
        let py = self.value.py();
        let mut args: Vec<Bound<'py, PyAny>> = vec![PyString::new(py, &message).into_any()];
        if let Some(existing) = self.args() {
            args.extend(existing.iter().skip(1));
        }
        let updated = PyTuple::new(py, args).and_then(|args| self.value.setattr("args", args));
        if let Err(e) = updated {
            log::debug!("could not amend error message: {}", e);
        }
    }

    fn standard_report(&self) -> Result<String> {
        let py = self.value.py();
        let lines = py
            .import("traceback")
            .and_then(|tb| tb.getattr("format_exception"))
            .and_then(|f| f.call1((&self.exc_type, &self.value, &self.traceback)))
            .and_then(|lines| lines.extract::<Vec<String>>())
            .map_err(|e| InspectError::runtime(format!("format_exception failed: {}", e)))?;
        Ok(lines.concat())
    }
}
