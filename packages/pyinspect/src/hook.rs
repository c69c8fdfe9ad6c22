//! The `sys.excepthook` replacement.

use std::io::{self, Write};
use std::sync::Mutex;

use pyo3::prelude::*;

use pyinspect_core::config::{load_config, merge_config, HookConfig, HookOverrides};
use pyinspect_core::hook::{FaultPath, HookController, Prompt};

use crate::fault::PyFault;

/// Writes through to `sys.stdout` or `sys.stderr`, whichever is current at
/// write time.
pub(crate) struct PyStream<'py> {
    py: Python<'py>,
    name: &'static str,
}

impl<'py> PyStream<'py> {
    pub(crate) fn stdout(py: Python<'py>) -> Self {
        PyStream { py, name: "stdout" }
    }

    pub(crate) fn stderr(py: Python<'py>) -> Self {
        PyStream { py, name: "stderr" }
    }

    fn stream(&self) -> PyResult<Bound<'py, PyAny>> {
        self.py.import("sys")?.getattr(self.name)
    }
}

impl Write for PyStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.stream()
            .and_then(|stream| stream.call_method1("write", (text.as_ref(),)))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream()
            .and_then(|stream| stream.call_method0("flush"))
            .map(|_| ())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

/// Yes/no question through Python's `input()`, so redirected stdin works.
struct InputPrompt;

impl Prompt for InputPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        Python::attach(|py| {
            let answer = py
                .import("builtins")
                .and_then(|builtins| builtins.getattr("input"))
                .and_then(|input| input.call1((format!("{} [y/n]: ", question),)))
                .and_then(|answer| answer.extract::<String>());
            match answer {
                Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(e) => {
                    log::debug!("prompt failed: {}", e);
                    false
                }
            }
        })
    }
}

fn path_name(path: FaultPath) -> &'static str {
    match path {
        FaultPath::AttributeError => "attribute_error",
        FaultPath::Generic => "generic",
    }
}

#[pyclass(frozen, name = "ExceptHook", module = "pyinspect")]
pub struct ExceptHook {
    config: HookConfig,
    previous: Py<PyAny>,
    last_path: Mutex<Option<FaultPath>>,
}

impl ExceptHook {
    pub fn new(config: HookConfig, previous: Py<PyAny>) -> Self {
        ExceptHook {
            config,
            previous,
            last_path: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    pub fn previous(&self, py: Python<'_>) -> Py<PyAny> {
        self.previous.clone_ref(py)
    }

    fn record_path(&self, path: Option<FaultPath>) {
        if let Ok(mut last) = self.last_path.lock() {
            *last = path;
        }
    }
}

#[pymethods]
impl ExceptHook {
    fn __call__(
        &self,
        py: Python<'_>,
        exc_type: Bound<'_, PyAny>,
        value: Bound<'_, PyAny>,
        traceback: Bound<'_, PyAny>,
    ) -> PyResult<()> {
        let mut fault = PyFault::new(exc_type.clone(), value.clone(), traceback.clone());
        let mut controller = HookController::new(self.config.clone()).with_prompt(Box::new(InputPrompt));
        let mut stderr = PyStream::stderr(py);

        let handled = controller.handle(&mut fault, &mut stderr);
        self.record_path(controller.last_path());
        match handled {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("pyinspect hook failed, deferring to previous hook: {}", e);
                self.previous.bind(py).call1((exc_type, value, traceback))?;
                Ok(())
            }
        }
    }

    #[getter]
    fn keep_frames(&self) -> i64 {
        self.config.keep_frames
    }

    #[getter]
    fn hide_locals(&self) -> bool {
        self.config.hide_locals
    }

    #[getter]
    fn all_locals(&self) -> bool {
        self.config.all_locals
    }

    #[getter]
    fn relevant_only(&self) -> bool {
        self.config.relevant_only
    }

    #[getter]
    fn enable_prompt(&self) -> bool {
        self.config.enable_prompt
    }

    /// Which branch handled the last error: `"attribute_error"`, `"generic"`
    /// or `None` before the first one.
    #[getter]
    fn last_path(&self) -> Option<&'static str> {
        self.last_path.lock().ok().and_then(|last| last.map(path_name))
    }

    #[getter(previous)]
    fn get_previous(&self, py: Python<'_>) -> Py<PyAny> {
        self.previous(py)
    }

    fn __repr__(&self) -> String {
        format!(
            "ExceptHook(keep_frames={}, hide_locals={}, all_locals={}, relevant_only={}, enable_prompt={})",
            self.config.keep_frames,
            self.config.hide_locals,
            self.config.all_locals,
            self.config.relevant_only,
            self.config.enable_prompt
        )
    }
}

/// Replaces `sys.excepthook`, returning the hook that was installed before.
/// Arguments left as `None` come from `[tool.pyinspect]` or the defaults.
#[pyfunction]
#[pyo3(signature = (keep_frames=None, hide_locals=None, all_locals=None, relevant_only=None, enable_prompt=None))]
pub fn install_traceback(
    py: Python<'_>,
    keep_frames: Option<i64>,
    hide_locals: Option<bool>,
    all_locals: Option<bool>,
    relevant_only: Option<bool>,
    enable_prompt: Option<bool>,
) -> PyResult<Py<PyAny>> {
    let overrides = HookOverrides {
        keep_frames,
        hide_locals,
        all_locals,
        relevant_only,
        enable_prompt,
    };
    let file = load_config(None);
    let config = merge_config(file.as_ref(), &overrides);
    log::debug!("installing traceback hook with {:?}", config);

    let sys = py.import("sys")?;
    let previous = sys.getattr("excepthook")?;
    let hook = Bound::new(py, ExceptHook::new(config, previous.clone().unbind()))?;
    sys.setattr("excepthook", hook)?;
    Ok(previous.unbind())
}

/// Restores the hook replaced by the current `ExceptHook`. Returns whether
/// anything changed.
#[pyfunction]
pub fn uninstall_traceback(py: Python<'_>) -> PyResult<bool> {
    let sys = py.import("sys")?;
    let current = sys.getattr("excepthook")?;
    let Ok(hook) = current.cast::<ExceptHook>() else {
        return Ok(false);
    };
    let previous = hook.get().previous(py);
    sys.setattr("excepthook", previous)?;
    Ok(true)
}
