//! Live Python objects seen through [`InspectValue`].

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyString, PyTuple};

use pyinspect_core::value::{ArrayProbe, InspectValue, NumericStats, ObjectKind};
use pyinspect_core::{InspectError, Result};

/// `getattr(obj, name)` as a string, `None` on any failure.
pub(crate) fn attr_string(obj: &Bound<'_, PyAny>, name: &str) -> Option<String> {
    obj.getattr(name).ok()?.extract::<String>().ok()
}

#[derive(Debug, Clone)]
pub struct PyValue<'py> {
    obj: Bound<'py, PyAny>,
}

impl<'py> PyValue<'py> {
    pub fn new(obj: Bound<'py, PyAny>) -> Self {
        PyValue { obj }
    }

    pub fn as_any(&self) -> &Bound<'py, PyAny> {
        &self.obj
    }

    fn class_attr(&self, name: &str) -> Option<String> {
        let class = self.obj.getattr("__class__").ok()?;
        attr_string(&class, name)
    }

    fn inspect_check(&self, predicate: &str) -> bool {
        let py = self.obj.py();
        let checked = py
            .import("inspect")
            .and_then(|inspect| inspect.getattr(predicate))
            .and_then(|f| f.call1((&self.obj,)))
            .and_then(|result| result.is_truthy());
        checked.unwrap_or(false)
    }

    fn numeric_stats(&self) -> PyResult<NumericStats> {
        let py = self.obj.py();
        let max = self.obj.call_method0("max")?.str()?.to_string();
        let min = self.obj.call_method0("min")?.str()?.to_string();
        let has_nan = py
            .import("numpy")?
            .getattr("isnan")?
            .call1((&self.obj,))?
            .call_method0("any")?
            .is_truthy()?;
        Ok(NumericStats { max, min, has_nan })
    }
}

impl InspectValue for PyValue<'_> {
    fn type_name(&self) -> String {
        self.class_attr("__name__")
            .unwrap_or_else(|| "object".to_string())
    }

    fn module_name(&self) -> String {
        self.class_attr("__module__")
            .unwrap_or_else(|| "builtins".to_string())
    }

    fn object_kind(&self) -> ObjectKind {
        if self.inspect_check("isbuiltin") {
            ObjectKind::Builtin
        } else if self.inspect_check("isfunction") {
            ObjectKind::Function
        } else if self.inspect_check("ismodule") {
            ObjectKind::Module
        } else if self.inspect_check("isclass") {
            ObjectKind::Class
        } else {
            ObjectKind::Instance
        }
    }

    fn array(&self) -> Option<ArrayProbe> {
        if !self.obj.hasattr("shape").unwrap_or(false) || !self.obj.hasattr("dtype").unwrap_or(false) {
            return None;
        }
        let shape = self.obj.getattr("shape").ok()?.extract::<Vec<usize>>().ok()?;
        let stats = match self.numeric_stats() {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::debug!("array statistics unavailable: {}", e);
                None
            }
        };
        Some(ArrayProbe { shape, stats })
    }

    fn sequence_len(&self) -> Option<usize> {
        let obj = &self.obj;
        if obj.is_instance_of::<PyString>() || obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
            obj.len().ok()
        } else {
            None
        }
    }

    fn mapping_entries(&self) -> Option<Vec<(String, String)>> {
        let dict = self.obj.cast::<PyDict>().ok()?;
        let entries = dict
            .iter()
            .map(|(key, value)| {
                let key = key
                    .repr()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|_| "?".to_string());
                (key, PyValue::new(value).type_name())
            })
            .collect();
        Some(entries)
    }

    fn repr(&self) -> Result<String> {
        self.obj
            .repr()
            .map(|r| r.to_string())
            .map_err(|e| InspectError::runtime(e.to_string()))
    }

    fn attribute_names(&self) -> Vec<String> {
        match self.obj.dir() {
            Ok(names) => names
                .iter()
                .filter_map(|name| name.extract::<String>().ok())
                .collect(),
            Err(e) => {
                log::debug!("dir() failed: {}", e);
                Vec::new()
            }
        }
    }
    fn own_name(&self) -> Option<String> {
        attr_string(&self.obj, "__name__")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyinspect_core::{Category, Classifier};

    #[test]
    fn test_builtin_values() {
        Python::attach(|py| {
            let locals = PyDict::new(py);
            py.run(
                c"import os\ntext = 'hello'\nitems = [1, 2, 3]\nd = {'a': 1, 'b': 'x'}\nn = 4\n",
                Some(&locals),
                Some(&locals),
            )
            .unwrap();
            let get = |name: &str| PyValue::new(locals.get_item(name).unwrap().unwrap());
            let classifier = Classifier::default();

            let c = classifier.classify(&get("text"), false).unwrap();
            assert_eq!(c.category, Category::Sequence);
            assert_eq!(c.info, "Length: 5");
            assert_eq!(c.label.to_string(), "builtins.str");

            let c = classifier.classify(&get("items"), false).unwrap();
            assert_eq!(c.info, "Length: 3");

            let d = get("d");
            assert_eq!(classifier.classify(&d, false).unwrap().category, Category::Mapping);
            assert_eq!(classifier.summarize(&d).unwrap(), "{'a': int, 'b': str}");

            assert_eq!(get("n").repr().unwrap(), "4");
            assert_eq!(get("os").object_kind(), ObjectKind::Module);
            assert!(classifier.classify(&get("os"), false).is_none());
        });
    }

    #[test]
    fn test_class_and_functions() {
        Python::attach(|py| {
            let locals = PyDict::new(py);
            py.run(
                c"class Console:\n    def export_html(self): pass\n\ndef main(): pass\nc = Console()\nf = main\nb = len\n",
                Some(&locals),
                Some(&locals),
            )
            .unwrap();
            let get = |name: &str| PyValue::new(locals.get_item(name).unwrap().unwrap());

            assert_eq!(get("Console").object_kind(), ObjectKind::Class);
            assert_eq!(get("f").object_kind(), ObjectKind::Function);
            assert_eq!(get("b").object_kind(), ObjectKind::Builtin);

            let c = get("c");
            assert_eq!(c.object_kind(), ObjectKind::Instance);
            assert_eq!(c.type_name(), "Console");
            assert!(c.attribute_names().contains(&"export_html".to_string()));
        });
    }

    #[test]
    fn test_broken_repr() {
        Python::attach(|py| {
            let locals = PyDict::new(py);
            py.run(
                c"class Weird:\n    def __repr__(self):\n        raise RuntimeError('no')\nw = Weird()\n",
                Some(&locals),
                Some(&locals),
            )
            .unwrap();
            let w = PyValue::new(locals.get_item("w").unwrap().unwrap());
            assert!(w.repr().is_err());
            let summary = Classifier::default().summarize_binding("w", &w, false).unwrap();
            assert_eq!(summary.value_text, None);
        });
    }
}
