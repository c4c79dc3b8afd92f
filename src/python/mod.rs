use grayslab_core::python::model;
use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use std::ffi::CString;

#[pymodule]
#[pyo3(name = "_lib")]
fn grayslab(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(model))?;

    set_path(m, "grayslab._lib.model", "model")?;

    Ok(())
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = CString::new(format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    ))?;
    m.py().run(code.as_c_str(), None, Some(&m.dict()))
}
