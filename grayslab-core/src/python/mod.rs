//! Python bindings for the single-slab model
//!
//! Trajectories are returned as NumPy arrays so they can be handed straight
//! to matplotlib or any other plotting library.

use crate::errors::GraySlabError;
use crate::integrator;
use crate::parameters::SimulationParameters;
use crate::summary::{Summary, SummaryStyle};
use crate::timeseries::FloatValue;
use numpy::ToPyArray;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl From<GraySlabError> for PyErr {
    fn from(e: GraySlabError) -> PyErr {
        match e {
            GraySlabError::Io(_) => PyIOError::new_err(e.to_string()),
            _ => PyValueError::new_err(e.to_string()),
        }
    }
}

/// Python wrapper for SimulationParameters
///
/// Example:
///     params = SimulationParameters.from_dict({"dt": 30.0, "emissivity": 0.8})
#[pyclass]
#[pyo3(name = "SimulationParameters")]
#[derive(Debug, Clone)]
pub struct PySimulationParameters(pub SimulationParameters);

#[pymethods]
impl PySimulationParameters {
    /// Parameters with the model defaults
    #[new]
    fn new() -> Self {
        Self(SimulationParameters::default())
    }

    /// Build from a dict; missing keys take the defaults
    #[staticmethod]
    fn from_dict(parameters: Bound<PyAny>) -> PyResult<Self> {
        let parameters = pythonize::depythonize::<SimulationParameters>(&parameters)
            .map_err(|e| PyValueError::new_err(format!("{}", e)))?;
        parameters.validate()?;
        Ok(Self(parameters))
    }

    /// Build from the contents of a TOML document
    #[staticmethod]
    fn from_toml(content: &str) -> PyResult<Self> {
        Ok(Self(SimulationParameters::from_toml_str(content)?))
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        pythonize::pythonize(py, &self.0).map_err(|e| PyValueError::new_err(format!("{}", e)))
    }

    #[getter]
    fn n_steps(&self) -> usize {
        self.0.n_steps()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.0)
    }
}

/// Integrate the model and return the trajectory as NumPy arrays
///
/// Keys: ``time``, ``surface_temperature``, ``atmosphere_temperature`` and
/// ``final_atmosphere_temperature``.
#[pyfunction]
fn run<'py>(
    py: Python<'py>,
    parameters: &PySimulationParameters,
) -> PyResult<Bound<'py, PyDict>> {
    let result = integrator::run(&parameters.0)?;
    let trajectory = &result.trajectory;

    let out = PyDict::new(py);
    out.set_item("time", trajectory.time_axis().to_pyarray(py))?;
    out.set_item(
        "surface_temperature",
        trajectory.surface().values().to_pyarray(py),
    )?;
    out.set_item(
        "atmosphere_temperature",
        trajectory.atmosphere().values().to_pyarray(py),
    )?;
    out.set_item(
        "final_atmosphere_temperature",
        result.final_atmosphere_temperature(),
    )?;
    Ok(out)
}

/// Summary report lines for a run (style: "legacy" or "corrected")
#[pyfunction]
#[pyo3(signature = (parameters, style="legacy"))]
fn summary_lines(parameters: &PySimulationParameters, style: &str) -> PyResult<Vec<String>> {
    let style: SummaryStyle = style.parse().map_err(PyValueError::new_err)?;
    let result = integrator::run(&parameters.0)?;
    Ok(Summary::from_result(&result).lines(style))
}

/// Stefan-Boltzmann emission of a body at `temperature`
#[pyfunction]
#[pyo3(signature = (temperature, sigma=crate::physics::STEFAN_BOLTZMANN))]
fn black_body(temperature: FloatValue, sigma: FloatValue) -> FloatValue {
    crate::physics::black_body(sigma, temperature)
}

#[pymodule]
pub fn model(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulationParameters>()?;
    m.add_function(wrap_pyfunction!(run, m)?)?;
    m.add_function(wrap_pyfunction!(summary_lines, m)?)?;
    m.add_function(wrap_pyfunction!(black_body, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_python<F: for<'py> FnOnce(Python<'py>)>(f: F) {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(f);
    }

    #[test]
    fn invalid_parameter_maps_to_value_error() {
        with_python(|py| {
            let err: PyErr = GraySlabError::InvalidParameter {
                name: "albedo",
                value: 1.5,
                reason: "must be in [0, 1)",
            }
            .into();
            assert!(err.is_instance_of::<PyValueError>(py));
            assert!(err.to_string().contains("albedo"));

            let err: PyErr = GraySlabError::Config("bad toml".to_string()).into();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn io_error_maps_to_io_error() {
        with_python(|py| {
            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
            let err: PyErr = GraySlabError::Io(io).into();
            assert!(err.is_instance_of::<PyIOError>(py));
        });
    }

    #[test]
    fn from_dict_validates() {
        with_python(|py| {
            let dict = PyDict::new(py);
            dict.set_item("albedo", 1.5).unwrap();
            let err = PySimulationParameters::from_dict(dict.into_any()).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));

            let dict = PyDict::new(py);
            dict.set_item("dt", 30.0).unwrap();
            let params = PySimulationParameters::from_dict(dict.into_any()).unwrap();
            assert_eq!(params.0.dt, 30.0);
            assert_eq!(params.0.insolation, 1367.0);
        });
    }

    #[test]
    fn from_dict_rejects_unknown_keys() {
        with_python(|py| {
            let dict = PyDict::new(py);
            dict.set_item("solar_constant", 1361.0).unwrap();
            let err = PySimulationParameters::from_dict(dict.into_any()).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn run_returns_arrays() {
        with_python(|py| {
            let params = PySimulationParameters::new();
            let out = run(py, &params).unwrap();
            for key in ["time", "surface_temperature", "atmosphere_temperature"] {
                let array = out.get_item(key).unwrap().unwrap();
                assert_eq!(array.len().unwrap(), 60, "{}", key);
            }
            let final_atmosphere: f64 = out
                .get_item("final_atmosphere_temperature")
                .unwrap()
                .unwrap()
                .extract()
                .unwrap();
            assert!((final_atmosphere - 241.03395795260897).abs() < 1e-6);
        });
    }

    #[test]
    fn summary_lines_rejects_unknown_style() {
        with_python(|py| {
            let params = PySimulationParameters::new();
            let err = summary_lines(&params, "maximum").unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));

            let lines = summary_lines(&params, "legacy").unwrap();
            assert_eq!(lines[0], "Earth maximum temperature 286.639 K");
        });
    }
}
