#![allow(clippy::useless_conversion)] // Triggered by PyO3 #[pyfunction] wrapper expansion.

use pyo3::exceptions::{PyKeyError, PyNotImplementedError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use std::collections::HashMap;

use crate::core::config::{ParseConfig, WriterConfig};
use crate::core::error::{DwgError, ErrorKind};
use crate::dimstyle;
use crate::xdata;

type Point3 = (f64, f64, f64);

type TokenRow = (u16, PyObject);
type OverrideRow = (i16, String, PyObject);
type VariableRow = (i16, String, String, u16, PyObject, PyObject);

#[pyfunction]
pub fn dimstyle_variables(py: Python<'_>) -> Vec<VariableRow> {
    dimstyle::registry::variables()
        .iter()
        .map(|var| {
            (
                var.id,
                var.name.to_string(),
                var.kind.as_str().to_string(),
                var.group_code(),
                dim_value_to_py(py, &var.default_for(dimstyle::UnitSystem::Imperial)),
                dim_value_to_py(py, &var.default_for(dimstyle::UnitSystem::Metric)),
            )
        })
        .collect()
}

#[pyfunction]
pub fn decode_dimstyle_overrides(
    py: Python<'_>,
    tokens: Vec<(u16, Bound<'_, PyAny>)>,
) -> PyResult<Vec<OverrideRow>> {
    let tokens = tokens_from_py(tokens)?;
    let overrides = dimstyle::decode_overrides(&tokens).map_err(to_py_err)?;
    Ok(overrides
        .iter()
        .map(|record| {
            let name = record
                .variable()
                .map(|var| var.name.to_string())
                .unwrap_or_default();
            (record.variable_id, name, dim_value_to_py(py, &record.value))
        })
        .collect())
}

#[pyfunction(signature = (records, strict=false))]
pub fn encode_dimstyle_overrides(
    py: Python<'_>,
    records: Vec<(Bound<'_, PyAny>, Bound<'_, PyAny>)>,
    strict: bool,
) -> PyResult<Vec<TokenRow>> {
    let overrides = overrides_from_py(records)?;
    let config = WriterConfig {
        strict,
        ..WriterConfig::default()
    };
    let tokens = dimstyle::encode_overrides_with_config(&overrides, &config).map_err(to_py_err)?;
    Ok(tokens.iter().map(|token| token_to_py(py, token)).collect())
}

#[pyfunction(signature = (tokens, measurement=0))]
pub fn resolve_dimstyle(
    py: Python<'_>,
    tokens: Vec<(u16, Bound<'_, PyAny>)>,
    measurement: i16,
) -> PyResult<HashMap<String, PyObject>> {
    let tokens = tokens_from_py(tokens)?;
    let unit = dimstyle::UnitSystem::from_measurement(measurement).map_err(to_py_err)?;
    let base = dimstyle::DimStyleDefinition::from_defaults("Standard", unit);
    let overrides = dimstyle::decode_entity_overrides(&tokens, &ParseConfig::default())
        .map_err(to_py_err)?
        .unwrap_or_default();
    let effective = dimstyle::resolve(&base, &overrides).map_err(to_py_err)?;
    Ok(effective
        .as_definition()
        .iter()
        .map(|(var, value)| (var.name.to_string(), dim_value_to_py(py, value)))
        .collect())
}

#[pyfunction(signature = (data, app_name="ACAD"))]
pub fn decode_eed_items(py: Python<'_>, data: &[u8], app_name: &str) -> PyResult<Vec<TokenRow>> {
    let tokens = xdata::decode_eed_items(data, app_name).map_err(to_py_err)?;
    Ok(tokens.iter().map(|token| token_to_py(py, token)).collect())
}

pub fn register(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(dimstyle_variables, module)?)?;
    module.add_function(wrap_pyfunction!(decode_dimstyle_overrides, module)?)?;
    module.add_function(wrap_pyfunction!(encode_dimstyle_overrides, module)?)?;
    module.add_function(wrap_pyfunction!(resolve_dimstyle, module)?)?;
    module.add_function(wrap_pyfunction!(decode_eed_items, module)?)?;
    Ok(())
}

fn tokens_from_py(rows: Vec<(u16, Bound<'_, PyAny>)>) -> PyResult<Vec<xdata::XdataToken>> {
    rows.into_iter()
        .map(|(code, payload)| {
            let value = match code {
                1000..=1003 => match payload.extract::<String>() {
                    Ok(text) => xdata::XdataValue::Text(text),
                    Err(_) if code == 1003 => xdata::XdataValue::Handle(payload.extract::<u64>()?),
                    Err(err) => return Err(err),
                },
                1004 => xdata::XdataValue::Binary(payload.extract::<Vec<u8>>()?),
                1005 => xdata::XdataValue::Handle(extract_handle(&payload)?),
                1010..=1013 | 1020..=1023 | 1030..=1033 => {
                    xdata::XdataValue::Point(payload.extract::<Point3>()?)
                }
                1040..=1042 => xdata::XdataValue::Real(payload.extract::<f64>()?),
                1070 => xdata::XdataValue::Int16(payload.extract::<i16>()?),
                1071 => xdata::XdataValue::Int32(payload.extract::<i32>()?),
                other => {
                    return Err(PyValueError::new_err(format!(
                        "group code {other} is not an xdata group code"
                    )))
                }
            };
            xdata::XdataToken::new(code, value).map_err(to_py_err)
        })
        .collect()
}

fn extract_handle(payload: &Bound<'_, PyAny>) -> PyResult<u64> {
    if let Ok(handle) = payload.extract::<u64>() {
        return Ok(handle);
    }
    let text = payload.extract::<String>()?;
    u64::from_str_radix(text.trim(), 16)
        .map_err(|_| PyValueError::new_err(format!("invalid handle: {text:?}")))
}

fn overrides_from_py(
    rows: Vec<(Bound<'_, PyAny>, Bound<'_, PyAny>)>,
) -> PyResult<dimstyle::OverrideSet> {
    rows.into_iter()
        .map(|(key, payload)| {
            let var = match key.extract::<i16>() {
                Ok(id) => dimstyle::lookup_by_id(id),
                Err(_) => dimstyle::lookup_by_name(&key.extract::<String>()?),
            }
            .ok_or_else(|| PyKeyError::new_err(format!("unknown dimension variable: {key}")))?;
            let value = match var.kind {
                dimstyle::VarKind::Real => dimstyle::DimValue::Real(payload.extract::<f64>()?),
                dimstyle::VarKind::Integer16 | dimstyle::VarKind::Boolean => {
                    dimstyle::DimValue::Integer16(payload.extract::<i16>()?)
                }
                dimstyle::VarKind::String | dimstyle::VarKind::NamedReference => {
                    dimstyle::DimValue::Text(payload.extract::<String>()?)
                }
            };
            Ok(dimstyle::OverrideRecord::new(var.id, value))
        })
        .collect::<PyResult<Vec<_>>>()
        .map(dimstyle::OverrideSet::from_records)
}

fn token_to_py(py: Python<'_>, token: &xdata::XdataToken) -> TokenRow {
    let value = match &token.value {
        xdata::XdataValue::Text(text) => text.as_str().into_py(py),
        xdata::XdataValue::Binary(bytes) => PyBytes::new_bound(py, bytes).into_py(py),
        xdata::XdataValue::Handle(handle) => (*handle).into_py(py),
        xdata::XdataValue::Point(point) => (*point).into_py(py),
        xdata::XdataValue::Real(value) => (*value).into_py(py),
        xdata::XdataValue::Int16(value) => (*value).into_py(py),
        xdata::XdataValue::Int32(value) => (*value).into_py(py),
    };
    (token.code, value)
}

fn dim_value_to_py(py: Python<'_>, value: &dimstyle::DimValue) -> PyObject {
    match value {
        dimstyle::DimValue::Real(value) => (*value).into_py(py),
        dimstyle::DimValue::Integer16(value) => (*value).into_py(py),
        dimstyle::DimValue::Text(text) => text.as_str().into_py(py),
    }
}

fn to_py_err(err: DwgError) -> PyErr {
    let message = err.to_string();
    match err.kind {
        ErrorKind::UnknownVariable
        | ErrorKind::UnknownVariableOnEncode
        | ErrorKind::UnknownStyle => PyKeyError::new_err(message),
        ErrorKind::Unsupported => PyNotImplementedError::new_err(message),
        ErrorKind::Format
        | ErrorKind::Decode
        | ErrorKind::UnknownApplication
        | ErrorKind::MalformedNesting
        | ErrorKind::TypeMismatch
        | ErrorKind::MalformedSequence
        | ErrorKind::UnterminatedGroup
        | ErrorKind::TrailingData
        | ErrorKind::InvalidValue => PyValueError::new_err(message),
    }
}
