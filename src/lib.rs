pub mod core;
pub mod dimstyle;
pub mod io;
pub mod xdata;

#[cfg(feature = "python")]
mod api;

pub use crate::core::error::{DwgError, ErrorKind};

#[cfg(feature = "python")]
#[pyo3::pymodule]
fn ezdwg_dimstyle(module: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    api::register(module)
}
