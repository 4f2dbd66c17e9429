use std::fmt;

use crate::dimstyle::registry::VarKind;
use crate::xdata::token::format_real;

// Boolean variables travel as Integer16.
#[derive(Debug, Clone, PartialEq)]
pub enum DimValue {
    Real(f64),
    Integer16(i16),
    Text(String),
}

impl DimValue {
    pub fn fits_kind(&self, kind: VarKind) -> bool {
        matches!(
            (self, kind),
            (DimValue::Real(_), VarKind::Real)
                | (DimValue::Integer16(_), VarKind::Integer16 | VarKind::Boolean)
                | (DimValue::Text(_), VarKind::String | VarKind::NamedReference)
        )
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            DimValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            DimValue::Integer16(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DimValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DimValue::Real(_) => "real",
            DimValue::Integer16(_) => "integer",
            DimValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Real(value) => f.write_str(&format_real(*value)),
            DimValue::Integer16(value) => write!(f, "{value}"),
            DimValue::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<f64> for DimValue {
    fn from(value: f64) -> Self {
        DimValue::Real(value)
    }
}

impl From<i16> for DimValue {
    fn from(value: i16) -> Self {
        DimValue::Integer16(value)
    }
}

impl From<bool> for DimValue {
    fn from(value: bool) -> Self {
        DimValue::Integer16(value as i16)
    }
}

impl From<&str> for DimValue {
    fn from(value: &str) -> Self {
        DimValue::Text(value.to_string())
    }
}

impl From<String> for DimValue {
    fn from(value: String) -> Self {
        DimValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DimValue;

    #[test]
    fn display_keeps_reals_out_of_exponent_form() {
        assert_eq!(DimValue::Real(0.00000025).to_string(), "0.00000025");
        assert_eq!(DimValue::Real(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(DimValue::Real(2.5).to_string(), "2.5");
        assert_eq!(DimValue::Integer16(-3).to_string(), "-3");
        assert_eq!(DimValue::from("_DOT").to_string(), "\"_DOT\"");
    }
}
