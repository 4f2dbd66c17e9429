use std::fmt;

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;

pub const CODE_STRING: u16 = 1000;
pub const CODE_APP_NAME: u16 = 1001;
pub const CODE_CONTROL: u16 = 1002;
pub const CODE_LAYER: u16 = 1003;
pub const CODE_BINARY: u16 = 1004;
pub const CODE_HANDLE: u16 = 1005;
pub const CODE_REAL: u16 = 1040;
pub const CODE_INT16: u16 = 1070;
pub const CODE_INT32: u16 = 1071;

#[derive(Debug, Clone, PartialEq)]
pub enum XdataValue {
    Text(String),
    Binary(Vec<u8>),
    Handle(u64),
    Point((f64, f64, f64)),
    Real(f64),
    Int16(i16),
    Int32(i32),
}

impl XdataValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            XdataValue::Text(_) => "text",
            XdataValue::Binary(_) => "binary",
            XdataValue::Handle(_) => "handle",
            XdataValue::Point(_) => "point",
            XdataValue::Real(_) => "real",
            XdataValue::Int16(_) => "int16",
            XdataValue::Int32(_) => "int32",
        }
    }
}

impl fmt::Display for XdataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XdataValue::Text(text) => write!(f, "{text:?}"),
            XdataValue::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            XdataValue::Handle(handle) => write!(f, "{handle:X}"),
            XdataValue::Point((x, y, z)) => write!(f, "({x}, {y}, {z})"),
            XdataValue::Real(value) => f.write_str(&format_real(*value)),
            XdataValue::Int16(value) => write!(f, "{value}"),
            XdataValue::Int32(value) => write!(f, "{value}"),
        }
    }
}

// Shortest round-trip digits, never in exponent form.
pub(crate) fn format_real(value: f64) -> String {
    let text = format!("{value}");
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XdataToken {
    pub code: u16,
    pub value: XdataValue,
}

impl XdataToken {
    pub fn new(code: u16, value: XdataValue) -> Result<Self> {
        let fits = match code {
            CODE_STRING | CODE_APP_NAME | CODE_CONTROL => matches!(value, XdataValue::Text(_)),
            CODE_LAYER => matches!(value, XdataValue::Text(_) | XdataValue::Handle(_)),
            CODE_BINARY => matches!(value, XdataValue::Binary(_)),
            CODE_HANDLE => matches!(value, XdataValue::Handle(_)),
            1010..=1013 | 1020..=1023 | 1030..=1033 => matches!(value, XdataValue::Point(_)),
            1040..=1042 => matches!(value, XdataValue::Real(_)),
            CODE_INT16 => matches!(value, XdataValue::Int16(_)),
            CODE_INT32 => matches!(value, XdataValue::Int32(_)),
            _ => {
                return Err(DwgError::new(
                    ErrorKind::Unsupported,
                    format!("group code {code} is not an xdata group code"),
                )
                .with_group_code(code))
            }
        };
        if !fits {
            return Err(DwgError::new(
                ErrorKind::Format,
                format!("{} payload does not fit group code {code}", value.kind_name()),
            )
            .with_group_code(code));
        }
        Ok(Self { code, value })
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::text_token(CODE_STRING, text)
    }

    pub fn app_name(name: impl Into<String>) -> Self {
        Self::text_token(CODE_APP_NAME, name)
    }

    pub fn control(marker: impl Into<String>) -> Self {
        Self::text_token(CODE_CONTROL, marker)
    }

    pub fn real(value: f64) -> Self {
        Self {
            code: CODE_REAL,
            value: XdataValue::Real(value),
        }
    }

    pub fn int16(value: i16) -> Self {
        Self {
            code: CODE_INT16,
            value: XdataValue::Int16(value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            XdataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.value {
            XdataValue::Real(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self.value {
            XdataValue::Int16(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_control(&self, marker: &str) -> bool {
        self.code == CODE_CONTROL && self.as_text() == Some(marker)
    }

    fn text_token(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            value: XdataValue::Text(text.into()),
        }
    }
}

impl fmt::Display for XdataToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.code, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{XdataToken, XdataValue};
    use crate::core::error::ErrorKind;

    #[test]
    fn accepts_payloads_matching_code_class() {
        assert!(XdataToken::new(1040, XdataValue::Real(1.0)).is_ok());
        assert!(XdataToken::new(1041, XdataValue::Real(2.0)).is_ok());
        assert!(XdataToken::new(1070, XdataValue::Int16(-3)).is_ok());
        assert!(XdataToken::new(1011, XdataValue::Point((1.0, 2.0, 3.0))).is_ok());
        assert!(XdataToken::new(1003, XdataValue::Handle(0x10)).is_ok());
        assert!(XdataToken::new(1003, XdataValue::Text("0".to_string())).is_ok());
    }

    #[test]
    fn rejects_mismatched_payload() {
        let err = XdataToken::new(1070, XdataValue::Real(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
        assert_eq!(err.group_code, Some(1070));
    }

    #[test]
    fn rejects_non_xdata_codes() {
        let err = XdataToken::new(40, XdataValue::Real(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);
    }

    #[test]
    fn display_is_code_slash_value() {
        assert_eq!(XdataToken::string("DSTYLE").to_string(), "1000/\"DSTYLE\"");
        assert_eq!(XdataToken::real(0.09375).to_string(), "1040/0.09375");
        assert_eq!(XdataToken::int16(77).to_string(), "1070/77");
    }

    #[test]
    fn reals_render_in_fixed_form() {
        assert_eq!(XdataToken::real(1e-7).to_string(), "1040/0.0000001");
        assert_eq!(XdataToken::real(1e17).to_string(), "1040/100000000000000000.0");
        assert_eq!(XdataToken::real(-2.0).to_string(), "1040/-2.0");
        let rendered = XdataToken::real(0.1 + 0.2).to_string();
        assert_eq!(rendered["1040/".len()..].parse::<f64>().unwrap(), 0.1 + 0.2);
    }
}
