use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Decode,
    Unsupported,
    UnknownApplication,
    MalformedNesting,
    TypeMismatch,
    UnknownVariable,
    MalformedSequence,
    UnterminatedGroup,
    TrailingData,
    InvalidValue,
    UnknownVariableOnEncode,
    UnknownStyle,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Format => "format",
            ErrorKind::Decode => "decode",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::UnknownApplication => "unknown application",
            ErrorKind::MalformedNesting => "malformed nesting",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::UnknownVariable => "unknown variable",
            ErrorKind::MalformedSequence => "malformed sequence",
            ErrorKind::UnterminatedGroup => "unterminated group",
            ErrorKind::TrailingData => "trailing data",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::UnknownVariableOnEncode => "unknown variable on encode",
            ErrorKind::UnknownStyle => "unknown style",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}{}", context_suffix(.offset, .group_code, .variable_id))]
pub struct DwgError {
    pub kind: ErrorKind,
    pub message: String,
    // token index for token streams, byte offset for EED blobs
    pub offset: Option<u64>,
    pub group_code: Option<u16>,
    pub variable_id: Option<i16>,
}

impl DwgError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: None,
            group_code: None,
            variable_id: None,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_group_code(mut self, code: u16) -> Self {
        self.group_code = Some(code);
        self
    }

    pub fn with_variable(mut self, variable_id: i16) -> Self {
        self.variable_id = Some(variable_id);
        self
    }
}

fn context_suffix(
    offset: &Option<u64>,
    group_code: &Option<u16>,
    variable_id: &Option<i16>,
) -> String {
    let mut parts = Vec::new();
    if let Some(offset) = offset {
        parts.push(format!("at {offset}"));
    }
    if let Some(code) = group_code {
        parts.push(format!("group code {code}"));
    }
    if let Some(id) = variable_id {
        parts.push(format!("variable {id}"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::{DwgError, ErrorKind};

    #[test]
    fn display_includes_context() {
        let err = DwgError::new(ErrorKind::TypeMismatch, "expected real value")
            .with_offset(4)
            .with_group_code(1070)
            .with_variable(147);
        assert_eq!(
            err.to_string(),
            "type mismatch: expected real value (at 4, group code 1070, variable 147)"
        );
    }

    #[test]
    fn display_without_context() {
        let err = DwgError::new(ErrorKind::UnterminatedGroup, "missing closing brace");
        assert_eq!(err.to_string(), "unterminated group: missing closing brace");
    }
}
