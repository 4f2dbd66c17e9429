use tracing::{debug, trace};

use crate::core::config::ParseConfig;
use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::dimstyle::overrides::{OverrideRecord, OverrideSet};
use crate::dimstyle::registry::{self, DimensionVariable};
use crate::dimstyle::value::DimValue;
use crate::xdata::token::{
    XdataToken, XdataValue, CODE_APP_NAME, CODE_CONTROL, CODE_INT16, CODE_STRING,
};
use crate::xdata::{self, decode_eed_items};

#[derive(Debug, Clone, Copy)]
enum ParseState {
    Start,
    SeenAppName,
    SeenDstyle,
    ExpectingVariableIdOrClose,
    ExpectingValueFor(&'static DimensionVariable),
    Done,
}

pub fn decode_overrides(tokens: &[XdataToken]) -> Result<OverrideSet> {
    decode_overrides_with_config(tokens, &ParseConfig::default())
}

pub fn decode_overrides_with_config(
    tokens: &[XdataToken],
    config: &ParseConfig,
) -> Result<OverrideSet> {
    if tokens.len() > config.max_tokens {
        return Err(DwgError::new(
            ErrorKind::Format,
            format!(
                "xdata has {} tokens, limit is {}",
                tokens.len(),
                config.max_tokens
            ),
        ));
    }

    let mut state = ParseState::Start;
    let mut records = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        let at = |kind: ErrorKind, message: String| {
            DwgError::new(kind, message)
                .with_offset(index as u64)
                .with_group_code(token.code)
        };
        state = match state {
            ParseState::Start => {
                if token.code == CODE_APP_NAME && text_eq(token, &config.app_name) {
                    ParseState::SeenAppName
                } else {
                    return Err(at(
                        ErrorKind::UnknownApplication,
                        format!("expected 1001/{:?}, found {token}", config.app_name),
                    ));
                }
            }
            ParseState::SeenAppName => {
                if token.code == CODE_STRING && text_eq(token, &config.group_name) {
                    ParseState::SeenDstyle
                } else {
                    return Err(at(
                        ErrorKind::MalformedSequence,
                        format!("expected 1000/{:?}, found {token}", config.group_name),
                    ));
                }
            }
            ParseState::SeenDstyle => {
                if token.is_control("{") {
                    ParseState::ExpectingVariableIdOrClose
                } else {
                    return Err(at(
                        ErrorKind::MalformedSequence,
                        format!("expected 1002/\"{{\", found {token}"),
                    ));
                }
            }
            ParseState::ExpectingVariableIdOrClose => {
                if token.is_control("}") {
                    ParseState::Done
                } else if token.is_control("{") {
                    return Err(at(
                        ErrorKind::MalformedNesting,
                        "nested override group".to_string(),
                    ));
                } else if token.code == CODE_INT16 {
                    let Some(id) = token.as_i16() else {
                        return Err(at(
                            ErrorKind::MalformedSequence,
                            format!("variable id token carries {}", token.value.kind_name()),
                        ));
                    };
                    let var = registry::lookup_by_id(id).ok_or_else(|| {
                        at(
                            ErrorKind::UnknownVariable,
                            format!("unknown dimension variable id {id}"),
                        )
                        .with_variable(id)
                    })?;
                    ParseState::ExpectingValueFor(var)
                } else {
                    return Err(at(
                        ErrorKind::MalformedSequence,
                        format!("expected variable id or closing brace, found {token}"),
                    ));
                }
            }
            ParseState::ExpectingValueFor(var) => {
                if token.is_control("{") {
                    return Err(at(
                        ErrorKind::MalformedNesting,
                        "nested override group".to_string(),
                    )
                    .with_variable(var.id));
                }
                if token.code == CODE_APP_NAME || token.code == CODE_CONTROL {
                    return Err(at(
                        ErrorKind::MalformedSequence,
                        format!("expected value for {}, found {token}", var.name),
                    )
                    .with_variable(var.id));
                }
                if token.code != var.group_code() {
                    return Err(at(
                        ErrorKind::TypeMismatch,
                        format!(
                            "{} is a {} variable encoded with {}, found {}",
                            var.name,
                            var.kind.as_str(),
                            var.group_code(),
                            token.code
                        ),
                    )
                    .with_variable(var.id));
                }
                let value = token_value(&token.value).ok_or_else(|| {
                    at(
                        ErrorKind::TypeMismatch,
                        format!(
                            "{} value token carries {}",
                            var.name,
                            token.value.kind_name()
                        ),
                    )
                    .with_variable(var.id)
                })?;
                if config.validate_values {
                    var.validate(&value)
                        .map_err(|err| err.with_offset(index as u64).with_group_code(token.code))?;
                }
                trace!(variable = var.name, %value, "decoded override");
                records.push(OverrideRecord::new(var.id, value));
                ParseState::ExpectingVariableIdOrClose
            }
            ParseState::Done => {
                return Err(at(
                    ErrorKind::TrailingData,
                    format!("unexpected {token} after closing brace"),
                ));
            }
        };
    }

    match state {
        ParseState::Done => {
            debug!(records = records.len(), "decoded dimension style overrides");
            Ok(OverrideSet::from_records(records))
        }
        ParseState::Start => Err(DwgError::new(
            ErrorKind::UnknownApplication,
            "empty xdata stream",
        )),
        ParseState::ExpectingValueFor(var) => Err(DwgError::new(
            ErrorKind::UnterminatedGroup,
            format!("stream ended while expecting a value for {}", var.name),
        )
        .with_offset(tokens.len() as u64)
        .with_variable(var.id)),
        ParseState::SeenAppName | ParseState::SeenDstyle | ParseState::ExpectingVariableIdOrClose => {
            Err(DwgError::new(
                ErrorKind::UnterminatedGroup,
                "stream ended before the closing brace",
            )
            .with_offset(tokens.len() as u64))
        }
    }
}

// None when the entity carries no xdata for the configured application.
pub fn decode_entity_overrides(
    tokens: &[XdataToken],
    config: &ParseConfig,
) -> Result<Option<OverrideSet>> {
    match xdata::find_application(tokens, &config.app_name)? {
        Some(app_tokens) => decode_overrides_with_config(app_tokens, config).map(Some),
        None => Ok(None),
    }
}

pub fn decode_overrides_from_eed(data: &[u8], config: &ParseConfig) -> Result<OverrideSet> {
    let tokens = decode_eed_items(data, &config.app_name)?;
    decode_overrides_with_config(&tokens, config)
}

fn text_eq(token: &XdataToken, expected: &str) -> bool {
    token
        .as_text()
        .is_some_and(|text| text.eq_ignore_ascii_case(expected))
}

fn token_value(value: &XdataValue) -> Option<DimValue> {
    match value {
        XdataValue::Real(value) => Some(DimValue::Real(*value)),
        XdataValue::Int16(value) => Some(DimValue::Integer16(*value)),
        XdataValue::Text(text) => Some(DimValue::Text(text.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_entity_overrides, decode_overrides, decode_overrides_with_config};
    use crate::core::config::ParseConfig;
    use crate::core::error::ErrorKind;
    use crate::dimstyle::overrides::OverrideRecord;
    use crate::dimstyle::value::DimValue;
    use crate::xdata::XdataToken;

    fn header() -> Vec<XdataToken> {
        vec![
            XdataToken::app_name("ACAD"),
            XdataToken::string("DSTYLE"),
            XdataToken::control("{"),
        ]
    }

    fn stream(body: Vec<XdataToken>) -> Vec<XdataToken> {
        let mut tokens = header();
        tokens.extend(body);
        tokens.push(XdataToken::control("}"));
        tokens
    }

    #[test]
    fn decodes_reference_scenario() {
        let tokens = stream(vec![
            XdataToken::int16(147),
            XdataToken::real(0.09375),
            XdataToken::int16(77),
            XdataToken::int16(0),
        ]);
        let set = decode_overrides(&tokens).unwrap();
        assert_eq!(
            set.records(),
            &[
                OverrideRecord::new(147, DimValue::Real(0.09375)),
                OverrideRecord::new(77, DimValue::Integer16(0)),
            ]
        );
    }

    #[test]
    fn decodes_text_and_empty_groups() {
        let set = decode_overrides(&stream(vec![
            XdataToken::int16(3),
            XdataToken::string("<> mm"),
        ]))
        .unwrap();
        assert_eq!(set.get("DIMPOST"), Some(&DimValue::Text("<> mm".to_string())));
        assert!(decode_overrides(&stream(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn unknown_variable_fails_without_partial_result() {
        let tokens = stream(vec![
            XdataToken::int16(147),
            XdataToken::real(0.09375),
            XdataToken::int16(999),
            XdataToken::real(1.0),
        ]);
        let err = decode_overrides(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownVariable);
        assert_eq!(err.variable_id, Some(999));
        assert_eq!(err.offset, Some(5));
    }

    #[test]
    fn mismatched_value_code_is_type_mismatch() {
        let err = decode_overrides(&stream(vec![XdataToken::int16(147), XdataToken::int16(1)]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.group_code, Some(1070));
        assert_eq!(err.variable_id, Some(147));

        let err = decode_overrides(&stream(vec![XdataToken::int16(77), XdataToken::real(1.0)]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let err = decode_overrides(&stream(vec![
            XdataToken::int16(340),
            XdataToken::int16(5),
        ]))
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn foreign_application_is_rejected() {
        let mut tokens = stream(Vec::new());
        tokens[0] = XdataToken::app_name("MYAPP");
        let err = decode_overrides(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownApplication);
        assert_eq!(err.offset, Some(0));

        let err = decode_overrides(&[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownApplication);
    }

    #[test]
    fn missing_dstyle_marker_is_malformed() {
        let mut tokens = stream(Vec::new());
        tokens[1] = XdataToken::string("OTHER");
        let err = decode_overrides(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSequence);
        assert_eq!(err.offset, Some(1));
    }

    #[test]
    fn nested_brace_is_malformed_nesting() {
        let tokens = stream(vec![XdataToken::control("{"), XdataToken::control("}")]);
        assert_eq!(
            decode_overrides(&tokens).unwrap_err().kind,
            ErrorKind::MalformedNesting
        );

        let tokens = stream(vec![XdataToken::int16(147), XdataToken::control("{")]);
        assert_eq!(
            decode_overrides(&tokens).unwrap_err().kind,
            ErrorKind::MalformedNesting
        );
    }

    #[test]
    fn missing_close_is_unterminated() {
        let mut tokens = header();
        tokens.push(XdataToken::int16(147));
        tokens.push(XdataToken::real(0.5));
        assert_eq!(
            decode_overrides(&tokens).unwrap_err().kind,
            ErrorKind::UnterminatedGroup
        );

        tokens.push(XdataToken::int16(77));
        let err = decode_overrides(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedGroup);
        assert_eq!(err.variable_id, Some(77));

        assert_eq!(
            decode_overrides(&header()[..2]).unwrap_err().kind,
            ErrorKind::UnterminatedGroup
        );
    }

    #[test]
    fn close_while_value_pending_is_malformed_sequence() {
        let err = decode_overrides(&stream(vec![XdataToken::int16(147)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSequence);
        assert_eq!(err.offset, Some(4));
    }

    #[test]
    fn value_without_id_is_malformed_sequence() {
        let err = decode_overrides(&stream(vec![XdataToken::real(0.5)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSequence);
    }

    #[test]
    fn tokens_after_close_are_trailing_data() {
        let mut tokens = stream(Vec::new());
        tokens.push(XdataToken::int16(147));
        let err = decode_overrides(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TrailingData);
        assert_eq!(err.offset, Some(4));
    }

    #[test]
    fn value_validation_is_opt_in() {
        let tokens = stream(vec![XdataToken::int16(71), XdataToken::int16(2)]);
        assert!(decode_overrides(&tokens).is_ok());

        let config = ParseConfig {
            validate_values: true,
            ..ParseConfig::default()
        };
        let err = decode_overrides_with_config(&tokens, &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
        assert_eq!(err.offset, Some(4));
    }

    #[test]
    fn token_limit_is_enforced() {
        let config = ParseConfig {
            max_tokens: 3,
            ..ParseConfig::default()
        };
        let err = decode_overrides_with_config(&stream(Vec::new()), &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    #[test]
    fn entity_overrides_are_located_among_applications() {
        let mut tokens = vec![
            XdataToken::app_name("MYAPP"),
            XdataToken::string("payload"),
        ];
        tokens.extend(stream(vec![XdataToken::int16(140), XdataToken::real(3.5)]));
        let config = ParseConfig::default();
        let set = decode_entity_overrides(&tokens, &config).unwrap().unwrap();
        assert_eq!(set.get("DIMTXT"), Some(&DimValue::Real(3.5)));

        assert!(decode_entity_overrides(&tokens[..2], &config).unwrap().is_none());
    }

    #[test]
    fn unregistered_prefix_fails_entity_decode() {
        let mut tokens = vec![XdataToken::int16(5)];
        tokens.extend(stream(vec![XdataToken::int16(140), XdataToken::real(3.5)]));
        let err = decode_entity_overrides(&tokens, &ParseConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSequence);
        assert_eq!(err.offset, Some(0));
    }
}
