use tracing::debug;

use crate::core::config::WriterConfig;
use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::dimstyle::overrides::OverrideSet;
use crate::dimstyle::registry::{self, VarKind};
use crate::dimstyle::value::DimValue;
use crate::xdata::{encode_eed_items, XdataToken};

pub fn encode_overrides(overrides: &OverrideSet) -> Result<Vec<XdataToken>> {
    encode_overrides_with_config(overrides, &WriterConfig::default())
}

pub fn encode_overrides_with_config(
    overrides: &OverrideSet,
    config: &WriterConfig,
) -> Result<Vec<XdataToken>> {
    let mut tokens = Vec::with_capacity(4 + overrides.len() * 2);
    tokens.push(XdataToken::app_name(config.app_name.as_str()));
    tokens.push(XdataToken::string(config.group_name.as_str()));
    tokens.push(XdataToken::control("{"));
    for (index, record) in overrides.iter().enumerate() {
        let var = registry::lookup_by_id(record.variable_id).ok_or_else(|| {
            DwgError::new(
                ErrorKind::UnknownVariableOnEncode,
                format!("record {index} names unknown variable id {}", record.variable_id),
            )
            .with_offset(index as u64)
            .with_variable(record.variable_id)
        })?;
        if config.strict {
            var.validate(&record.value)
                .map_err(|err| err.with_offset(index as u64))?;
        }
        let value_token = match (var.kind, &record.value) {
            (VarKind::Real, DimValue::Real(value)) => XdataToken::real(*value),
            (VarKind::Integer16 | VarKind::Boolean, DimValue::Integer16(value)) => {
                XdataToken::int16(*value)
            }
            (VarKind::String | VarKind::NamedReference, DimValue::Text(text)) => {
                XdataToken::string(text.as_str())
            }
            (kind, value) => {
                return Err(DwgError::new(
                    ErrorKind::InvalidValue,
                    format!(
                        "{} expects a {} value, got {}",
                        var.name,
                        kind.as_str(),
                        value.kind_name()
                    ),
                )
                .with_offset(index as u64)
                .with_variable(var.id))
            }
        };
        tokens.push(XdataToken::int16(var.id));
        tokens.push(value_token);
    }
    tokens.push(XdataToken::control("}"));
    debug!(records = overrides.len(), tokens = tokens.len(), "encoded dimension style overrides");
    Ok(tokens)
}

pub fn encode_overrides_to_eed(
    overrides: &OverrideSet,
    config: &WriterConfig,
    code_page: u16,
) -> Result<Vec<u8>> {
    let tokens = encode_overrides_with_config(overrides, config)?;
    encode_eed_items(&tokens, code_page)
}
