use encoding_rs::Encoding;
use tracing::trace;

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use crate::io::{ByteReader, ByteWriter};
use crate::xdata::token::{XdataToken, XdataValue, CODE_APP_NAME};

pub const DEFAULT_CODE_PAGE: u16 = 30;

const ITEM_STRING: u8 = 0;
const ITEM_CONTROL: u8 = 2;
const ITEM_LAYER: u8 = 3;
const ITEM_BINARY: u8 = 4;
const ITEM_HANDLE: u8 = 5;
const ITEM_INT16: u8 = 70;
const ITEM_INT32: u8 = 71;

pub fn decode_eed_items(data: &[u8], app_name: &str) -> Result<Vec<XdataToken>> {
    let mut reader = ByteReader::new(data);
    let mut tokens = vec![XdataToken::app_name(app_name)];
    while !reader.is_empty() {
        let item_start = reader.tell();
        let item = reader.read_rc()?;
        let code = 1000 + item as u16;
        let value = match item {
            ITEM_STRING => {
                let len = reader.read_rc()? as usize;
                let code_page = reader.read_rs()?;
                let bytes = reader.read_rcs(len)?;
                XdataValue::Text(decode_text(bytes, code_page))
            }
            ITEM_CONTROL => match reader.read_rc()? {
                0 => XdataValue::Text("{".to_string()),
                1 => XdataValue::Text("}".to_string()),
                other => {
                    return Err(DwgError::new(
                        ErrorKind::Format,
                        format!("invalid control string flag: {other}"),
                    )
                    .with_offset(item_start)
                    .with_group_code(code))
                }
            },
            ITEM_LAYER | ITEM_HANDLE => XdataValue::Handle(read_raw_handle(&mut reader)?),
            ITEM_BINARY => {
                let len = reader.read_rc()? as usize;
                XdataValue::Binary(reader.read_rcs(len)?.to_vec())
            }
            10..=13 | 20..=23 | 30..=33 => XdataValue::Point(reader.read_3rd()?),
            40..=42 => XdataValue::Real(reader.read_rd()?),
            ITEM_INT16 => XdataValue::Int16(reader.read_rs()? as i16),
            ITEM_INT32 => XdataValue::Int32(reader.read_rl()? as i32),
            other => {
                return Err(DwgError::new(
                    ErrorKind::Format,
                    format!("unknown EED item code: {other}"),
                )
                .with_offset(item_start))
            }
        };
        tokens.push(XdataToken { code, value });
    }
    trace!(app = app_name, tokens = tokens.len(), "decoded EED items");
    Ok(tokens)
}

// A leading 1001 token is skipped; the application is stored as a handle.
pub fn encode_eed_items(tokens: &[XdataToken], code_page: u16) -> Result<Vec<u8>> {
    let body = match tokens.first() {
        Some(first) if first.code == CODE_APP_NAME => &tokens[1..],
        _ => tokens,
    };
    let mut writer = ByteWriter::new();
    for (index, token) in body.iter().enumerate() {
        let item = token_item_code(token)?;
        writer.write_rc(item);
        match (&token.value, item) {
            (XdataValue::Text(text), ITEM_STRING) => {
                let bytes = encode_text(text, code_page, token.code)?;
                if bytes.len() > u8::MAX as usize {
                    return Err(DwgError::new(
                        ErrorKind::Format,
                        format!("EED string too long: {} bytes", bytes.len()),
                    )
                    .with_offset(index as u64)
                    .with_group_code(token.code));
                }
                writer.write_rc(bytes.len() as u8);
                writer.write_rs(code_page);
                writer.write_rcs(&bytes);
            }
            (XdataValue::Text(marker), ITEM_CONTROL) => match marker.as_str() {
                "{" => writer.write_rc(0),
                "}" => writer.write_rc(1),
                other => {
                    return Err(DwgError::new(
                        ErrorKind::Format,
                        format!("invalid control string: {other:?}"),
                    )
                    .with_offset(index as u64)
                    .with_group_code(token.code))
                }
            },
            (XdataValue::Handle(handle), _) => writer.write_rcs(&handle.to_be_bytes()),
            (XdataValue::Binary(bytes), _) => {
                if bytes.len() > u8::MAX as usize {
                    return Err(DwgError::new(
                        ErrorKind::Format,
                        format!("EED binary chunk too long: {} bytes", bytes.len()),
                    )
                    .with_offset(index as u64)
                    .with_group_code(token.code));
                }
                writer.write_rc(bytes.len() as u8);
                writer.write_rcs(bytes);
            }
            (XdataValue::Point(point), _) => writer.write_3rd(*point),
            (XdataValue::Real(value), _) => writer.write_rd(*value),
            (XdataValue::Int16(value), _) => writer.write_rs(*value as u16),
            (XdataValue::Int32(value), _) => writer.write_rl(*value as u32),
            (value, _) => {
                return Err(DwgError::new(
                    ErrorKind::Unsupported,
                    format!("{} payload cannot be stored as EED item", value.kind_name()),
                )
                .with_offset(index as u64)
                .with_group_code(token.code))
            }
        }
    }
    Ok(writer.into_bytes())
}

fn token_item_code(token: &XdataToken) -> Result<u8> {
    match token.code {
        CODE_APP_NAME => Err(DwgError::new(
            ErrorKind::Format,
            "application name may only lead the token stream",
        )
        .with_group_code(token.code)),
        1003 if !matches!(token.value, XdataValue::Handle(_)) => Err(DwgError::new(
            ErrorKind::Unsupported,
            "EED layer references must be handles",
        )
        .with_group_code(token.code)),
        1000 | 1002..=1005 | 1010..=1013 | 1020..=1023 | 1030..=1033 | 1040..=1042 | 1070
        | 1071 => Ok((token.code - 1000) as u8),
        code => Err(DwgError::new(
            ErrorKind::Unsupported,
            format!("group code {code} is not an xdata group code"),
        )
        .with_group_code(code)),
    }
}

fn read_raw_handle(reader: &mut ByteReader<'_>) -> Result<u64> {
    let bytes = reader.read_rcs(8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_be_bytes(raw))
}

fn code_page_encoding(code_page: u16) -> &'static Encoding {
    match code_page {
        28 => encoding_rs::WINDOWS_1250,
        29 => encoding_rs::WINDOWS_1251,
        31 => encoding_rs::WINDOWS_1253,
        32 => encoding_rs::WINDOWS_1254,
        33 => encoding_rs::WINDOWS_1255,
        34 => encoding_rs::WINDOWS_1256,
        35 => encoding_rs::WINDOWS_1257,
        36 => encoding_rs::WINDOWS_874,
        37 => encoding_rs::SHIFT_JIS,
        38 => encoding_rs::GBK,
        39 => encoding_rs::EUC_KR,
        40 => encoding_rs::BIG5,
        _ => encoding_rs::WINDOWS_1252,
    }
}

fn decode_text(bytes: &[u8], code_page: u16) -> String {
    let (text, _, _) = code_page_encoding(code_page).decode(bytes);
    text.into_owned()
}

fn encode_text(text: &str, code_page: u16, code: u16) -> Result<Vec<u8>> {
    let encoding = code_page_encoding(code_page);
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(DwgError::new(
            ErrorKind::Unsupported,
            format!("text {text:?} is not representable in {}", encoding.name()),
        )
        .with_group_code(code));
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode_eed_items, encode_eed_items, DEFAULT_CODE_PAGE};
    use crate::core::error::ErrorKind;
    use crate::xdata::token::{XdataToken, XdataValue};

    #[test]
    fn decodes_dstyle_item_bytes() {
        let mut data = vec![0x00, 0x06, 0x1E, 0x00];
        data.extend_from_slice(b"DSTYLE");
        data.extend_from_slice(&[0x02, 0x00]);
        data.extend_from_slice(&[70, 147, 0]);
        data.push(40);
        data.extend_from_slice(&0.09375f64.to_le_bytes());
        data.extend_from_slice(&[0x02, 0x01]);

        let tokens = decode_eed_items(&data, "ACAD").unwrap();
        assert_eq!(
            tokens,
            vec![
                XdataToken::app_name("ACAD"),
                XdataToken::string("DSTYLE"),
                XdataToken::control("{"),
                XdataToken::int16(147),
                XdataToken::real(0.09375),
                XdataToken::control("}"),
            ]
        );
    }

    #[test]
    fn decodes_code_page_text() {
        // "Ж" in windows-1251
        let data = [0x00, 0x01, 29, 0x00, 0xC6];
        let tokens = decode_eed_items(&data, "APP").unwrap();
        assert_eq!(tokens[1].as_text(), Some("Ж"));
    }

    #[test]
    fn encodes_back_to_identical_bytes() {
        let tokens = vec![
            XdataToken::app_name("ACAD"),
            XdataToken::string("DSTYLE"),
            XdataToken::control("{"),
            XdataToken::int16(77),
            XdataToken::int16(-2),
            XdataToken::new(1005, XdataValue::Handle(0x1F)).unwrap(),
            XdataToken::new(1010, XdataValue::Point((1.0, 2.0, 0.0))).unwrap(),
            XdataToken::new(1071, XdataValue::Int32(-70000)).unwrap(),
            XdataToken::new(1004, XdataValue::Binary(vec![0xDE, 0xAD])).unwrap(),
            XdataToken::control("}"),
        ];
        let bytes = encode_eed_items(&tokens, DEFAULT_CODE_PAGE).unwrap();
        assert_eq!(&bytes[..4], &[0x00, 0x06, 0x1E, 0x00]);
        let decoded = decode_eed_items(&bytes, "ACAD").unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn truncated_item_is_decode_error() {
        let data = [40, 0x00, 0x00];
        let err = decode_eed_items(&data, "ACAD").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert_eq!(err.offset, Some(1));
    }

    #[test]
    fn unknown_item_code_is_format_error() {
        let err = decode_eed_items(&[99], "ACAD").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
        assert_eq!(err.offset, Some(0));
    }

    #[test]
    fn rejects_app_name_inside_items() {
        let tokens = vec![XdataToken::string("X"), XdataToken::app_name("OTHER")];
        let err = encode_eed_items(&tokens, DEFAULT_CODE_PAGE).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    #[test]
    fn rejects_unrepresentable_text() {
        let tokens = vec![XdataToken::string("Ж")];
        let err = encode_eed_items(&tokens, DEFAULT_CODE_PAGE).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);
    }
}
