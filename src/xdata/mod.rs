pub mod eed;
pub mod token;

pub use eed::{decode_eed_items, encode_eed_items, DEFAULT_CODE_PAGE};
pub use token::{XdataToken, XdataValue};

use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;
use token::CODE_APP_NAME;

pub fn split_applications(tokens: &[XdataToken]) -> Result<Vec<(&str, &[XdataToken])>> {
    if let Some(first) = tokens.first() {
        if first.code != CODE_APP_NAME {
            return Err(DwgError::new(
                ErrorKind::MalformedSequence,
                "xdata does not start with an application name",
            )
            .with_offset(0)
            .with_group_code(first.code));
        }
    }
    let starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.code == CODE_APP_NAME)
        .map(|(index, _)| index)
        .collect();
    Ok(starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(tokens.len());
            let name = tokens[start].as_text().unwrap_or_default();
            (name, &tokens[start..end])
        })
        .collect())
}

pub fn find_application<'a>(
    tokens: &'a [XdataToken],
    app_name: &str,
) -> Result<Option<&'a [XdataToken]>> {
    Ok(split_applications(tokens)?
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(app_name))
        .map(|(_, slice)| slice))
}

#[cfg(test)]
mod tests {
    use super::{find_application, split_applications, XdataToken};
    use crate::core::error::ErrorKind;

    fn mixed_stream() -> Vec<XdataToken> {
        vec![
            XdataToken::app_name("MYAPP"),
            XdataToken::string("payload"),
            XdataToken::app_name("ACAD"),
            XdataToken::string("DSTYLE"),
            XdataToken::control("{"),
            XdataToken::control("}"),
        ]
    }

    #[test]
    fn splits_per_application() {
        let tokens = mixed_stream();
        let apps = split_applications(&tokens).unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].0, "MYAPP");
        assert_eq!(apps[0].1.len(), 2);
        assert_eq!(apps[1].0, "ACAD");
        assert_eq!(apps[1].1.len(), 4);
    }

    #[test]
    fn finds_application_case_insensitively() {
        let tokens = mixed_stream();
        let acad = find_application(&tokens, "acad").unwrap().unwrap();
        assert_eq!(acad[1], XdataToken::string("DSTYLE"));
        assert!(find_application(&tokens, "OTHER").unwrap().is_none());
    }

    #[test]
    fn tokens_before_first_application_are_rejected() {
        let mut tokens = vec![XdataToken::string("orphan")];
        tokens.extend(mixed_stream());
        let err = split_applications(&tokens).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedSequence);
        assert_eq!(err.offset, Some(0));
        assert_eq!(err.group_code, Some(1000));
        assert!(find_application(&tokens, "ACAD").is_err());
        assert!(split_applications(&[]).unwrap().is_empty());
    }
}
