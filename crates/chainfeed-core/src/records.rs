//! JSON-lines chunk parsing.
//!
//! A `json_stream` chunk is UTF-8 text holding zero or more records, one per
//! line. Blank lines (including the trailing newline) carry no record.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Non-empty lines of a chunk, paired with their 1-based line number.
fn record_lines(chunk: &[u8]) -> Result<impl Iterator<Item = (usize, &str)>, ClientError> {
    let text = std::str::from_utf8(chunk)?;
    Ok(text
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty()))
}

/// Parse a chunk line by line.
///
/// Records before the first malformed line are kept; the error is the last
/// item. Text that is not UTF-8 yields a single error.
pub fn parse_each<T: DeserializeOwned>(chunk: &[u8]) -> Vec<Result<T, ClientError>> {
    let lines = match record_lines(chunk) {
        Ok(lines) => lines,
        Err(e) => return vec![Err(e)],
    };

    let mut parsed = Vec::new();
    for (line, text) in lines {
        match serde_json::from_str(text) {
            Ok(record) => parsed.push(Ok(record)),
            Err(source) => {
                parsed.push(Err(ClientError::MalformedRecord { line, source }));
                break;
            }
        }
    }
    parsed
}

/// Parse every record in a chunk into a typed value.
///
/// Fails on the first malformed line.
pub fn parse_records<T: DeserializeOwned>(chunk: &[u8]) -> Result<Vec<T>, ClientError> {
    parse_each(chunk).into_iter().collect()
}

/// Parse every record in a chunk as an untyped JSON value.
pub fn parse_lines(chunk: &[u8]) -> Result<Vec<Value>, ClientError> {
    parse_records(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trailing_newline_is_skipped() {
        let chunk = b"{\"a\":1}\n{\"a\":2}\n";
        let values = parse_lines(chunk).unwrap();
        assert_eq!(values, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn blank_and_crlf_lines() {
        let chunk = b"\r\n{\"a\":1}\r\n\n   \n{\"a\":2}";
        assert_eq!(parse_lines(chunk).unwrap().len(), 2);
    }

    #[test]
    fn empty_chunk_has_no_records() {
        assert!(parse_lines(b"").unwrap().is_empty());
        assert!(parse_lines(b"\n\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_line_reports_position() {
        let chunk = b"{\"a\":1}\n\n{\"a\":\n";
        match parse_lines(chunk) {
            Err(ClientError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn records_before_a_bad_line_survive() {
        let items = parse_each::<Value>(b"{\"a\":1}\n{bad\n{\"a\":3}\n");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &json!({"a": 1}));
        assert!(matches!(items[1], Err(ClientError::MalformedRecord { line: 2, .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(matches!(
            parse_lines(&[0xff, 0xfe, b'\n']),
            Err(ClientError::InvalidText(_))
        ));
    }
}
