//! Parser for the station's comma/colon sample line format

use thiserror::Error;

/// Rejection of one raw sample line.
///
/// A single bad field fails the whole line; the caller drops the line and
/// keeps reading, so no partial update ever reaches the current conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    EmptyLine,

    #[error("field `{0}` is missing a `:` separator")]
    MissingSeparator(String),

    #[error("field `{0}` has more than one `:` separator")]
    ExtraSeparator(String),

    #[error("field `{0}` has an empty name or value")]
    EmptySegment(String),
}

/// Parse one raw serial line into name/value pairs.
///
/// The station emits `name1:value1,name2:value2,...` with arbitrary
/// whitespace noise (CR, LF, stray blanks) that is stripped wholesale
/// before splitting. Values stay raw strings here; classification happens
/// where they are applied.
pub fn parse_line(line: &str) -> Result<Vec<(String, String)>, ParseError> {
    let cleaned: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    let mut fields = Vec::new();
    for part in cleaned.split(',') {
        let mut segments = part.split(':');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(name), Some(value), None) => {
                if name.is_empty() || value.is_empty() {
                    return Err(ParseError::EmptySegment(part.to_string()));
                }
                fields.push((name.to_string(), value.to_string()));
            }
            (_, None, _) => return Err(ParseError::MissingSeparator(part.to_string())),
            _ => return Err(ParseError::ExtraSeparator(part.to_string())),
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_well_formed_line() {
        let fields = parse_line("tempf:72.5,humidity:44").unwrap();
        assert_eq!(
            fields,
            vec![
                ("tempf".to_string(), "72.5".to_string()),
                ("humidity".to_string(), "44".to_string()),
            ]
        );
    }

    #[test]
    fn test_strips_whitespace_everywhere() {
        let fields = parse_line(" temp f : 72.5 ,\thumidity:44\r\n").unwrap();
        assert_eq!(fields[0], ("tempf".to_string(), "72.5".to_string()));
        assert_eq!(fields[1], ("humidity".to_string(), "44".to_string()));
    }

    #[test]
    fn test_one_bad_field_rejects_whole_line() {
        let err = parse_line("tempf:72.5,bad").unwrap_err();
        assert_eq!(err, ParseError::MissingSeparator("bad".to_string()));
    }

    #[test]
    fn test_double_separator_rejected() {
        let err = parse_line("tempf:72:5").unwrap_err();
        assert_eq!(err, ParseError::ExtraSeparator("tempf:72:5".to_string()));
    }

    #[test]
    fn test_empty_segments_rejected() {
        assert_eq!(
            parse_line("tempf:"),
            Err(ParseError::EmptySegment("tempf:".to_string()))
        );
        assert_eq!(
            parse_line(":72.5"),
            Err(ParseError::EmptySegment(":72.5".to_string()))
        );
        // Trailing comma leaves an empty field behind.
        assert_eq!(
            parse_line("tempf:72.5,"),
            Err(ParseError::MissingSeparator(String::new()))
        );
    }

    #[test]
    fn test_blank_line_rejected() {
        assert_eq!(parse_line(""), Err(ParseError::EmptyLine));
        assert_eq!(parse_line("\r\n"), Err(ParseError::EmptyLine));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let fields = parse_line("soiltempf:55.1,rainin:12.3").unwrap();
        assert_eq!(fields[0].0, "soiltempf");
        assert_eq!(fields[1].0, "rainin");
    }
}
