//! Minimal RFC 4180 CSV writer for the admin exports.

use std::borrow::Cow;

/// Quotes a field when it contains a comma, quote, CR or LF; quotes are doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Accumulates CSV rows terminated by CRLF
#[derive(Default)]
pub struct CsvWriter {
    out: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;

        for field in fields {
            if !first {
                self.out.push(',');
            }
            self.out.push_str(&escape_field(field.as_ref()));
            first = false;
        }

        self.out.push_str("\r\n");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, CsvWriter};

    #[test]
    fn leaves_plain_fields_unquoted() {
        assert_eq!(escape_field("Alice"), "Alice");
    }

    #[test]
    fn quotes_special_characters() {
        assert_eq!(escape_field("Lee, Ann"), "\"Lee, Ann\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn writes_crlf_terminated_rows() {
        let mut csv = CsvWriter::new();
        csv.write_row(["id", "name"]);
        csv.write_row(["1".to_string(), "Lee, Ann".to_string()]);

        assert_eq!(csv.finish(), "id,name\r\n1,\"Lee, Ann\"\r\n");
    }
}
