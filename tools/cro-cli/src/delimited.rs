//! Delimited text output (CSV by default)

use std::io::{self, Write};

/// Writes rows of text fields separated by a single-character delimiter.
///
/// Fields containing the delimiter, a double quote, or a line break are
/// quoted, with embedded quotes doubled. Lines end with `\n`.
pub struct DelimitedWriter<W: Write> {
    out: W,
    delimiter: char,
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(out: W, delimiter: char) -> Self {
        Self { out, delimiter }
    }

    pub fn write_row<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        let mut line = String::new();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            self.push_field(&mut line, field);
        }
        line.push('\n');
        self.out.write_all(line.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn push_field(&self, line: &mut String, field: &str) {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r');
        if needs_quotes {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(delimiter: char, rows: &[&[&str]]) -> String {
        let mut buf = Vec::new();
        let mut writer = DelimitedWriter::new(&mut buf, delimiter);
        for row in rows {
            writer.write_row(row.iter().copied()).unwrap();
        }
        writer.flush().unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_rows() {
        assert_eq!(
            render(',', &[&["ID", "NAME"], &["0001", "ALICE"]]),
            "ID,NAME\n0001,ALICE\n"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(
            render(',', &[&["a,b", "say \"hi\"", "plain"]]),
            "\"a,b\",\"say \"\"hi\"\"\",plain\n"
        );
        assert_eq!(render(';', &[&["a,b", "c;d"]]), "a,b;\"c;d\"\n");
    }

    #[test]
    fn test_cyrillic_passthrough() {
        assert_eq!(render(',', &[&["Иванов", ""]]), "Иванов,\n");
    }
}
