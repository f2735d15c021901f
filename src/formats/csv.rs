//! Support for the flat CSV exchange format.
//!
//! The first row is the header `Key,<lang_1>,<lang_2>,...`; every other row is
//! one dotted key followed by its value in each language. Empty cells mean the
//! language has no translation for that key.
//!
//! Files are written as UTF-8 with a byte-order mark so spreadsheet tools pick
//! the right encoding. Reading accepts UTF-8 with or without a BOM and
//! BOM-marked UTF-16.
use std::io::{BufRead, Read, Write};

use crate::{error::Error, table::TranslationTable, traits::Parser};

/// Title of the first header cell.
pub const KEY_HEADER: &str = "Key";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl Parser for TranslationTable {
    /// Parse a table from any reader.
    ///
    /// Only the languages named in the header are present in the result, in
    /// header order; columns with an empty header cell are ignored.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(reader)
            .read_to_string(&mut content)?;

        if let Some(line) = find_unterminated_quote(&content) {
            return Err(Error::malformed_row(line, "unterminated quoted field"));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut table = TranslationTable::empty();
        let mut columns: Vec<Option<String>> = Vec::new();
        let mut header_seen = false;

        for result in rdr.records() {
            let record = result.map_err(|e| {
                let line = e.position().map_or(0, |p| p.line());
                Error::malformed_row(line, e.to_string())
            })?;

            if !header_seen {
                header_seen = true;
                columns = record
                    .iter()
                    .skip(1)
                    .map(|cell| {
                        let language = cell.trim();
                        (!language.is_empty()).then(|| language.to_string())
                    })
                    .collect();
                for language in columns.iter().flatten() {
                    table.add_language(language.as_str());
                }
                let key_cell = record.get(0).unwrap_or_default();
                if table.languages().is_empty() && key_cell.contains([';', '\t']) {
                    return Err(Error::DataMismatch(
                        "the header names no language columns; is the file comma-separated?"
                            .to_string(),
                    ));
                }
                continue;
            }

            let Some(key) = record.get(0).filter(|key| !key.is_empty()) else {
                tracing::debug!(
                    line = record.position().map_or(0, |p| p.line()),
                    "skipping row without a key"
                );
                continue;
            };
            for (value, language) in record.iter().skip(1).zip(&columns) {
                match language {
                    Some(language) if !value.is_empty() => {
                        table.insert(key, language.as_str(), value);
                    }
                    _ => {}
                }
            }
        }

        Ok(table)
    }

    /// Write the table, BOM first, then the header and one row per key.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(UTF8_BOM)?;

        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(
            std::iter::once(KEY_HEADER).chain(self.languages().iter().map(String::as_str)),
        )?;
        for (key, cells) in self.rows() {
            wtr.write_record(
                std::iter::once(key).chain(cells.into_iter().map(|cell| cell.unwrap_or_default())),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Finds a quoted field that is never closed, returning the line it starts on.
///
/// The CSV decoder silently accepts such a field by running it to the end of
/// the input, which would swallow every following row.
fn find_unterminated_quote(content: &str) -> Option<u64> {
    let mut line = 1;
    let mut open_since = None;
    let mut at_field_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match open_since {
            Some(_) if c == '"' => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    open_since = None;
                }
            }
            Some(_) => {}
            None => {
                if at_field_start && c == '"' {
                    open_since = Some(line);
                }
                at_field_start = matches!(c, ',' | '\n' | '\r');
            }
        }
    }
    open_since
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use std::io::Cursor;

    fn write_to_string(table: &TranslationTable) -> String {
        let mut output = Vec::new();
        table.to_writer(&mut output).unwrap();
        assert!(output.starts_with(UTF8_BOM));
        String::from_utf8(output[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn test_write_header_and_sparse_rows() {
        let mut table = TranslationTable::new();
        table.insert("auth.failed", "en", "Failed");
        table.insert("auth.throttle", "en", "Slow down");
        table.insert("auth.throttle", "fr", "Doucement");

        assert_eq!(
            write_to_string(&table),
            "Key,en,nl,fr\nauth.failed,Failed,,\nauth.throttle,Slow down,,Doucement\n"
        );
    }

    #[test]
    fn test_write_quotes_special_values() {
        let mut table = TranslationTable::with_languages(["en"]);
        table.insert("k", "en", "Hello, \"world\"\nbye");
        assert_eq!(
            write_to_string(&table),
            "Key,en\nk,\"Hello, \"\"world\"\"\nbye\"\n"
        );
    }

    #[test]
    fn test_parse_header_and_rows() {
        let content = "Key,en,nl\nmessages.hello,Hello,Hallo\nmessages.bye,Bye,\n";
        let table = TranslationTable::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(table.languages(), ["en", "nl"]);
        assert_eq!(table.cell("messages.hello", "nl"), Some("Hallo"));
        assert_eq!(table.cell("messages.bye", "nl"), None);
        assert_eq!(table.translation_count("en"), 2);
    }

    #[test]
    fn test_parse_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Key,en\nk,Ünïcødé\n".as_bytes());
        let table = TranslationTable::from_bytes(&bytes).unwrap();
        assert_eq!(table.languages(), ["en"]);
        assert_eq!(table.cell("k", "en"), Some("Ünïcødé"));
    }

    #[test]
    fn test_parse_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Key,fr\nk,Très bien\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let table = TranslationTable::from_bytes(&bytes).unwrap();
        assert_eq!(table.cell("k", "fr"), Some("Très bien"));
    }

    #[test]
    fn test_parse_ignores_columns_with_empty_header() {
        let content = "Key,en,,fr\nk,Hello,ignored,Bonjour\n";
        let table = TranslationTable::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(table.languages(), ["en", "fr"]);
        assert_eq!(table.cell("k", "fr"), Some("Bonjour"));
        assert_eq!(table.translation_count("en"), 1);
    }

    #[test]
    fn test_parse_tolerates_short_rows() {
        let content = "Key,en,nl,fr\nk,Hello\nj,Hi,Hoi,Salut,extra\n";
        let table = TranslationTable::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(table.cell("k", "en"), Some("Hello"));
        assert_eq!(table.cell("k", "nl"), None);
        assert_eq!(table.cell("j", "fr"), Some("Salut"));
    }

    #[test]
    fn test_parse_quoted_multiline_value() {
        let content = "Key,en\nk,\"Line 1\nLine \"\"2\"\"\"\n";
        let table = TranslationTable::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(table.cell("k", "en"), Some("Line 1\nLine \"2\""));
    }

    #[test]
    fn test_parse_unterminated_quote_is_malformed() {
        let content = "Key,en\nk,Fine\nj,\"never closed\nl,More\n";
        let err = TranslationTable::from_reader(Cursor::new(content)).unwrap_err();
        assert!(err.is_malformed_row());
        assert_eq!(
            err.to_string(),
            "malformed row at line 3: unterminated quoted field"
        );
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let content = "Key,en\nk,5\" screen\n";
        let table = TranslationTable::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(table.cell("k", "en"), Some("5\" screen"));
    }

    #[test]
    fn test_semicolon_separated_file_is_rejected() {
        let content = "Key;en;nl\nauth.failed;Failed;Mislukt\n";
        let err = TranslationTable::from_reader(Cursor::new(content)).unwrap_err();
        assert!(matches!(err, Error::DataMismatch(_)));
    }

    #[test]
    fn test_header_without_languages_is_accepted() {
        let table = TranslationTable::with_languages(Vec::<String>::new());
        let mut output = Vec::new();
        table.to_writer(&mut output).unwrap();

        let parsed = TranslationTable::from_bytes(&output).unwrap();
        assert!(parsed.languages().is_empty());
        assert_eq!(parsed.key_count(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_device_is_a_write_failure() {
        let mut small = TranslationTable::new();
        small.insert("auth.failed", "en", "Failed");
        let mut big = TranslationTable::new();
        for i in 0..2000 {
            big.insert(format!("messages.line_{i}"), "en", "Some translated text");
        }

        for table in [&small, &big] {
            let err = table.write_to("/dev/full").unwrap_err();
            assert!(
                matches!(&err, Error::WriteFailure { path, .. } if path.as_os_str() == "/dev/full"),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = TranslationTable::from_reader(Cursor::new("")).unwrap();
        assert!(table.languages().is_empty());
        assert_eq!(table.key_count(), 0);
    }

    #[test]
    fn test_write_then_parse_keeps_values() {
        let mut table = TranslationTable::new();
        table.insert("vendor.acme.pkg.messages.greeting", "en", "hi");
        table.insert("messages.quote", "nl", "Zeg \"hoi\", \nmet komma");
        table.insert("messages.quote", "de", "Sag hallo");

        let mut output = Vec::new();
        table.to_writer(&mut output).unwrap();
        let parsed = TranslationTable::from_bytes(&output).unwrap();

        assert_eq!(parsed.languages(), ["en", "nl", "fr", "de"]);
        for key in table.keys() {
            for language in table.languages() {
                assert_eq!(parsed.cell(key, language), table.cell(key, language));
            }
        }
    }
}
