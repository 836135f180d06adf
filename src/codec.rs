//! Line-oriented record streams
//!
//! Records travel one per line in one of two [`RecordFormat`]s:
//!
//! - `Text`: `<weight>\t<name>`. The name is everything after the first tab
//!   and may be empty; a line without a tab is an unnamed record. Blank lines
//!   and `#` comments are skipped.
//! - `JsonLines`: one `{"name": .., "weight": ..}` object per line.
//!
//! [`RecordReader`] decodes lazily, so a stream of any length can be fed to the
//! top-K selector without being held in memory.
//!
//! ```rust
//! use std::io::Cursor;
//! use rust_heap_topk::codec::{RecordFormat, RecordReader};
//!
//! let input = Cursor::new("1\tA\n# comment\n2.5\tB\n");
//! let records: Vec<_> = RecordReader::new(input, RecordFormat::Text)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].name(), "B");
//! ```

use std::borrow::Borrow;
use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

/// Wire format of a record stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    /// Tab-separated `<weight>\t<name>` lines
    #[default]
    Text,
    /// One JSON object per line
    JsonLines,
}

/// Errors raised while decoding or encoding a record stream
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying reader or writer failed
    #[error("failed to read record stream: {0}")]
    Io(#[from] io::Error),
    /// A text line's weight field is not a number
    #[error("line {line}: invalid weight {value:?}")]
    InvalidWeight { line: usize, value: String },
    /// An input line is not a valid JSON record
    #[error("line {line}: malformed JSON record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// The record at 1-based position `record` could not be serialized
    #[error("record {record}: failed to encode as JSON: {source}")]
    Encode {
        record: usize,
        #[source]
        source: serde_json::Error,
    },
    /// A name containing a line break cannot be written as text
    #[error("record name {0:?} cannot be written as a single text line")]
    UnencodableName(String),
}

/// Lazily decodes records from a buffered reader
///
/// Yields `Err` for the first undecodable line and stops after an I/O error.
pub struct RecordReader<R> {
    reader: R,
    format: RecordFormat,
    line: usize,
    buf: String,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Wraps `reader`, decoding lines as `format`
    pub fn new(reader: R, format: RecordFormat) -> Self {
        Self {
            reader,
            format,
            line: 0,
            buf: String::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }

    fn decode(&self, text: &str) -> Option<Result<Record, CodecError>> {
        let trimmed = text.trim();
        match self.format {
            RecordFormat::Text => {
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return None;
                }
                Some(parse_text_line(text, self.line))
            }
            RecordFormat::JsonLines => {
                if trimmed.is_empty() {
                    return None;
                }
                Some(serde_json::from_str(trimmed).map_err(|source| CodecError::Json {
                    line: self.line,
                    source,
                }))
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let text = self.buf.trim_end_matches(&['\r', '\n'][..]);
                    if let Some(decoded) = self.decode(text) {
                        return Some(decoded);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(CodecError::Io(e)));
                }
            }
        }
        None
    }
}

fn parse_text_line(text: &str, line: usize) -> Result<Record, CodecError> {
    let (weight, name) = text.split_once('\t').unwrap_or((text, ""));
    let weight = weight.trim();
    weight
        .parse::<f64>()
        .map(|w| Record::new(name, w))
        .map_err(|_| CodecError::InvalidWeight {
            line,
            value: weight.to_string(),
        })
}

/// Encode `records` to `writer`, one per line
///
/// Returns the number of records written. Non-finite weights are written in
/// a form the reader accepts for both formats.
pub fn write_records<W, I>(mut writer: W, records: I, format: RecordFormat) -> Result<usize, CodecError>
where
    W: Write,
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    let mut written = 0;
    for record in records {
        let record = record.borrow();
        match format {
            RecordFormat::Text => {
                if record.name().contains(&['\n', '\r'][..]) {
                    return Err(CodecError::UnencodableName(record.name().to_string()));
                }
                writeln!(writer, "{}\t{}", record.weight(), record.name())?;
            }
            RecordFormat::JsonLines => {
                serde_json::to_writer(&mut writer, record).map_err(|source| CodecError::Encode {
                    record: written + 1,
                    source,
                })?;
                writer.write_all(b"\n")?;
            }
        }
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn read_all(input: &str, format: RecordFormat) -> Vec<Result<Record, CodecError>> {
        RecordReader::new(Cursor::new(input.to_string()), format).collect()
    }

    #[test]
    fn test_text_lines() {
        let records: Vec<Record> = read_all("4\tA\n-2.5\tsecond name\n\n7\n", RecordFormat::Text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            records,
            [
                Record::new("A", 4.0),
                Record::new("second name", -2.5),
                Record::unnamed(7.0),
            ]
        );
    }

    #[test]
    fn test_text_keeps_empty_and_tabbed_names() {
        let records: Vec<Record> = read_all("1\t\n2\ta\tb\r\n", RecordFormat::Text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records[0].name(), "");
        assert_eq!(records[1].name(), "a\tb");
    }

    #[test]
    fn test_text_skips_comments() {
        let records = read_all("# header\n  # indented\n3\tx\n", RecordFormat::Text);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_invalid_weight_reports_line() {
        let results = read_all("1\tok\n\nabc\tbad\n", RecordFormat::Text);
        match &results[1] {
            Err(CodecError::InvalidWeight { line, value }) => {
                assert_eq!(*line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("expected invalid weight, got {:?}", other),
        }
    }

    #[test]
    fn test_json_lines() {
        let input = "{\"name\":\"A\",\"weight\":1}\n\n{\"name\":\"\",\"weight\":-3.5}\n";
        let records: Vec<Record> = read_all(input, RecordFormat::JsonLines)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records, [Record::new("A", 1.0), Record::unnamed(-3.5)]);
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let results = read_all("{\"name\":\"A\",\"weight\":1}\n{\"name\":\n", RecordFormat::JsonLines);
        assert!(matches!(results[1], Err(CodecError::Json { line: 2, .. })));
    }

    #[test]
    fn test_write_then_read_text() {
        let records = vec![
            Record::new("A", 1.0),
            Record::new("", -4.25),
            Record::new("with space", 1e9),
        ];
        let mut out = Vec::new();
        assert_eq!(write_records(&mut out, &records, RecordFormat::Text).unwrap(), 3);
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "1\tA\n-4.25\t\n1000000000\twith space\n");

        let decoded: Vec<Record> = RecordReader::new(BufReader::new(&out[..]), RecordFormat::Text)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_write_json_lines() {
        let mut out = Vec::new();
        write_records(&mut out, [Record::new("A", 2.5)], RecordFormat::JsonLines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"name\":\"A\",\"weight\":2.5}\n");
    }

    #[test]
    fn test_non_finite_weights_round_trip() {
        let records = vec![
            Record::new("nan", f64::NAN),
            Record::new("inf", f64::INFINITY),
            Record::new("-inf", f64::NEG_INFINITY),
        ];
        for format in [RecordFormat::Text, RecordFormat::JsonLines] {
            let mut out = Vec::new();
            assert_eq!(write_records(&mut out, &records, format).unwrap(), 3);

            let decoded: Vec<Record> = RecordReader::new(BufReader::new(&out[..]), format)
                .collect::<Result<_, _>>()
                .unwrap();
            assert!(decoded[0].weight().is_nan(), "{:?}", format);
            assert_eq!(decoded, records, "{:?}", format);
        }
    }

    #[test]
    fn test_json_lines_non_finite_encoding() {
        let mut out = Vec::new();
        write_records(&mut out, [Record::new("n", f64::NAN)], RecordFormat::JsonLines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"name\":\"n\",\"weight\":\"NaN\"}\n");
    }

    #[test]
    fn test_text_rejects_multiline_name() {
        let err = write_records(Vec::new(), [Record::new("two\nlines", 1.0)], RecordFormat::Text)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnencodableName(_)));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    /// Accepts `budget` bytes, then fails every write
    struct ShortWriter {
        budget: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_write_failure_names_record() {
        let records = [Record::new("A", 1.0), Record::new("B", 2.0)];
        let mut first = Vec::new();
        write_records(&mut first, &records[..1], RecordFormat::JsonLines).unwrap();

        let writer = ShortWriter { budget: first.len() };
        let err = write_records(writer, &records, RecordFormat::JsonLines).unwrap_err();
        assert!(matches!(err, CodecError::Encode { record: 2, .. }), "{:?}", err);
        assert!(err.to_string().starts_with("record 2: "));
    }

    #[test]
    fn test_io_error_ends_stream() {
        let mut reader = RecordReader::new(BufReader::new(FailingReader), RecordFormat::Text);
        assert!(matches!(reader.next(), Some(Err(CodecError::Io(_)))));
        assert!(reader.next().is_none());
    }
}
