use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::{Path, PathBuf},
};

use crate::error::SourceError;
use crate::readers::{Cell, RawRow, ensure_exists};

/// Order number, code, hierarchy level, short and long description.
const ORDER_FILE_FIELDS: usize = 5;

/// Forward-only reader over an ICD-10-CM order file.
///
/// Every non-blank line is split into at most five whitespace-delimited fields,
/// the last one keeping the rest of the line. Lines with fewer than five
/// fields are skipped and counted.
pub struct OrderFileReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    lines_read: usize,
    short_lines: usize,
}

impl OrderFileReader {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        ensure_exists(path)?;
        let file = File::open(path).map_err(|err| SourceError::io(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            lines_read: 0,
            short_lines: 0,
        })
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn short_lines(&self) -> usize {
        self.short_lines
    }
}

impl Iterator for OrderFileReader {
    type Item = Result<RawRow, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    return Some(Err(SourceError::format(
                        &self.path,
                        format!("line {} is not valid UTF-8", self.lines_read + 1),
                    )));
                }
                Err(err) => return Some(Err(SourceError::io(&self.path, err))),
            };
            self.lines_read += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields = split_fields(line, ORDER_FILE_FIELDS);
            if fields.len() < ORDER_FILE_FIELDS {
                self.short_lines += 1;
                continue;
            }
            let cells = fields.into_iter().map(Cell::text).collect();
            return Some(Ok(RawRow::new(cells)));
        }
    }
}

/// Splits on runs of whitespace into at most `max_fields` pieces; the final
/// piece is the untouched remainder of the line.
pub fn split_fields(line: &str, max_fields: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max_fields);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if fields.len() + 1 == max_fields {
            fields.push(rest.trim_end());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn remainder_keeps_inner_whitespace() {
        let fields = split_fields(
            "00001 A00     0 Cholera                  Cholera due to Vibrio",
            5,
        );
        assert_eq!(
            fields,
            vec!["00001", "A00", "0", "Cholera", "Cholera due to Vibrio"]
        );
    }

    #[test]
    fn short_line_yields_fewer_fields() {
        assert_eq!(split_fields("00002 A001 1", 5), vec!["00002", "A001", "1"]);
        assert!(split_fields("   ", 5).is_empty());
    }

    #[test]
    fn reader_skips_blank_and_short_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "00001 A00     0 Cholera                  Cholera").expect("write");
        writeln!(file).expect("write");
        writeln!(file, "00002 A001 1").expect("write");
        file.flush().expect("flush");

        let mut reader = OrderFileReader::open(file.path()).expect("open");
        let rows: Vec<RawRow> = reader.by_ref().map(|r| r.expect("row")).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(1), &Cell::text("A00"));
        assert_eq!(reader.lines_read(), 3);
        assert_eq!(reader.short_lines(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = OrderFileReader::open(Path::new("/nonexistent/icd10cm_order.txt"))
            .err()
            .expect("missing file should fail");
        assert!(err.is_missing());
    }
}
