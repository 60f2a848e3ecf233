//! CSV record source.
//!
//! `RecordSource` opens the input file, consumes the header row and then
//! yields one `CustomerRecord` per data row, in file order. The sequence is
//! lazy and cannot be restarted. It ends at end of file, or at the first row
//! the CSV reader rejects; `MalformedRows` decides whether that row ends the
//! sequence quietly or surfaces as an error.

mod producer;

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use log::{debug, warn};

use crate::config::{MalformedRows, FIELD_COUNT};
use crate::error_handling::SourceError;
use crate::models::CustomerRecord;

pub use producer::spawn_producer;

/// Lazy, finite sequence of records read from a CSV file.
pub struct RecordSource {
    path: PathBuf,
    reader: Reader<File>,
    row: StringRecord,
    malformed: MalformedRows,
    rows_read: u64,
    finished: bool,
}

impl RecordSource {
    /// Opens `path` and reads past the header row.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Open` if the file cannot be opened,
    /// `SourceError::Header` if the header row cannot be read and
    /// `SourceError::MissingHeader` if the file is empty.
    pub fn open(path: &Path, malformed: MalformedRows) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Strict arity: every row must have as many fields as the header.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(file);

        let mut header = StringRecord::new();
        let has_header = reader
            .read_record(&mut header)
            .map_err(|source| SourceError::Header {
                path: path.to_path_buf(),
                source,
            })?;
        if !has_header {
            return Err(SourceError::MissingHeader {
                path: path.to_path_buf(),
            });
        }
        debug!("Skipped header of {}: {:?}", path.display(), header);

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            row: StringRecord::new(),
            malformed,
            rows_read: 0,
            finished: false,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows successfully read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` once the sequence has ended. After an error or the
    /// end of the sequence, further calls keep returning `Ok(None)`.
    pub fn next_record(&mut self) -> Result<Option<CustomerRecord>, SourceError> {
        if self.finished {
            return Ok(None);
        }
        let row_number = self.rows_read + 1;

        let reason = match self.reader.read_record(&mut self.row) {
            Ok(false) => {
                self.finished = true;
                return Ok(None);
            }
            Ok(true) => match CustomerRecord::from_row(&self.row) {
                Some(record) => {
                    self.rows_read = row_number;
                    return Ok(Some(record));
                }
                None => format!("expected {} fields, found {}", FIELD_COUNT, self.row.len()),
            },
            Err(e) => e.to_string(),
        };

        self.finished = true;
        match self.malformed {
            MalformedRows::Stop => {
                warn!(
                    "Stopped reading {} at malformed row {}: {}",
                    self.path.display(),
                    row_number,
                    reason
                );
                Ok(None)
            }
            MalformedRows::Fail => Err(SourceError::MalformedRow {
                row: row_number,
                reason,
            }),
        }
    }
}

impl Iterator for RecordSource {
    type Item = Result<CustomerRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Counts the data rows `RecordSource` would yield for `path`.
///
/// Counting stops at the first malformed row, like `MalformedRows::Stop`.
/// Used to size a queue that holds the whole input.
pub fn count_data_rows(path: &Path) -> Result<u64, SourceError> {
    let mut source = RecordSource::open(path, MalformedRows::Stop)?;
    while source.next_record()?.is_some() {}
    Ok(source.rows_read())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Customer Id,Name,Email,Company,City,Country,Birthday\n";

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_yields_rows_in_file_order_after_header() {
        let file = csv_file(&format!(
            "{HEADER}1,Alice,a@x.com,Acme,NYC,US,1990-01-01\n2,Bob,b@x.com,Acme,LA,US,1985-05-05\n"
        ));
        let source =
            RecordSource::open(file.path(), MalformedRows::Fail).expect("Failed to open source");
        let ids: Vec<String> = source
            .map(|r| r.expect("row should parse").id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_quoted_fields_pass_through_verbatim() {
        let file = csv_file(&format!(
            "{HEADER}9,\"Smith, Jane\",j@x.com,\"Acme, Inc.\",Paris,FR,2001-02-03\n"
        ));
        let mut source =
            RecordSource::open(file.path(), MalformedRows::Fail).expect("Failed to open source");
        let record = source
            .next_record()
            .expect("row should parse")
            .expect("one row");
        assert_eq!(record.name, "Smith, Jane");
        assert_eq!(record.company, "Acme, Inc.");
        assert!(source.next_record().expect("clean end").is_none());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = RecordSource::open(&dir.path().join("nope.csv"), MalformedRows::Stop);
        assert!(matches!(result, Err(SourceError::Open { .. })));
    }

    #[test]
    fn test_empty_file_is_missing_header() {
        let file = csv_file("");
        let result = RecordSource::open(file.path(), MalformedRows::Stop);
        assert!(matches!(result, Err(SourceError::MissingHeader { .. })));
    }

    #[test]
    fn test_header_only_file_yields_nothing() {
        let file = csv_file(HEADER);
        let mut source =
            RecordSource::open(file.path(), MalformedRows::Fail).expect("Failed to open source");
        assert!(source.next_record().expect("clean end").is_none());
        assert_eq!(source.rows_read(), 0);
    }

    #[test]
    fn test_malformed_row_stops_quietly() {
        let file = csv_file(&format!(
            "{HEADER}1,Alice,a@x.com,Acme,NYC,US,1990-01-01\n2,Bob,b@x.com\n3,Cara,c@x.com,Acme,SF,US,2000-12-31\n"
        ));
        let source =
            RecordSource::open(file.path(), MalformedRows::Stop).expect("Failed to open source");
        let records: Vec<_> = source.collect::<Result<_, _>>().expect("stop mode never errors");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_malformed_row_fails_with_row_number() {
        let file = csv_file(&format!(
            "{HEADER}1,Alice,a@x.com,Acme,NYC,US,1990-01-01\n2,Bob,b@x.com\n"
        ));
        let mut source =
            RecordSource::open(file.path(), MalformedRows::Fail).expect("Failed to open source");
        assert!(source.next_record().expect("first row parses").is_some());
        match source.next_record() {
            Err(SourceError::MalformedRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected malformed row error, got {other:?}"),
        }
        // The sequence is over after the error.
        assert!(source.next_record().expect("finished").is_none());
    }

    #[test]
    fn test_rows_matching_a_short_header_are_still_rejected() {
        let file = csv_file("a,b,c\n1,2,3\n");
        let mut source =
            RecordSource::open(file.path(), MalformedRows::Fail).expect("Failed to open source");
        assert!(matches!(
            source.next_record(),
            Err(SourceError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_count_data_rows() {
        let mut contents = HEADER.to_string();
        for i in 0..25 {
            contents.push_str(&format!("{i},N{i},e{i}@x.com,C,City,CC,2000-01-01\n"));
        }
        let file = csv_file(&contents);
        assert_eq!(count_data_rows(file.path()).expect("count"), 25);
    }
}
