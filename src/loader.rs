//! Preference table loading and index normalization.
//!
//! ## File Format
//!
//! Four headerless CSV files, rows may be ragged:
//!
//! | File | Rows | Cells |
//! |------|------|-------|
//! | proposer preferences | one per proposer | receiver ids, best first |
//! | receiver preferences | one per receiver | acceptable proposer ids, best first |
//! | receiver unacceptable | one per receiver | unacceptable proposer ids |
//! | capacities | any | one positive capacity per receiver, row-major |
//!
//! Empty cells are the sentinel. With [`IndexBase::One`] (the default, and
//! the format the sample data uses) ids start at 1 and `0` is the sentinel;
//! with [`IndexBase::Zero`] ids start at 0 and `-1` is the sentinel.
//! A blank line is an empty row. In the capacity file an empty cell before
//! a value reads as `0`.
//!
//! Loading only parses and normalizes. Dimension and content checks are the
//! engine's job (`PreferenceData::validate`).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::LoadError;
use crate::market::{PreferenceData, END_OF_LIST};

/// Index base of ids in the source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// Ids start at 0; `-1` ends a row
    Zero,
    /// Ids start at 1; `0` ends a row
    #[default]
    One,
}

impl IndexBase {
    /// Convert one source id to the engine's 0-based encoding
    #[inline]
    pub fn normalize(self, value: i64) -> i64 {
        match self {
            IndexBase::Zero => value,
            IndexBase::One => value - 1,
        }
    }

    /// Normalize every id in a table
    pub fn normalize_table(self, table: &[Vec<i64>]) -> Vec<Vec<i64>> {
        table
            .iter()
            .map(|row| row.iter().map(|&value| self.normalize(value)).collect())
            .collect()
    }
}

/// Paths of the four input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub proposer_preferences: PathBuf,
    pub receiver_preferences: PathBuf,
    pub receiver_unacceptable: PathBuf,
    pub capacities: PathBuf,
}

/// Read all four tables from disk and normalize them.
pub fn load_files(files: &DataFiles, base: IndexBase) -> Result<PreferenceData, LoadError> {
    let data = PreferenceData::new(
        read_id_table(open(&files.proposer_preferences)?, &files.proposer_preferences, base)?,
        read_id_table(open(&files.receiver_preferences)?, &files.receiver_preferences, base)?,
        read_id_table(open(&files.receiver_unacceptable)?, &files.receiver_unacceptable, base)?,
        read_capacities(open(&files.capacities)?, &files.capacities)?,
    );

    debug!(
        proposers = data.proposer_count(),
        receivers = data.receiver_count(),
        capacities = data.capacities.len(),
        ?base,
        "preference tables loaded"
    );
    Ok(data)
}

/// Parse an id table; `path` is only used in error messages.
pub fn read_id_table<R: io::Read>(
    reader: R,
    path: &Path,
    base: IndexBase,
) -> Result<Vec<Vec<i64>>, LoadError> {
    let rows = read_cells(reader, path)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.map_or(END_OF_LIST, |value| base.normalize(value)))
                .collect()
        })
        .collect())
}

/// Parse a capacity table: one capacity per cell, row-major.
///
/// Trailing empty cells of a row are dropped. An empty cell followed by a
/// value keeps its position and reads as `0`, which validation rejects.
pub fn read_capacities<R: io::Read>(reader: R, path: &Path) -> Result<Vec<i64>, LoadError> {
    let mut capacities = Vec::new();
    for mut row in read_cells(reader, path)? {
        while row.last() == Some(&None) {
            row.pop();
        }
        capacities.extend(row.into_iter().map(|cell| cell.unwrap_or(0)));
    }

    if capacities.is_empty() {
        return Err(LoadError::MissingCapacities {
            path: path.to_path_buf(),
        });
    }
    Ok(capacities)
}

/// The built-in eight-proposer, three-receiver sample market, normalized.
///
/// Expected outcome: `R0 -> [P0, P1]`, `R1 -> [P2, P6, P4]`,
/// `R2 -> [P5, P3]`, with `P7` unmatched.
pub fn embedded_sample() -> PreferenceData {
    let proposers = vec![
        vec![1, 2, 3],
        vec![1, 3, 2],
        vec![3, 1, 2],
        vec![1, 3, 2],
        vec![2, 3, 1],
        vec![3, 1, 2],
        vec![2, 1, 3],
        vec![2, 0, 0],
    ];
    let receivers = vec![
        vec![1, 2, 3, 4, 5, 6, 7, 0],
        vec![1, 3, 4, 7, 5, 6, 2, 0],
        vec![1, 6, 4, 7, 5, 2, 0, 0],
    ];
    let unacceptable = vec![
        vec![0, 0, 0, 0, 0, 0, 0, 0],
        vec![8, 0, 0, 0, 0, 0, 0, 0],
        vec![3, 0, 0, 0, 0, 0, 0, 0],
    ];

    let base = IndexBase::One;
    PreferenceData::new(
        base.normalize_table(&proposers),
        base.normalize_table(&receivers),
        base.normalize_table(&unacceptable),
        vec![2, 3, 3],
    )
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|err| LoadError::Csv {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })
}

/// Raw cells of a headerless, possibly ragged CSV; `None` for empty cells.
///
/// A blank line between records is an empty row, so row indices always
/// match line numbers. Blank lines after the last record are dropped.
fn read_cells<R: io::Read>(reader: R, path: &Path) -> Result<Vec<Vec<Option<i64>>>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut next_line = 1;
    for record in csv_reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        // The reader skips blank lines; put them back as empty rows
        let line = record.position().map_or(next_line, |position| position.line());
        while next_line < line {
            rows.push(Vec::new());
            next_line += 1;
        }
        next_line = line + 1;

        let row = rows.len();

        let mut cells = Vec::with_capacity(record.len());
        for (column, field) in record.iter().enumerate() {
            if field.is_empty() {
                cells.push(None);
                continue;
            }
            let value = field.parse::<i64>().map_err(|_| LoadError::InvalidCell {
                path: path.to_path_buf(),
                row,
                column,
                value: field.to_string(),
            })?;
            cells.push(Some(value));
        }
        rows.push(cells);
    }

    Ok(rows)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("test.csv")
    }

    #[test]
    fn test_normalize_one_based() {
        assert_eq!(IndexBase::One.normalize(1), 0);
        assert_eq!(IndexBase::One.normalize(0), END_OF_LIST);
        assert_eq!(IndexBase::Zero.normalize(0), 0);
        assert_eq!(IndexBase::Zero.normalize(-1), END_OF_LIST);
    }

    #[test]
    fn test_read_id_table_one_based() {
        let csv = "2,1,3\n3,0,0\n";
        let table = read_id_table(csv.as_bytes(), &path(), IndexBase::One).unwrap();

        assert_eq!(table, vec![vec![1, 0, 2], vec![2, -1, -1]]);
    }

    #[test]
    fn test_read_id_table_ragged_and_blank_cells() {
        let csv = "1, 2\n\n3,,\n";
        let table = read_id_table(csv.as_bytes(), &path(), IndexBase::Zero).unwrap();

        // Blank lines are empty rows, blank cells become the sentinel
        assert_eq!(table, vec![vec![1, 2], vec![], vec![3, -1, -1]]);
    }

    #[test]
    fn test_blank_line_keeps_row_positions() {
        let csv = "1,2\n\n2,1\n";
        let table = read_id_table(csv.as_bytes(), &path(), IndexBase::One).unwrap();

        assert_eq!(table, vec![vec![0, 1], vec![], vec![1, 0]]);
    }

    #[test]
    fn test_invalid_cell_row_counts_blank_lines() {
        let csv = "1\n\n\nx\n";
        let err = read_id_table(csv.as_bytes(), &path(), IndexBase::One).unwrap_err();

        assert!(matches!(err, LoadError::InvalidCell { row: 3, column: 0, .. }));
    }

    #[test]
    fn test_read_id_table_invalid_cell() {
        let csv = "1,x\n";
        let err = read_id_table(csv.as_bytes(), &path(), IndexBase::One).unwrap_err();

        match err {
            LoadError::InvalidCell { row, column, value, .. } => {
                assert_eq!((row, column), (0, 1));
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_capacities() {
        let capacities = read_capacities("2,3,\n3\n".as_bytes(), &path()).unwrap();
        assert_eq!(capacities, vec![2, 3, 3]);

        let err = read_capacities("".as_bytes(), &path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingCapacities { .. }));
    }

    #[test]
    fn test_blank_capacity_keeps_position() {
        let capacities = read_capacities("2,,3\n".as_bytes(), &path()).unwrap();
        assert_eq!(capacities, vec![2, 0, 3]);

        let data = PreferenceData::new(
            vec![vec![0], vec![1], vec![2]],
            vec![vec![0], vec![1], vec![2]],
            vec![vec![], vec![], vec![]],
            capacities,
        );
        assert_eq!(
            data.validate(3, 3),
            Err(crate::error::MatchError::NonPositiveCapacity {
                receiver: crate::types::ReceiverId(1),
                capacity: 0,
            })
        );
    }

    #[test]
    fn test_embedded_sample_shape() {
        let data = embedded_sample();

        assert_eq!(data.proposer_count(), 8);
        assert_eq!(data.receiver_count(), 3);
        assert_eq!(data.proposer_preferences[7], vec![1, -1, -1]);
        assert_eq!(data.receiver_unacceptable[1][0], 7);
        assert_eq!(data.validate(8, 3), Ok(()));
    }

    #[test]
    fn test_missing_file() {
        let files = DataFiles {
            proposer_preferences: PathBuf::from("/nonexistent/proposers.csv"),
            receiver_preferences: PathBuf::from("/nonexistent/receivers.csv"),
            receiver_unacceptable: PathBuf::from("/nonexistent/unacceptable.csv"),
            capacities: PathBuf::from("/nonexistent/capacities.csv"),
        };

        let err = load_files(&files, IndexBase::One).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }
}
