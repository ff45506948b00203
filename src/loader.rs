//! Reading leaderboard sources into typed entries.
//!
//! CSV and TSV files are read with `csv`; Excel and OpenDocument workbooks are
//! read with `calamine` (first worksheet only). Both are first flattened into
//! rows of [`Cell`] so the column lookup and value checks are shared.

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;

use crate::entry::{
    LeaderboardEntry, COL_AUTHOR, COL_AVERAGE_SCORE, COL_MOST_RECENT, COL_NUMBER_PLAYED,
    COL_PROFILE_IMAGE, REQUIRED_COLUMNS,
};
use crate::error::LoadError;
use crate::recency::{resolve_batch, Recency};

/// File formats a leaderboard can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    /// xlsx, xlsm, xls, xlsb or ods
    Workbook,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "tsv" | "tab" => Ok(SourceFormat::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SourceFormat::Workbook),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// A single cell, independent of the file format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Duration-formatted spreadsheet cell, in fractional days
    Duration(f64),
    /// Booleans, dates and error cells, kept for error messages
    Unsupported(String),
}

impl Cell {
    fn from_data(data: &Data) -> Cell {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::DateTime(dt) if dt.is_duration() => Cell::Duration(dt.as_f64()),
            Data::DateTime(dt) => Cell::Unsupported(format!("date {}", dt.as_f64())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::DateTimeIso(s) => Cell::Unsupported(s.clone()),
            Data::Bool(b) => Cell::Unsupported(b.to_string()),
            Data::Error(e) => Cell::Unsupported(format!("{:?}", e)),
        }
    }

    fn from_field(field: &str) -> Cell {
        if field.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Trimmed text content, `None` for empty cells.
    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Duration(days) => Some(days.to_string()),
            Cell::Unsupported(s) => Some(s.clone()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let number = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }

    fn as_recency(&self) -> Option<Recency> {
        match self {
            Cell::Empty => Some(Recency::Blank),
            Cell::Number(n) => n.is_finite().then_some(Recency::Days(*n)),
            Cell::Text(s) => Recency::parse_text(s),
            Cell::Duration(days) => Recency::from_excel_days(*days),
            Cell::Unsupported(_) => None,
        }
    }

    fn describe(&self) -> String {
        self.as_text().unwrap_or_default()
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Column positions of the required fields.
struct ColumnIndices {
    profile_image: usize,
    author: usize,
    average_score: usize,
    number_played: usize,
    most_recent: usize,
}

fn find_required_columns(path: &Path, header: &[Cell]) -> Result<ColumnIndices, LoadError> {
    let names: Vec<String> = header
        .iter()
        .map(|c| {
            c.as_text()
                .unwrap_or_default()
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();
    let find_col = |name: &str| names.iter().position(|h| h == name);

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| find_col(*name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::FieldMissing {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    // All present, checked above
    let col = |name: &str| find_col(name).unwrap_or_default();
    Ok(ColumnIndices {
        profile_image: col(COL_PROFILE_IMAGE),
        author: col(COL_AUTHOR),
        average_score: col(COL_AVERAGE_SCORE),
        number_played: col(COL_NUMBER_PLAYED),
        most_recent: col(COL_MOST_RECENT),
    })
}

/// Load every entry from a leaderboard file, normalizing recency for the batch.
pub fn load_entries(path: &Path) -> Result<Vec<LeaderboardEntry>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let rows = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => read_delimited(path, b',')?,
        SourceFormat::Tsv => read_delimited(path, b'\t')?,
        SourceFormat::Workbook => read_workbook(path)?,
    };

    let entries = entries_from_rows(path, &rows)?;
    log::info!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<Cell>>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<Cell>>, LoadError> {
    let workbook_error = |source: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_error)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from_data).collect())
        .collect())
}

/// Build typed entries from a header row followed by data rows.
pub fn entries_from_rows(
    path: &Path,
    rows: &[Vec<Cell>],
) -> Result<Vec<LeaderboardEntry>, LoadError> {
    let Some((header, data)) = rows.split_first() else {
        return Err(LoadError::FieldMissing {
            path: path.to_path_buf(),
            columns: REQUIRED_COLUMNS.to_vec(),
        });
    };
    let cols = find_required_columns(path, header)?;

    let mut entries = Vec::with_capacity(data.len());
    let mut recency_cells = Vec::with_capacity(data.len());

    for (idx, row) in data.iter().enumerate() {
        let row_num = idx + 1;
        if row.iter().all(Cell::is_empty) {
            log::debug!("Row {}: blank, skipped", row_num);
            continue;
        }

        let get = |col: usize| row.get(col).unwrap_or(&EMPTY_CELL);
        let invalid = |column: &'static str, cell: &Cell, expected: &'static str| {
            LoadError::InvalidValue {
                row: row_num,
                column,
                value: cell.describe(),
                expected,
            }
        };

        let score_cell = get(cols.average_score);
        let played_cell = get(cols.number_played);
        // A missing score or game count can never qualify, same as a blank recency
        if score_cell.is_empty() || played_cell.is_empty() {
            log::debug!("Row {}: no score or game count, skipped", row_num);
            continue;
        }

        let average_score = score_cell
            .as_number()
            .ok_or_else(|| invalid(COL_AVERAGE_SCORE, score_cell, "a number"))?;

        let number_played = played_cell
            .as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
            .ok_or_else(|| {
                invalid(COL_NUMBER_PLAYED, played_cell, "a non-negative whole number")
            })?;

        let recent_cell = get(cols.most_recent);
        let recency = recent_cell
            .as_recency()
            .ok_or_else(|| invalid(COL_MOST_RECENT, recent_cell, "a duration or day count"))?;
        recency_cells.push((row_num, recency));

        entries.push(LeaderboardEntry {
            profile_image_url: get(cols.profile_image).as_text(),
            author: get(cols.author).as_text().unwrap_or_default(),
            average_score,
            number_played,
            inactive_days: None,
        });
    }

    let batch = resolve_batch(&recency_cells)?;
    log::debug!("Recency resolved as {:?}", batch.kind);
    for (entry, days) in entries.iter_mut().zip(batch.inactive_days) {
        entry.inactive_days = days;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn text(s: &str) -> Cell {
        Cell::from_field(s)
    }

    fn header() -> Vec<Cell> {
        REQUIRED_COLUMNS.iter().map(|c| text(c)).collect()
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a.CSV")).unwrap(),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("a.tsv")).unwrap(),
            SourceFormat::Tsv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("leaderboard.xlsx")).unwrap(),
            SourceFormat::Workbook
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("notes.txt")),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_entries_from_rows_basic() {
        let rows = vec![
            header(),
            vec![
                text("https://img/alice.png"),
                text("Alice"),
                text("9.5"),
                text("10"),
                text("2"),
            ],
            vec![Cell::Empty, text("Bob"), Cell::Number(8.0), Cell::Number(3.0), text("-1")],
        ];
        let entries = entries_from_rows(Path::new("t.csv"), &rows).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].profile_image_url.as_deref(),
            Some("https://img/alice.png")
        );
        assert_eq!(entries[0].author, "Alice");
        assert_eq!(entries[0].average_score, 9.5);
        assert_eq!(entries[0].number_played, 10);
        assert_eq!(entries[0].inactive_days, Some(2.0));
        assert_eq!(entries[1].profile_image_url, None);
        assert_eq!(entries[1].inactive_days, Some(1.0));
    }

    #[test]
    fn test_columns_matched_in_any_order_with_extras() {
        let rows = vec![
            vec![
                text("Most Recent"),
                text(" Author "),
                text("Rank"),
                text("Number Played"),
                text("Average Score"),
                text("Profile Image"),
            ],
            vec![
                text("P3D"),
                text("Carl"),
                text("1"),
                text("20"),
                text("7.5"),
                Cell::Empty,
            ],
        ];
        let entries = entries_from_rows(Path::new("t.csv"), &rows).unwrap();
        assert_eq!(entries[0].author, "Carl");
        assert_eq!(entries[0].number_played, 20);
        assert_eq!(entries[0].inactive_days, Some(3.0));
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let rows = vec![vec![text("Author"), text("Average Score")]];
        match entries_from_rows(Path::new("t.csv"), &rows) {
            Err(LoadError::FieldMissing { columns, .. }) => {
                assert_eq!(columns, vec!["Profile Image", "Number Played", "Most Recent"]);
            }
            other => panic!("expected FieldMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_no_rows_is_field_missing() {
        let err = entries_from_rows(Path::new("t.csv"), &[]).unwrap_err();
        assert!(err.is_field_missing());
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let entries = entries_from_rows(Path::new("t.csv"), &[header()]).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_blank_rows_skipped() {
        let rows = vec![
            header(),
            vec![Cell::Empty; 5],
            vec![Cell::Empty, text("Dana"), text("6"), text("5"), Cell::Empty],
        ];
        let entries = entries_from_rows(Path::new("t.csv"), &rows).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].inactive_days, None);
    }

    #[test]
    fn test_rows_without_score_or_games_skipped() {
        let rows = vec![
            header(),
            vec![Cell::Empty, text("Hal"), Cell::Empty, text("9"), text("1")],
            vec![Cell::Empty, text("Ivy"), text("8"), Cell::Empty, text("1")],
            vec![Cell::Empty, text("Jan"), text("8"), text("9"), text("1")],
        ];
        let entries = entries_from_rows(Path::new("t.csv"), &rows).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].author, "Jan");
        assert_eq!(entries[0].inactive_days, Some(1.0));
    }

    #[test]
    fn test_invalid_values_name_row_and_column() {
        let rows = vec![
            header(),
            vec![Cell::Empty, text("Ok"), text("8"), text("6"), text("1")],
            vec![Cell::Empty, text("Eve"), text("8"), text("2.5"), text("1")],
        ];
        match entries_from_rows(Path::new("t.csv"), &rows) {
            Err(LoadError::InvalidValue {
                row, column, value, ..
            }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Number Played");
                assert_eq!(value, "2.5");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }

        let rows = vec![
            header(),
            vec![Cell::Empty, text("Eve"), text("great"), text("2"), text("1")],
        ];
        assert!(matches!(
            entries_from_rows(Path::new("t.csv"), &rows),
            Err(LoadError::InvalidValue {
                column: "Average Score",
                ..
            })
        ));

        let rows = vec![
            header(),
            vec![
                Cell::Empty,
                text("Eve"),
                text("8"),
                text("2"),
                Cell::Unsupported("true".to_string()),
            ],
        ];
        assert!(matches!(
            entries_from_rows(Path::new("t.csv"), &rows),
            Err(LoadError::InvalidValue {
                column: "Most Recent",
                ..
            })
        ));
    }

    #[test]
    fn test_excel_duration_cells() {
        let rows = vec![
            header(),
            vec![
                Cell::Empty,
                text("Fay"),
                Cell::Number(9.0),
                Cell::Number(12.0),
                Cell::Duration(2.75),
            ],
        ];
        let entries = entries_from_rows(Path::new("t.xlsx"), &rows).unwrap();
        assert_eq!(entries[0].inactive_days, Some(2.0));
    }

    #[test]
    fn test_load_entries_missing_file() {
        let err = load_entries(&PathBuf::from("/nonexistent/leaderboard.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_load_entries_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Profile Image\tAuthor\tAverage Score\tNumber Played\tMost Recent").unwrap();
        writeln!(f, "\tGus, Jr.\t7.25\t8\t0 days 05:00:00").unwrap();
        f.flush().unwrap();

        let entries = load_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].author, "Gus, Jr.");
        assert_eq!(entries[0].inactive_days, Some(0.0));
    }
}
