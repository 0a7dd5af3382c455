use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::SourceError;
use crate::readers::{Cell, RawRow, RawTable, ensure_exists};

/// Sheet address inside a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl SheetRef {
    pub fn named(name: &str) -> Self {
        SheetRef::Name(name.to_string())
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Index(idx) => write!(f, "#{idx}"),
            SheetRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// A container of sheets that can be read one at a time.
pub trait Workbook {
    fn path(&self) -> &Path;

    /// Reads one sheet as a header row plus data rows.
    fn read_sheet(&mut self, sheet: &SheetRef) -> Result<RawTable, String>;
}

/// Returns the first candidate sheet that parses into a grid with a header
/// row, trying candidates strictly in order.
pub fn read_first_sheet<W: Workbook + ?Sized>(
    workbook: &mut W,
    candidates: &[SheetRef],
) -> Result<RawTable, SourceError> {
    let mut failures = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match workbook.read_sheet(candidate) {
            Ok(table) if table.headers.is_empty() => {
                failures.push(format!("{candidate}: no header row"));
            }
            Ok(table) => return Ok(table),
            Err(reason) => {
                debug!(
                    "sheet {candidate} unusable in {}: {reason}",
                    workbook.path().display()
                );
                failures.push(format!("{candidate}: {reason}"));
            }
        }
    }
    Err(SourceError::format(
        workbook.path(),
        format!("no readable sheet ({})", failures.join("; ")),
    ))
}

/// Opens `path` by extension and reads the first usable candidate sheet.
pub fn read_spreadsheet(path: &Path, candidates: &[SheetRef]) -> Result<RawTable, SourceError> {
    ensure_exists(path)?;
    let extension = path
        .extension()
        .and_then(|x| x.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let mut workbook = CalamineWorkbook::open(path)?;
            read_first_sheet(&mut workbook, candidates)
        }
        "csv" => {
            let mut workbook = CsvWorkbook::new(path);
            read_first_sheet(&mut workbook, candidates)
        }
        _ => Err(SourceError::format(
            path,
            "unsupported spreadsheet extension; use .xlsx, .xls, .ods or .csv",
        )),
    }
}

pub struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let sheets =
            open_workbook_auto(path).map_err(|err| SourceError::format(path, err.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl Workbook for CalamineWorkbook {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_sheet(&mut self, sheet: &SheetRef) -> Result<RawTable, String> {
        let range = match sheet {
            SheetRef::Index(idx) => self
                .sheets
                .worksheet_range_at(*idx)
                .ok_or_else(|| "no such sheet".to_string())?
                .map_err(|err| err.to_string())?,
            SheetRef::Name(name) => self
                .sheets
                .worksheet_range(name)
                .map_err(|err| err.to_string())?,
        };
        Ok(range_to_table(&range, sheet.to_string()))
    }
}

fn range_to_table(range: &Range<Data>, origin: String) -> RawTable {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| data_to_cell(cell).as_text().unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    let rows = rows
        .map(|row| RawRow::new(row.iter().map(data_to_cell).collect()))
        .collect();
    RawTable {
        headers,
        rows,
        origin,
    }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::Bool(v) => Cell::Bool(*v),
        Data::DateTime(v) => Cell::Float(v.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// A CSV file seen as a workbook with a single sheet, addressable as index 0
/// or by the file stem.
pub struct CsvWorkbook {
    path: PathBuf,
}

impl CsvWorkbook {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|x| x.to_str())
            .unwrap_or("")
    }
}

impl Workbook for CsvWorkbook {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_sheet(&mut self, sheet: &SheetRef) -> Result<RawTable, String> {
        match sheet {
            SheetRef::Index(0) => {}
            SheetRef::Name(name) if name == self.stem() => {}
            _ => return Err("no such sheet".to_string()),
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|err| err.to_string())?;
        let headers = reader
            .headers()
            .map_err(|err| err.to_string())?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| err.to_string())?;
            let cells = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::text(field)
                    }
                })
                .collect();
            rows.push(RawRow::new(cells));
        }

        Ok(RawTable {
            headers,
            rows,
            origin: sheet.to_string(),
        })
    }
}
