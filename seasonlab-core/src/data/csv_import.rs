//! CSV import of weekly bars.
//!
//! Expects a header row with a `timestamp` (Unix seconds) or `date` (ISO /
//! RFC 3339) column plus `open` and `close`. Header matching ignores case, so
//! a spreadsheet export with `Date,Open,High,Low,Close,Adj Close,Volume` reads
//! as-is; unrelated columns are ignored. Empty cells and `null` mark a
//! missing price. A cell that is present but unparseable is also treated as
//! missing: the row is dropped later instead of failing the whole file.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::provider::{BarSource, DataError, DataSource, FetchResult, RawBar};

struct Columns {
    timestamp: Option<usize>,
    date: Option<usize>,
    open: usize,
    close: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let timestamp = find("timestamp");
        let date = find("date");
        if timestamp.is_none() && date.is_none() {
            return Err(DataError::MissingColumn("date"));
        }
        Ok(Self {
            timestamp,
            date,
            open: find("open").ok_or(DataError::MissingColumn("open"))?,
            close: find("close").ok_or(DataError::MissingColumn("close"))?,
        })
    }
}

fn price(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") {
        return None;
    }
    cell.parse::<f64>().ok()
}

/// Read raw bars from CSV text, keeping file order.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| DataError::Csv(e.to_string()))?.clone();
    let cols = Columns::locate(&headers)?;

    let mut bars = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
        let open = price(record.get(cols.open));
        let close = price(record.get(cols.close));

        let by_timestamp = cols
            .timestamp
            .and_then(|i| record.get(i))
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|ts| RawBar::from_timestamp(ts, open, close));
        let raw = match by_timestamp {
            Some(raw) if raw.date.is_some() => raw,
            _ => {
                let text = cols.date.and_then(|i| record.get(i)).unwrap_or("");
                RawBar::from_date_str(text, open, close)
            }
        };
        if raw.date.is_none() {
            debug!(line = line + 2, "CSV row has no usable date");
        }
        bars.push(raw);
    }
    Ok(bars)
}

/// Read raw bars from a CSV file on disk.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    read_csv(std::io::BufReader::new(file))
}

/// A CSV export on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BarSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, symbol: &str) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: read_csv_file(&self.path)?,
            source: DataSource::CsvImport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn reads_date_column_export() {
        let text = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-01,100.0,104.0,99.0,103.0,103.0,1000
2024-01-08,null,null,null,null,null,0
2024-01-15,103.0,105.0,101.0,,102.0,900
";
        let bars = read_csv(text.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[0].close, Some(103.0));
        assert_eq!(bars[1].open, None);
        assert_eq!(bars[2].close, None);
    }

    #[test]
    fn reads_timestamp_column() {
        let text = "timestamp,open,close\n1704067200,10,11\n";
        let bars = read_csv(text.as_bytes()).unwrap();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(bars[0].close, Some(11.0));
    }

    #[test]
    fn bad_date_keeps_row_without_date() {
        let text = "date,open,close\nyesterday,1,2\n";
        let bars = read_csv(text.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars[0].date.is_none());
    }

    #[test]
    fn missing_close_column_is_an_error() {
        let text = "date,open\n2024-01-01,1\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("close")));
    }

    #[test]
    fn missing_date_columns_is_an_error() {
        let text = "open,close\n1,2\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(DataError::MissingColumn("date"))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_csv_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
