//! Saved chart-API responses (`interval=1wk`) as a bar source.
//!
//! Fetching is someone else's job; this reads the JSON body such a fetch
//! produced. Prices are parallel arrays aligned with `timestamp`, and
//! providers pad them with `null` for weeks without trading. Those rows are
//! kept here and dropped by series construction, so they show up in the
//! skipped-row counts.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::provider::{BarSource, DataError, DataSource, FetchResult, RawBar};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn into_raw_bars(resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) => {
            return Err(DataError::ChartError {
                code: err.code,
                description: err.description,
            })
        }
        (Some(result), None) => result,
        (None, None) => {
            return Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            ))
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    // A range with no trading at all comes back without a timestamp array.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    Ok(timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| {
            RawBar::from_timestamp(
                ts,
                quote.open.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            )
        })
        .collect())
}

/// Parse a chart response body.
pub fn parse_chart_json(body: &str) -> Result<Vec<RawBar>, DataError> {
    let resp: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("invalid chart JSON: {e}")))?;
    into_raw_bars(resp)
}

/// Parse a chart response from any reader.
pub fn read_chart_json<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
    let resp: ChartResponse = serde_json::from_reader(reader)
        .map_err(|e| DataError::ResponseFormatChanged(format!("invalid chart JSON: {e}")))?;
    into_raw_bars(resp)
}

/// A chart response saved to disk.
#[derive(Debug, Clone)]
pub struct ChartFileSource {
    path: PathBuf,
}

impl ChartFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(path: &Path) -> Result<Vec<RawBar>, DataError> {
        let file = std::fs::File::open(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        read_chart_json(std::io::BufReader::new(file))
    }
}

impl BarSource for ChartFileSource {
    fn name(&self) -> &str {
        "chart-json"
    }

    fn load(&self, symbol: &str) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: Self::read(&self.path)?,
            source: DataSource::ChartJson,
        })
    }
}
