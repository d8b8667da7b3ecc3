//! Data import: raw bar records, file readers, synthetic data, fingerprints.

pub mod chart_json;
pub mod csv_import;
pub mod fingerprint;
pub mod provider;
pub mod synthetic;

pub use chart_json::{parse_chart_json, read_chart_json, ChartFileSource};
pub use csv_import::{read_csv, read_csv_file, CsvFileSource};
pub use fingerprint::dataset_hash;
pub use provider::{BarSource, DataError, DataSource, FetchResult, RawBar};
pub use synthetic::{generate_weekly_bars, SyntheticConfig, SyntheticSource};
