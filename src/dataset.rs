//! Dataset location validation and column preview.
//!
//! A location is accepted when it is either an existing local path or a
//! syntactically valid http(s) URL, and its final segment names a `.csv` or
//! `.parquet` file (case-insensitive). Everything else is rejected with a
//! descriptive reason.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{DatasetError, LocationError};

/// File format inferred from the location's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Parquet,
}

/// A validated dataset location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Url(Url),
    LocalPath(PathBuf),
}

impl DatasetLocation {
    /// Validate a raw location string.
    ///
    /// Local paths must exist on disk; URLs only have to parse with an
    /// http(s) scheme. Both must end in a supported extension.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let trimmed = raw.trim();
        let path = Path::new(trimmed);

        if path.exists() {
            if has_supported_extension(trimmed) {
                return Ok(DatasetLocation::LocalPath(path.to_path_buf()));
            }
            return Err(LocationError::UnsupportedExtension(trimmed.to_string()));
        }

        if let Ok(url) = Url::parse(trimmed)
            && matches!(url.scheme(), "http" | "https")
        {
            if has_supported_extension(url.path()) {
                return Ok(DatasetLocation::Url(url));
            }
            return Err(LocationError::UnsupportedExtension(trimmed.to_string()));
        }

        Err(LocationError::NotAPathOrUrl(trimmed.to_string()))
    }

    pub fn format(&self) -> DatasetFormat {
        let path = match self {
            DatasetLocation::Url(url) => url.path().to_lowercase(),
            DatasetLocation::LocalPath(path) => path.to_string_lossy().to_lowercase(),
        };
        if path.ends_with(".parquet") {
            DatasetFormat::Parquet
        } else {
            DatasetFormat::Csv
        }
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLocation::Url(url) => write!(f, "{url}"),
            DatasetLocation::LocalPath(path) => write!(f, "{}", path.display()),
        }
    }
}

fn has_supported_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".parquet")
}

/// Reads the column names of a dataset so a proposed target column can be
/// checked against it.
///
/// `Ok(None)` means the format has no row preview (parquet); the caller
/// decides how much to trust the column name in that case.
pub trait ColumnProbe {
    async fn columns(&self, location: &DatasetLocation) -> Result<Option<Vec<String>>, DatasetError>;
}

/// Probes CSV datasets by reading the header plus the first few rows,
/// locally from disk or remotely over HTTP.
pub struct CsvProbe {
    http: reqwest::Client,
    preview_rows: usize,
}

impl CsvProbe {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            preview_rows,
        }
    }
}

impl ColumnProbe for CsvProbe {
    async fn columns(&self, location: &DatasetLocation) -> Result<Option<Vec<String>>, DatasetError> {
        if location.format() == DatasetFormat::Parquet {
            return Ok(None);
        }

        let headers = match location {
            DatasetLocation::LocalPath(path) => {
                let mut reader = csv::Reader::from_path(path)?;
                let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
                // Walk the preview window so malformed rows surface here
                // instead of inside the generated code.
                for record in reader.records().take(self.preview_rows) {
                    record?;
                }
                headers
            }
            DatasetLocation::Url(url) => {
                let body = self
                    .http
                    .get(url.as_str())
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                let head: String = body
                    .lines()
                    .take(self.preview_rows + 1)
                    .collect::<Vec<_>>()
                    .join("\n");
                let mut reader = csv::Reader::from_reader(head.as_bytes());
                let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
                for record in reader.records() {
                    record?;
                }
                headers
            }
        };

        Ok(Some(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_csv_url() {
        let location = DatasetLocation::parse("https://example.com/data.csv").unwrap();
        assert!(matches!(location, DatasetLocation::Url(_)));
        assert_eq!(location.format(), DatasetFormat::Csv);
    }

    #[test]
    fn accepts_parquet_url_case_insensitive() {
        let location = DatasetLocation::parse("https://example.com/Data.PARQUET").unwrap();
        assert_eq!(location.format(), DatasetFormat::Parquet);
    }

    #[test]
    fn rejects_url_with_wrong_extension() {
        let err = DatasetLocation::parse("https://example.com/data.xlsx").unwrap_err();
        assert!(matches!(err, LocationError::UnsupportedExtension(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = DatasetLocation::parse("ftp://example.com/data.csv").unwrap_err();
        assert!(matches!(err, LocationError::NotAPathOrUrl(_)));
    }

    #[test]
    fn rejects_free_text() {
        let err = DatasetLocation::parse("False").unwrap_err();
        assert!(matches!(err, LocationError::NotAPathOrUrl(_)));
    }

    #[test]
    fn accepts_existing_local_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let location = DatasetLocation::parse(path.to_str().unwrap()).unwrap();
        assert!(matches!(location, DatasetLocation::LocalPath(_)));
    }

    #[test]
    fn rejects_existing_local_file_with_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = DatasetLocation::parse(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LocationError::UnsupportedExtension(_)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let location = DatasetLocation::parse("  https://example.com/data.csv \n").unwrap();
        assert_eq!(location.to_string(), "https://example.com/data.csv");
    }

    #[tokio::test]
    async fn probe_reads_local_csv_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "label,age,income").unwrap();
        writeln!(file, "1,34,50000").unwrap();
        writeln!(file, "0,29,42000").unwrap();

        let probe = CsvProbe::new(10);
        let location = DatasetLocation::parse(path.to_str().unwrap()).unwrap();
        let columns = probe.columns(&location).await.unwrap().unwrap();
        assert_eq!(columns, vec!["label", "age", "income"]);
    }

    #[tokio::test]
    async fn probe_skips_parquet_preview() {
        let probe = CsvProbe::new(10);
        let location = DatasetLocation::parse("https://example.com/data.parquet").unwrap();
        assert_eq!(probe.columns(&location).await.unwrap(), None);
    }

    #[tokio::test]
    async fn probe_reads_remote_csv_headers() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("label,age\n1,34\n0,29\n"))
            .mount(&server)
            .await;

        let probe = CsvProbe::new(10);
        let location = DatasetLocation::parse(&format!("{}/data.csv", server.uri())).unwrap();
        let columns = probe.columns(&location).await.unwrap().unwrap();
        assert_eq!(columns, vec!["label", "age"]);
    }

    #[tokio::test]
    async fn probe_missing_local_file_is_an_error() {
        let probe = CsvProbe::new(10);
        // Parse against a file that exists, then delete it before probing.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.csv");
        std::fs::write(&path, "a,b\n").unwrap();
        let location = DatasetLocation::parse(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(probe.columns(&location).await.is_err());
    }
}
