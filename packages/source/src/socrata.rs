//! Socrata SODA API fetcher.
//!
//! Dog-run datasets are small, so a single `$limit`-capped request pulls
//! the whole feed. There is no pagination and no retry: any transport
//! error or non-success status aborts the fetch.

use std::path::Path;
use std::time::Duration;

use crate::{FetchOptions, RawRecord, SourceError};

/// Configuration for a Socrata fetch.
pub struct SocrataConfig<'a> {
    /// Resource URL (e.g., `"https://data.cityofnewyork.us/resource/hxx3-bwgv.json"`).
    pub api_url: &'a str,
    /// Maximum number of records requested via `$limit`.
    pub limit: u64,
    /// Request timeout.
    pub timeout: Duration,
    /// Label for log messages (e.g., `"NYC Parks Dog Runs"`).
    pub label: &'a str,
}

/// Fetches every record of a Socrata dataset up to the configured cap.
///
/// When [`FetchOptions::raw_output`] is set the untouched response body is
/// written there before decoding.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the portal returns a
/// non-success status, the body is not a JSON array, or the snapshot
/// cannot be written.
pub async fn fetch_socrata(
    config: &SocrataConfig<'_>,
    options: &FetchOptions,
) -> Result<Vec<RawRecord>, SourceError> {
    let limit = effective_limit(config.limit, options.limit);

    let client = reqwest::Client::builder().timeout(config.timeout).build()?;

    log::info!("Fetching {} data: limit={limit}", config.label);
    let response = client
        .get(config.api_url)
        .query(&[("$limit", limit.to_string())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: response.url().to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;

    if let Some(path) = &options.raw_output {
        write_snapshot(path, &body)?;
        log::info!("Raw {} snapshot written to {}", config.label, path.display());
    }

    let records = decode_records(&body)?;
    log::info!("Downloaded {} {} records", records.len(), config.label);

    Ok(records)
}

/// Writes the untouched response body, creating parent directories.
fn write_snapshot(path: &Path, body: &str) -> Result<(), SourceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}

/// Clamps a caller-requested limit to the feed's cap.
#[must_use]
pub fn effective_limit(cap: u64, requested: Option<u64>) -> u64 {
    requested.map_or(cap, |r| r.min(cap))
}

/// Decodes a Socrata response body into raw records.
///
/// Array elements that are not JSON objects are skipped with a warning.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the body is not a JSON array.
pub fn decode_records(body: &str) -> Result<Vec<RawRecord>, SourceError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match value {
            serde_json::Value::Object(map) => Some(map),
            other => {
                log::warn!("Skipping non-object feed row {idx}: {other}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;

    /// Answers every connection with `HTTP 500` and an empty body.
    async fn failing_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() && !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await.unwrap() {
                        0 => break,
                        n => read += n,
                    }
                }
                socket
                    .write_all(
                        b"HTTP/1.1 500 Internal Server Error\r\n\
                          content-length: 0\r\n\
                          connection: close\r\n\r\n",
                    )
                    .await
                    .unwrap();
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn limit_defaults_to_cap() {
        assert_eq!(effective_limit(5000, None), 5000);
    }

    #[test]
    fn limit_is_clamped_to_cap() {
        assert_eq!(effective_limit(5000, Some(10)), 10);
        assert_eq!(effective_limit(5000, Some(50_000)), 5000);
    }

    #[test]
    fn decodes_object_rows_in_order() {
        let body = r#"[{"name": "A"}, 42, {"name": "B"}]"#;
        let records = decode_records(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "A");
        assert_eq!(records[1]["name"], "B");
    }

    #[test]
    fn snapshot_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw/nyc_dog_runs.json");
        write_snapshot(&path, "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn rejects_non_array_body() {
        let err = decode_records(r#"{"error": true}"#).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[tokio::test]
    async fn http_error_aborts_without_snapshot() {
        let base = failing_server().await;
        let api_url = format!("{base}/resource/hxx3-bwgv.json");
        let config = SocrataConfig {
            api_url: &api_url,
            limit: 5000,
            timeout: Duration::from_secs(5),
            label: "NYC Parks Dog Runs",
        };
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("raw.json");
        let options = FetchOptions {
            limit: None,
            raw_output: Some(snapshot.clone()),
        };

        let err = fetch_socrata(&config, &options).await.unwrap_err();
        let SourceError::Status { url, status } = &err else {
            panic!("expected a status error, got {err:?}");
        };
        assert_eq!(*status, 500);
        assert!(url.starts_with(&api_url));
        assert!(url.contains("%24limit=5000"));
        assert!(!snapshot.exists());
    }
}
