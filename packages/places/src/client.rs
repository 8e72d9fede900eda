//! HTTP client for the places web service.
//!
//! - Search: `GET {base_url}/textsearch/json`
//! - Details: `GET {base_url}/details/json`
//!
//! Both responses carry a `status` field; anything other than `"OK"` means
//! "no data". No retries: the caller degrades on any failure.
//!
//! See <https://developers.google.com/maps/documentation/places/web-service/search-text>

use async_trait::async_trait;
use dogrun_places_models::{PlaceCandidate, PlaceDetails};

use crate::config::PlacesConfig;
use crate::{PlaceLookup, PlacesError};

/// Status value signalling a successful places response.
const STATUS_OK: &str = "OK";

/// [`PlaceLookup`] backed by the places web service.
pub struct PlacesClient {
    client: reqwest::Client,
    config: PlacesConfig,
}

impl PlacesClient {
    /// Creates a client whose requests time out after the configured
    /// duration.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &PlacesConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.config.service.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PlaceLookup for PlacesClient {
    async fn search(
        &self,
        query: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_m: u32,
    ) -> Result<Option<PlaceCandidate>, PlacesError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("key", self.config.api_key().to_string()),
            ("fields", self.config.service.search_fields.clone()),
        ];
        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            params.push(("location", format!("{lat},{lon}")));
            params.push(("radius", radius_m.to_string()));
        }

        let resp = self
            .client
            .get(self.endpoint("textsearch/json"))
            .query(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            log::debug!("Text search for {query:?} returned HTTP {}", resp.status());
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_search_response(&body)
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let resp = self
            .client
            .get(self.endpoint("details/json"))
            .query(&[
                ("place_id", place_id),
                ("key", self.config.api_key()),
                ("fields", self.config.service.detail_fields.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            log::debug!("Details for {place_id} returned HTTP {}", resp.status());
            return Ok(PlaceDetails::default());
        }

        let body: serde_json::Value = resp.json().await?;
        parse_details_response(&body)
    }
}

fn status_is_ok(body: &serde_json::Value) -> bool {
    body["status"].as_str() == Some(STATUS_OK)
}

/// Parses a text-search response into its first candidate.
fn parse_search_response(
    body: &serde_json::Value,
) -> Result<Option<PlaceCandidate>, PlacesError> {
    if !status_is_ok(body) {
        log::debug!("Text search status: {}", body["status"]);
        return Ok(None);
    }

    let Some(first) = body["results"].as_array().and_then(|r| r.first()) else {
        return Ok(None);
    };

    serde_json::from_value(first.clone())
        .map(Some)
        .map_err(|e| PlacesError::Parse {
            message: format!("Malformed text search result: {e}"),
        })
}

/// Parses a details response.
fn parse_details_response(body: &serde_json::Value) -> Result<PlaceDetails, PlacesError> {
    if !status_is_ok(body) {
        log::debug!("Details status: {}", body["status"]);
        return Ok(PlaceDetails::default());
    }

    match body.get("result") {
        None | Some(serde_json::Value::Null) => Ok(PlaceDetails::default()),
        Some(result) => {
            serde_json::from_value(result.clone()).map_err(|e| PlacesError::Parse {
                message: format!("Malformed details result: {e}"),
            })
        }
    }
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
    fn parses_first_search_result() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [
                { "place_id": "ChIJ-first", "name": "Tompkins Square Dog Run" },
                { "place_id": "ChIJ-second" }
            ]
        });
        let candidate = parse_search_response(&body).unwrap().unwrap();
        assert_eq!(candidate.place_id, "ChIJ-first");
        assert_eq!(candidate.name.as_deref(), Some("Tompkins Square Dog Run"));
    }

    #[test]
    fn non_ok_search_status_is_no_match() {
        for status in ["ZERO_RESULTS", "REQUEST_DENIED", "OVER_QUERY_LIMIT"] {
            let body = serde_json::json!({ "status": status, "results": [] });
            assert!(parse_search_response(&body).unwrap().is_none());
        }
    }

    #[test]
    fn ok_search_without_results_is_no_match() {
        let body = serde_json::json!({ "status": "OK", "results": [] });
        assert!(parse_search_response(&body).unwrap().is_none());
    }

    #[test]
    fn search_result_without_place_id_is_a_parse_error() {
        let body = serde_json::json!({ "status": "OK", "results": [{ "name": "x" }] });
        assert!(matches!(
            parse_search_response(&body),
            Err(PlacesError::Parse { .. })
        ));
    }

    #[test]
    fn parses_details_result() {
        let body = serde_json::json!({
            "status": "OK",
            "result": {
                "name": "Tompkins Square Dog Run",
                "opening_hours": { "weekday_text": ["Monday: 6:00 AM – 9:00 PM"] },
                "rating": 4.6,
                "user_ratings_total": 812,
                "formatted_phone_number": "(212) 639-9675",
                "website": "https://www.nycgovparks.org/parks/tompkins-square-park"
            }
        });
        let details = parse_details_response(&body).unwrap();
        assert_eq!(details.rating, Some(4.6));
        assert_eq!(details.user_ratings_total, Some(812));
        assert_eq!(
            details.formatted_phone_number.as_deref(),
            Some("(212) 639-9675")
        );
        assert_eq!(details.opening_hours.unwrap().weekday_text.len(), 1);
    }

    #[test]
    fn non_ok_details_status_is_empty() {
        let body = serde_json::json!({ "status": "NOT_FOUND" });
        assert_eq!(parse_details_response(&body).unwrap(), PlaceDetails::default());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let mut service = crate::config::default_service();
        service.base_url = "http://localhost:9999/place/".to_string();
        let config = PlacesConfig::new(service, Some("k".to_string())).unwrap();
        let client = PlacesClient::new(config).unwrap();
        assert_eq!(
            client.endpoint("details/json"),
            "http://localhost:9999/place/details/json"
        );
    }

    fn client_for(base_url: String) -> PlacesClient {
        let mut service = crate::config::default_service();
        service.base_url = base_url;
        PlacesClient::new(PlacesConfig::new(service, Some("k".to_string())).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn search_http_error_is_no_match() {
        let client = client_for(failing_server().await);
        let candidate = client
            .search("Tompkins Square Dog Run dog run", Some(40.73), Some(-73.98), 200)
            .await
            .unwrap();
        assert!(candidate.is_none());
    }

    #[tokio::test]
    async fn details_http_error_is_empty() {
        let client = client_for(failing_server().await);
        let details = client.details("ChIJ-first").await.unwrap();
        assert_eq!(details, PlaceDetails::default());
    }
}
