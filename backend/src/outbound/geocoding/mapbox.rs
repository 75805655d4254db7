//! Reqwest-backed Mapbox Places adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain matches. The access
//! token never appears in error messages or logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::FeatureCollectionDto;
use crate::domain::ports::{GeocodeMatch, Geocoder, GeocoderError};

const USER_AGENT: &str = concat!("townsquare/", env!("CARGO_PKG_VERSION"));

/// Geocoder adapter that performs forward lookups against Mapbox Places.
pub struct MapboxGeocoder {
    client: Client,
    endpoint: Url,
    access_token: Zeroizing<String>,
}

impl MapboxGeocoder {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `endpoint` is the API origin, for example `https://api.mapbox.com`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            access_token: Zeroizing::new(access_token.into()),
        })
    }

    fn request_url(&self, query: &str, limit: u8) -> Result<Url, GeocoderError> {
        build_request_url(&self.endpoint, query, limit, self.access_token.as_str())
    }
}

impl std::fmt::Debug for MapboxGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxGeocoder")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn forward_geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodeMatch>, GeocoderError> {
        let url = self.request_url(query, limit)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let matches = parse_matches(body.as_ref())?;
        debug!(matches = matches.len(), "mapbox geocode completed");
        Ok(matches)
    }
}

fn build_request_url(
    endpoint: &Url,
    query: &str,
    limit: u8,
    access_token: &str,
) -> Result<Url, GeocoderError> {
    let resource = format!("{query}.json");
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| GeocoderError::rejected("geocoder endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend(["geocoding", "v5", "mapbox.places", resource.as_str()]);
    url.query_pairs_mut()
        .append_pair("access_token", access_token)
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

fn parse_matches(body: &[u8]) -> Result<Vec<GeocodeMatch>, GeocoderError> {
    let decoded: FeatureCollectionDto = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid Mapbox JSON payload: {error}"))
    })?;
    decoded.into_matches().map_err(GeocoderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    let error = error.without_url();
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocoderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => GeocoderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocoderError::timeout(message)
        }
        _ if status.is_client_error() => GeocoderError::rejected(message),
        _ => GeocoderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Mapbox mapping helpers.

    use super::*;
    use rstest::rstest;

    fn endpoint(raw: &str) -> Url {
        Url::parse(raw).expect("valid endpoint")
    }

    #[rstest]
    #[case::bare_origin("https://api.mapbox.com")]
    #[case::trailing_slash("https://api.mapbox.com/")]
    fn builds_places_url_with_encoded_query(#[case] raw: &str) {
        let url = build_request_url(&endpoint(raw), "Austin, TX", 1, "pk.secret")
            .expect("url should build");

        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/Austin,%20TX.json?access_token=pk.secret&limit=1"
        );
    }

    #[test]
    fn escapes_path_separators_in_query() {
        let url = build_request_url(&endpoint("https://api.mapbox.com"), "1/2 Main St", 3, "t")
            .expect("url should build");

        assert!(
            url.path().ends_with("/mapbox.places/1%2F2%20Main%20St.json"),
            "slashes in the query must not create extra path segments: {}",
            url.path()
        );
    }

    #[test]
    fn rejects_cannot_be_a_base_endpoints() {
        let error = build_request_url(&endpoint("mailto:ops@example.com"), "Austin", 1, "t")
            .expect_err("non-hierarchical endpoint must fail");
        assert!(matches!(error, GeocoderError::Rejected { .. }));
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, false)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, true)]
    fn maps_http_statuses_to_retry_classes(#[case] status: StatusCode, #[case] retryable: bool) {
        let error = map_status_error(status, b"{\"message\":\"Not Authorized - Invalid Token\"}");
        assert_eq!(error.is_retryable(), retryable, "status {status}: {error}");
    }

    #[test]
    fn maps_client_errors_to_rejected() {
        let error = map_status_error(StatusCode::UNAUTHORIZED, b"");
        assert_eq!(error, GeocoderError::rejected("status 401"));
    }

    #[test]
    fn truncates_long_bodies_in_previews() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn parses_features_into_matches() {
        let body = r#"{
            "type": "FeatureCollection",
            "query": ["austin", "tx"],
            "features": [
                {
                    "id": "place.123",
                    "place_name": "Austin, Texas, United States",
                    "geometry": { "type": "Point", "coordinates": [-97.7431, 30.2672] }
                }
            ],
            "attribution": "mapbox"
        }"#;

        let matches = parse_matches(body.as_bytes()).expect("JSON should decode");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].place_name, "Austin, Texas, United States");
        assert_eq!(matches[0].point.coordinates(), [-97.7431, 30.2672]);
    }

    #[test]
    fn empty_feature_collection_yields_no_matches() {
        let matches =
            parse_matches(br#"{"type":"FeatureCollection","features":[]}"#).expect("decodes");
        assert!(matches.is_empty());
    }

    #[rstest]
    #[case::not_json("<html>oops</html>")]
    #[case::wrong_geometry(
        r#"{"features":[{"place_name":"X","geometry":{"type":"Polygon","coordinates":[0.0,0.0]}}]}"#
    )]
    #[case::short_coordinates(
        r#"{"features":[{"place_name":"X","geometry":{"type":"Point","coordinates":[1.0]}}]}"#
    )]
    #[case::out_of_range(
        r#"{"features":[{"place_name":"X","geometry":{"type":"Point","coordinates":[200.0,0.0]}}]}"#
    )]
    fn malformed_payloads_map_to_decode_errors(#[case] body: &str) {
        let error = parse_matches(body.as_bytes()).expect_err("decode should fail");
        assert!(
            matches!(error, GeocoderError::Decode { .. }),
            "expected Decode, got {error:?}"
        );
    }

    #[test]
    fn debug_output_omits_access_token() {
        let geocoder = MapboxGeocoder::new(
            endpoint("https://api.mapbox.com"),
            "pk.very-secret",
            Duration::from_secs(1),
        )
        .expect("client builds");
        assert!(!format!("{geocoder:?}").contains("very-secret"));
    }
}
