//! Mock geocoding provider used by client and pipeline tests.
//!
//! Wraps a [`wiremock::MockServer`] that answers `GET /v1/geocode` with a
//! reply chosen per `q` parameter. Replies may carry a delay to simulate slow
//! or hung lookups.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const GEOCODE_PATH: &str = "/v1/geocode";

/// One candidate at `(lat, lng)`.
pub fn found(lat: f64, lng: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "items": [{ "title": "match", "position": { "lat": lat, "lng": lng } }]
    }))
}

/// A successful response with no candidates.
pub fn empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] }))
}

/// A `200` with an arbitrary body.
pub fn raw(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

/// A non-success status.
pub fn status(code: u16) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(serde_json::json!({ "error": "mock" }))
}

/// The `q` and `apiKey` parameters of a received request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub query: String,
    pub api_key: String,
}

impl SeenRequest {
    fn from_request(request: &Request) -> Self {
        let param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default()
        };
        Self {
            query: param("q"),
            api_key: param("apiKey"),
        }
    }
}

struct ByQuery<F>(F);

impl<F> Respond for ByQuery<F>
where
    F: Fn(&str) -> ResponseTemplate + Send + Sync + 'static,
{
    fn respond(&self, request: &Request) -> ResponseTemplate {
        (self.0)(&SeenRequest::from_request(request).query)
    }
}

pub struct MockProvider {
    server: MockServer,
}

impl MockProvider {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> ResponseTemplate + Send + Sync + 'static,
    {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ByQuery(respond))
            .mount(&server)
            .await;
        Self { server }
    }

    pub fn url(&self) -> String {
        format!("{}{GEOCODE_PATH}", self.server.uri())
    }

    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(SeenRequest::from_request)
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.requests().await.len()
    }
}
