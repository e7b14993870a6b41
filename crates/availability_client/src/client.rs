use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, EndpointMode};
use crate::types::{CheckAvailabilityResponse, ClientError, SearchOutcome, SearchRequest};

/// Anything that can answer an availability search
#[async_trait::async_trait]
pub trait AvailabilityBackend: Send + Sync {
    /// Runs one search; never retried
    async fn check(&self, request: &SearchRequest) -> Result<SearchOutcome, ClientError>;
}

/// Client for the availability endpoint
pub struct AvailabilityClient {
    client: Client,
    endpoint: Url,
    mode: EndpointMode,
}

impl AvailabilityClient {
    /// Create a new availability client; the endpoint is resolved once here
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let (endpoint, mode) = config.resolve_endpoint()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Using API endpoint: {} (local: {})",
            endpoint,
            mode == EndpointMode::Local
        );

        Ok(Self {
            client,
            endpoint,
            mode,
        })
    }

    /// Mode the endpoint was resolved with
    pub fn mode(&self) -> EndpointMode {
        self.mode
    }
}

#[async_trait::async_trait]
impl AvailabilityBackend for AvailabilityClient {
    async fn check(&self, request: &SearchRequest) -> Result<SearchOutcome, ClientError> {
        debug!(
            "Checking availability for {} campgrounds from {} to {}",
            request.campgrounds.len(),
            request.start_date,
            request.end_date
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("HTTP request failed: {}", e)))?;

        debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ClientError::Http(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))?;

        let parsed: CheckAvailabilityResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse JSON response: {}", body);
            ClientError::Parse(e.to_string())
        })?;

        parsed.into_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use actix_web::{App, HttpResponse, HttpServer, dev::ServerHandle, web};
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    type Captured = Arc<Mutex<Vec<Value>>>;

    /// Stand-in for the availability endpoint that replies with a canned response
    struct StubEndpoint {
        base_url: String,
        captured: Captured,
        handle: ServerHandle,
    }

    impl StubEndpoint {
        async fn start(path: &'static str, status: u16, body: &'static str) -> Self {
            let captured: Captured = Arc::new(Mutex::new(Vec::new()));
            let app_captured = captured.clone();

            let server = HttpServer::new(move || {
                let captured = app_captured.clone();
                App::new().route(
                    path,
                    web::post().to(move |payload: web::Json<Value>| {
                        let captured = captured.clone();
                        async move {
                            captured.lock().unwrap().push(payload.into_inner());
                            HttpResponse::build(
                                actix_web::http::StatusCode::from_u16(status).unwrap(),
                            )
                            .content_type("application/json")
                            .body(body)
                        }
                    }),
                )
            })
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();

            let port = server.addrs()[0].port();
            let server = server.run();
            let handle = server.handle();
            actix_web::rt::spawn(server);

            Self {
                base_url: format!("http://127.0.0.1:{}", port),
                captured,
                handle,
            }
        }

        fn client(&self, mode: Option<EndpointMode>) -> AvailabilityClient {
            AvailabilityClient::new(&ClientConfig {
                base_url: self.base_url.clone(),
                endpoint_mode: mode,
                ..ClientConfig::default()
            })
            .unwrap()
        }

        fn requests(&self) -> Vec<Value> {
            self.captured.lock().unwrap().clone()
        }

        async fn stop(self) {
            self.handle.stop(true).await;
        }
    }

    fn request() -> SearchRequest {
        SearchRequest {
            start_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            campgrounds: vec!["232447".to_string(), "232453".to_string()],
        }
    }

    #[actix_web::test]
    async fn test_check_posts_request_to_local_endpoint() {
        let stub = StubEndpoint::start(
            "/check_availability",
            200,
            r#"{"success": true, "foundAny": true, "results": {
                "232447": {"name": "Upper Pines", "availability": {"2025-04-10": ["A1"]}},
                "232453": {"name": "Bridalveil Creek", "availability": {}}
            }}"#,
        )
        .await;

        let client = stub.client(None);
        assert_eq!(client.mode(), EndpointMode::Local);

        let outcome = client.check(&request()).await.unwrap();
        assert!(outcome.found_any);
        assert_eq!(outcome.results.len(), 2);

        assert_eq!(
            stub.requests(),
            vec![json!({
                "startDate": "2025-04-10",
                "endDate": "2025-04-12",
                "campgrounds": ["232447", "232453"]
            })]
        );

        stub.stop().await;
    }

    #[actix_web::test]
    async fn test_check_uses_hosted_path_when_configured() {
        let stub = StubEndpoint::start(
            "/api/check_availability",
            200,
            r#"{"success": true, "foundAny": false, "results": {}}"#,
        )
        .await;

        let outcome = stub
            .client(Some(EndpointMode::Hosted))
            .check(&request())
            .await
            .unwrap();
        assert!(!outcome.found_any);
        assert_eq!(stub.requests().len(), 1);

        stub.stop().await;
    }

    #[actix_web::test]
    async fn test_non_success_status_is_http_error() {
        let stub = StubEndpoint::start(
            "/check_availability",
            500,
            r#"{"success": false, "error": "boom"}"#,
        )
        .await;

        let result = stub.client(None).check(&request()).await;
        assert!(matches!(result, Err(ClientError::Http(500))));

        stub.stop().await;
    }

    #[actix_web::test]
    async fn test_invalid_json_is_parse_error() {
        let stub = StubEndpoint::start("/check_availability", 200, "<html>oops</html>").await;

        let result = stub.client(None).check(&request()).await;
        assert!(matches!(result, Err(ClientError::Parse(_))));

        stub.stop().await;
    }

    #[actix_web::test]
    async fn test_server_failure_flag_is_server_error() {
        let stub = StubEndpoint::start(
            "/check_availability",
            200,
            r#"{"success": false, "error": "Missing required parameters"}"#,
        )
        .await;

        let result = stub.client(None).check(&request()).await;
        assert!(
            matches!(result, Err(ClientError::Server(ref message)) if message == "Missing required parameters")
        );

        stub.stop().await;
    }

    #[actix_web::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = AvailabilityClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();

        let result = client.check(&request()).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
