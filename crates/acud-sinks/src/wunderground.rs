//! Weather Underground report sink

use crate::ReportError;
use acud_core::{fields, Snapshot, SnapshotSink};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Default PWS upload endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://weatherstation.wunderground.com/weatherstation/updateweatherstation.php";

// A stalled remote must not hold up the tick loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Uploads one snapshot per tick via HTTP GET.
///
/// The `rainin` parameter carries the derived hourly figure, not the raw
/// counter, and the gust travels only here, never into the history file.
#[derive(Debug)]
pub struct WundergroundSink {
    client: Client,
    endpoint: Url,
    station_id: String,
    password: String,
}

impl WundergroundSink {
    pub fn new(endpoint: &str, station_id: &str, password: &str) -> Result<Self, ReportError> {
        if station_id.is_empty() || password.is_empty() {
            return Err(ReportError::MissingCredentials);
        }

        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            station_id: station_id.to_string(),
            password: password.to_string(),
        })
    }

    async fn upload(&self, snapshot: &Snapshot) -> Result<(), ReportError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ID", &self.station_id)
            .append_pair("PASSWORD", &self.password)
            .append_pair("dateutc", "now")
            .append_pair("tempf", &field_param(snapshot, fields::TEMPERATURE))
            .append_pair("windspeedmph", &field_param(snapshot, fields::WIND_SPEED))
            .append_pair("winddir", &field_param(snapshot, fields::WIND_DIR))
            .append_pair("windgustmph", &snapshot.wind_gust.to_string())
            .append_pair("humidity", &field_param(snapshot, fields::HUMIDITY))
            .append_pair("rainin", &snapshot.hourly_rain.to_string())
            .append_pair("action", "updateraw");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!(
            "Received {} {} from Weather Underground",
            status.as_u16(),
            body.trim()
        );

        if !status.is_success() {
            return Err(ReportError::Rejected { status, body });
        }
        Ok(())
    }
}

fn field_param(snapshot: &Snapshot, name: &str) -> String {
    snapshot
        .get(name)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

#[async_trait]
impl SnapshotSink for WundergroundSink {
    fn name(&self) -> &str {
        "wunderground"
    }

    async fn emit(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.upload(snapshot).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acud_core::FieldValue;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type SeenParams = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn record_params(
        State(seen): State<SeenParams>,
        Query(params): Query<HashMap<String, String>>,
    ) -> &'static str {
        seen.lock().unwrap().push(params);
        "success"
    }

    async fn reject_params(Query(_): Query<HashMap<String, String>>) -> (StatusCode, &'static str) {
        (StatusCode::UNAUTHORIZED, "unauthorized")
    }

    async fn spawn_endpoint(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/weatherstation/updateweatherstation.php", addr)
    }

    fn sample_snapshot() -> Snapshot {
        let mut conditions = HashMap::new();
        conditions.insert(fields::TEMPERATURE.to_string(), FieldValue::Float(72.5));
        conditions.insert(fields::WIND_SPEED.to_string(), FieldValue::Float(3.4));
        conditions.insert(fields::WIND_DIR.to_string(), FieldValue::Integer(225));
        conditions.insert(fields::HUMIDITY.to_string(), FieldValue::Integer(44));
        conditions.insert(fields::RAIN_COUNTER.to_string(), FieldValue::Float(12.3));

        Snapshot {
            date_time: 1700000000,
            conditions,
            hourly_rain: 0.8,
            wind_gust: 9.0,
        }
    }

    #[tokio::test]
    async fn test_sends_expected_parameters() {
        let seen: SeenParams = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/weatherstation/updateweatherstation.php",
                get(record_params),
            )
            .with_state(seen.clone());
        let endpoint = spawn_endpoint(app).await;

        let mut sink = WundergroundSink::new(&endpoint, "KMNTEST1", "hunter2").unwrap();
        sink.emit(&sample_snapshot()).await.unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let params = &requests[0];
        assert_eq!(params["ID"], "KMNTEST1");
        assert_eq!(params["PASSWORD"], "hunter2");
        assert_eq!(params["dateutc"], "now");
        assert_eq!(params["tempf"], "72.5");
        assert_eq!(params["windspeedmph"], "3.4");
        assert_eq!(params["winddir"], "225");
        assert_eq!(params["windgustmph"], "9");
        assert_eq!(params["humidity"], "44");
        // rainin carries the hourly figure, not the raw counter
        assert_eq!(params["rainin"], "0.8");
        assert_eq!(params["action"], "updateraw");
        assert_eq!(params.len(), 10);
    }

    #[tokio::test]
    async fn test_rejection_is_typed_with_body() {
        let app = Router::new().route(
            "/weatherstation/updateweatherstation.php",
            get(reject_params),
        );
        let endpoint = spawn_endpoint(app).await;

        let mut sink = WundergroundSink::new(&endpoint, "KMNTEST1", "hunter2").unwrap();
        let err = sink.emit(&sample_snapshot()).await.unwrap_err();

        match err.downcast_ref::<ReportError>() {
            Some(ReportError::Rejected { status, body }) => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("unauthorized"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = WundergroundSink::new(DEFAULT_ENDPOINT, "", "pw").unwrap_err();
        assert!(matches!(err, ReportError::MissingCredentials));

        let err = WundergroundSink::new(DEFAULT_ENDPOINT, "KMNTEST1", "").unwrap_err();
        assert!(matches!(err, ReportError::MissingCredentials));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = WundergroundSink::new("not a url", "KMNTEST1", "pw").unwrap_err();
        assert!(matches!(err, ReportError::Endpoint(_)));
    }
}
