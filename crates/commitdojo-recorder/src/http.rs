//! HTTP recorder: POSTs each attempt as JSON to a remote endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use commitdojo_core::error::RecorderError;
use commitdojo_core::traits::{AttemptRecord, AttemptRecorder};

/// Sends attempt records to `{base_url}/attempts`.
pub struct HttpRecorder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpRecorder {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/attempts", self.base_url)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

#[async_trait]
impl AttemptRecorder for HttpRecorder {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, record), fields(exercise = %record.exercise_id, attempt = record.attempt_number))]
    async fn record(&self, record: &AttemptRecord) -> anyhow::Result<()> {
        let mut request = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .json(record);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RecorderError::Timeout(self.timeout.as_millis() as u64)
            } else {
                RecorderError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(RecorderError::Unauthorized(body).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(RecorderError::Http { status, message }.into());
        }

        tracing::debug!(status, "attempt recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commitdojo_core::model::CommitSpecification;
    use commitdojo_core::session::Session;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_record() -> AttemptRecord {
        let mut session = Session::new(vec![CommitSpecification::new(
            "fix-null",
            "fix",
            Some("parser"),
            "handle null input",
            false,
        )]).unwrap();
        let raw = "fix(parser): handle null input";
        let outcome = session.submit("fix-null", raw).unwrap();
        AttemptRecord::from_outcome(uuid::Uuid::new_v4(), None, raw, &outcome)
    }

    fn recorder_error(err: &anyhow::Error) -> &RecorderError {
        err.downcast_ref::<RecorderError>().unwrap()
    }

    #[tokio::test]
    async fn posts_record_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let recorder =
            HttpRecorder::new(&server.uri(), Some("test-key".into()), Duration::from_secs(5)).unwrap();
        recorder.record(&sample_record()).await.unwrap();
    }

    #[tokio::test]
    async fn body_is_the_attempt_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let recorder =
            HttpRecorder::new(&format!("{}/", server.uri()), None, Duration::from_secs(5)).unwrap();
        recorder.record(&sample_record()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["exercise_id"], "fix-null");
        assert_eq!(body["grade"]["total_score"], 8);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let recorder =
            HttpRecorder::new(&server.uri(), Some("bad".into()), Duration::from_secs(5)).unwrap();
        let err = recorder.record(&sample_record()).await.unwrap_err();
        assert!(matches!(recorder_error(&err), RecorderError::Unauthorized(_)));
        assert!(err.to_string().contains("rejected credentials"));
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({"error": "maintenance"})),
            )
            .mount(&server)
            .await;

        let recorder = HttpRecorder::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
        let err = recorder.record(&sample_record()).await.unwrap_err();
        let rec = recorder_error(&err);
        assert!(rec.is_transient());
        assert_eq!(
            rec.to_string(),
            "recorder endpoint error (HTTP 503): maintenance"
        );
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let recorder = HttpRecorder::new(&server.uri(), None, Duration::from_millis(50)).unwrap();
        let err = recorder.record(&sample_record()).await.unwrap_err();
        assert!(matches!(recorder_error(&err), RecorderError::Timeout(50)));
    }
}
