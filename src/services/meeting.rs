use crate::config::meeting::MeetingConfig;
use serde::{Deserialize, Serialize};

/// Lifetime of a provisioned meeting room.
const MEETING_DURATION_HOURS: i64 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMeetingRequest {
    end_date: String,
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMeetingResponse {
    host_room_url: Option<String>,
}

/// Mints one-time host meeting URLs from the external scheduling provider.
///
/// A single attempt per request: any failure degrades to "no link available"
/// so the status transition is never blocked on the provider.
#[derive(Clone)]
pub struct MeetingService {
    client: reqwest::Client,
    config: Option<MeetingConfig>,
}

impl MeetingService {
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: MeetingConfig::from_env(),
        }
    }

    /// Returns true if the provider is configured.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Request a host-facing room URL. Returns None on any failure.
    pub async fn provision_meeting(&self) -> Option<String> {
        let config = match &self.config {
            Some(c) => c,
            None => {
                tracing::debug!("Meeting provider not configured, skipping link creation");
                return None;
            }
        };

        let end_date = (chrono::Utc::now() + chrono::Duration::hours(MEETING_DURATION_HOURS))
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let body = CreateMeetingRequest {
            end_date,
            fields: vec!["hostRoomUrl".to_string()],
        };

        let response = self
            .client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Meeting provider unreachable: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Meeting provider returned HTTP {}", response.status());
            return None;
        }

        match response.json::<CreateMeetingResponse>().await {
            Ok(parsed) => {
                if parsed.host_room_url.is_none() {
                    tracing::warn!("Meeting provider response is missing hostRoomUrl");
                }
                parsed.host_room_url
            }
            Err(e) => {
                tracing::warn!("Failed to parse meeting provider response: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_provider_field_names() {
        let body = CreateMeetingRequest {
            end_date: "2025-06-01T15:00:00Z".to_string(),
            fields: vec!["hostRoomUrl".to_string()],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["endDate"], "2025-06-01T15:00:00Z");
        assert_eq!(json["fields"][0], "hostRoomUrl");
    }

    #[test]
    fn response_parses_host_room_url() {
        let parsed: CreateMeetingResponse = serde_json::from_str(
            r#"{"meetingId":"1","hostRoomUrl":"https://example.whereby.com/room?host","roomUrl":"https://example.whereby.com/room"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.host_room_url.as_deref(),
            Some("https://example.whereby.com/room?host")
        );
    }

    #[test]
    fn response_without_url_parses_to_none() {
        let parsed: CreateMeetingResponse = serde_json::from_str(r#"{"meetingId":"1"}"#).unwrap();
        assert!(parsed.host_room_url.is_none());
    }

    #[tokio::test]
    async fn unconfigured_provider_yields_no_link() {
        let service = MeetingService {
            client: reqwest::Client::new(),
            config: None,
        };
        assert!(service.provision_meeting().await.is_none());
    }

    /// Serve a canned provider response on a random local port and return the
    /// endpoint URL.
    async fn spawn_provider_stub(
        status: axum::http::StatusCode,
        body: serde_json::Value,
    ) -> String {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/v1/meetings",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/meetings")
    }

    fn service_against(api_url: String) -> MeetingService {
        MeetingService {
            client: reqwest::Client::new(),
            config: Some(MeetingConfig {
                api_url,
                api_key: "test-api-key".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn configured_provider_yields_the_host_room_url() {
        let url = spawn_provider_stub(
            axum::http::StatusCode::CREATED,
            serde_json::json!({
                "meetingId": "42",
                "roomUrl": "https://example.whereby.com/room",
                "hostRoomUrl": "https://example.whereby.com/room?host"
            }),
        )
        .await;

        let link = service_against(url).provision_meeting().await;
        assert_eq!(link.as_deref(), Some("https://example.whereby.com/room?host"));
    }

    #[tokio::test]
    async fn provider_error_status_yields_no_link() {
        let url = spawn_provider_stub(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({"error": "boom"}),
        )
        .await;

        assert!(service_against(url).provision_meeting().await.is_none());
    }
}
