use std::env;

/// Scheduling-provider credentials for minting one-time video-meeting rooms.
#[derive(Debug, Clone)]
pub struct MeetingConfig {
    pub api_url: String,
    pub api_key: String,
}

impl MeetingConfig {
    /// Returns None if the provider is not configured; a validated request
    /// then simply carries no meeting link.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("MEETING_API_KEY").ok()?;
        let api_url = env::var("MEETING_API_URL")
            .unwrap_or_else(|_| "https://api.whereby.dev/v1/meetings".to_string());

        Some(Self { api_url, api_key })
    }
}
