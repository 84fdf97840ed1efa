use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult};

/// Full metadata for a single video, as returned by `videos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    /// The video title.
    pub title: String,
    /// The video ID.
    pub video_id: String,
    /// The uploader name.
    pub author: Option<String>,
    /// The video duration in seconds.
    #[serde(default)]
    pub length_seconds: i64,
    /// Whether the video is a live stream (no fixed duration).
    #[serde(default)]
    pub live_now: bool,
}

/// Video endpoints.
impl Client {
    /// Fetch metadata for a single video.
    pub async fn get_video(&self, id: &str) -> ClientResult<VideoDetails> {
        self.request(&format!("videos/{id}")).await
    }

    /// Fetch a thumbnail image's raw bytes.
    pub async fn get_thumbnail(&self, url: &str) -> ClientResult<Vec<u8>> {
        self.fetch_bytes(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_video_details() {
        let json = r#"{
            "title": "A video",
            "videoId": "abc123def45",
            "author": "Channel",
            "lengthSeconds": 631,
            "liveNow": false,
            "viewCount": 1000
        }"#;

        let details: VideoDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.video_id, "abc123def45");
        assert_eq!(details.length_seconds, 631);
        assert!(!details.live_now);
    }
}
