use std::time::Duration;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ff;

/// A video ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VideoId(pub SmolStr);
impl VideoId {
    /// Create a video ID from anything string-like.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        VideoId(id.into())
    }
}
impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playlist video, as `flipwall` cares about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistVideo {
    /// The video ID
    pub id: VideoId,
    /// The video title
    pub title: String,
    /// The uploader/channel name
    pub author: Option<String>,
    /// URL of the thumbnail image to show on the wall
    pub thumbnail_url: Option<String>,
    /// How long the video runs for
    pub duration: Duration,
}
impl From<ff::PlaylistVideo> for PlaylistVideo {
    fn from(video: ff::PlaylistVideo) -> Self {
        // The API returns multiple thumbnail sizes; the wall wants the
        // largest one available.
        let thumbnail_url = video
            .video_thumbnails
            .into_iter()
            .max_by_key(|t| t.width)
            .map(|t| t.url);
        PlaylistVideo {
            id: VideoId::new(video.video_id),
            title: video.title,
            author: video.author.filter(|a| !a.is_empty()),
            thumbnail_url,
            duration: Duration::from_secs(video.length_seconds.max(0) as u64),
        }
    }
}
