use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult};

/// A playlist, as returned by `playlists/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// The playlist title.
    pub title: String,
    /// The playlist ID.
    pub playlist_id: String,
    /// The number of videos in the playlist.
    pub video_count: Option<u32>,
    /// The videos in the playlist.
    #[serde(default)]
    pub videos: Vec<PlaylistVideo>,
}

/// A single video within a playlist listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideo {
    /// The video title.
    pub title: String,
    /// The video ID.
    pub video_id: String,
    /// The uploader name.
    pub author: Option<String>,
    /// Available thumbnail renditions.
    #[serde(default)]
    pub video_thumbnails: Vec<VideoThumbnail>,
    /// The video duration in seconds.
    #[serde(default)]
    pub length_seconds: i64,
}

/// One thumbnail rendition of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoThumbnail {
    /// The rendition name (e.g. `medium`, `maxresdefault`).
    pub quality: Option<String>,
    /// The image URL; may be relative to the instance base URL.
    pub url: String,
    /// The image width in pixels.
    #[serde(default)]
    pub width: u32,
    /// The image height in pixels.
    #[serde(default)]
    pub height: u32,
}

/// Playlist endpoints.
impl Client {
    /// Fetch a playlist with its videos. Large playlists are paginated; this
    /// keeps requesting pages until the server stops returning videos.
    pub async fn get_playlist(&self, id: &str) -> ClientResult<Playlist> {
        let mut playlist: Playlist = self.request(&format!("playlists/{id}")).await?;

        let mut page = 2;
        loop {
            // Stop once the advertised count is reached, if there is one;
            // some instances repeat the last page instead of returning an
            // empty one.
            if let Some(total) = playlist.video_count
                && playlist.videos.len() >= total as usize
            {
                break;
            }
            let next: Playlist = self.request(&format!("playlists/{id}?page={page}")).await?;
            if next.videos.is_empty() {
                break;
            }
            playlist.videos.extend(next.videos);
            page += 1;
        }

        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_playlist_listing() {
        let json = r#"{
            "title": "Demo reel",
            "playlistId": "PL1234567890",
            "videoCount": 2,
            "videos": [
                {
                    "title": "First video",
                    "videoId": "dQw4w9WgXcQ",
                    "author": "Some Channel",
                    "videoThumbnails": [
                        {"quality": "medium", "url": "/vi/dQw4w9WgXcQ/mqdefault.jpg", "width": 320, "height": 180},
                        {"quality": "maxres", "url": "/vi/dQw4w9WgXcQ/maxres.jpg", "width": 1280, "height": 720}
                    ],
                    "lengthSeconds": 212
                },
                {
                    "title": "Second video",
                    "videoId": "abc123def45",
                    "lengthSeconds": 95
                }
            ]
        }"#;

        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.playlist_id, "PL1234567890");
        assert_eq!(playlist.videos.len(), 2);
        assert_eq!(playlist.videos[0].video_thumbnails.len(), 2);
        assert_eq!(playlist.videos[0].length_seconds, 212);
        // Missing optional fields deserialize to defaults.
        assert!(playlist.videos[1].author.is_none());
        assert!(playlist.videos[1].video_thumbnails.is_empty());
    }
}
