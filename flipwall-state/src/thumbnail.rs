use std::sync::Arc;

use crate::VideoId;

/// A fetched thumbnail image, paired with the id of the video it belongs to.
///
/// The image bytes are shared, never copied: the grid, the animation
/// overlay, and the texture cache all hold the same allocation.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// The video the thumbnail belongs to
    pub video_id: VideoId,
    /// Encoded image bytes (JPEG or WebP, as served by the backend)
    pub image: Arc<[u8]>,
}
impl Thumbnail {
    /// Pair image bytes with their video.
    pub fn new(video_id: VideoId, image: impl Into<Arc<[u8]>>) -> Self {
        Thumbnail {
            video_id,
            image: image.into(),
        }
    }
}
